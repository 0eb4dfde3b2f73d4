use super::Point;
use serde::{Deserialize, Serialize};

/// How a glyph is turned relative to its canonical drawing
///
/// The orientation cell of an unrotated glyph sits at grid cell (1,1). Each
/// quarter turn clockwise moves it to the next inner corner: (1,4), (4,4),
/// (4,1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rotation {
    /// Orientation cell at (1,1)
    Deg0 = 0,
    /// Orientation cell at (1,4)
    Deg90 = 1,
    /// Orientation cell at (4,4)
    Deg180 = 2,
    /// Orientation cell at (4,1)
    Deg270 = 3,
}

impl Rotation {
    /// All rotations in detection order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Number of clockwise quarter turns (0-3)
    pub fn quarter_turns(self) -> usize {
        self as usize
    }

    /// Rotation angle in degrees
    pub fn degrees(self) -> u32 {
        self as u32 * 90
    }

    /// Parse 0/90/180/270 degrees
    pub fn from_degrees(degrees: u32) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }
}

/// Result of decoding a 6x6 marker grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecodedMarker {
    /// Marker ID (0-15)
    pub id: u8,
    /// Detected rotation
    pub rotation: Rotation,
}

/// A decoded marker located in an image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectedMarker {
    /// Marker ID (0-15)
    pub id: u8,
    /// Rotation relative to the first vertex of the candidate polygon
    pub rotation: Rotation,
    /// Refined corners in image coordinates, starting at the corner of the
    /// orientation cell and keeping the candidate's winding
    pub corners: [Point; 4],
    /// Candidate polygon area in square pixels
    pub area: f32,
}

impl DetectedMarker {
    /// Corner adjacent to the orientation cell
    pub fn anchor(&self) -> Point {
        self.corners[0]
    }
}

/// Polygon extracted from a frame that may contain a marker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    /// Polygon vertices in image coordinates, in traced order
    pub points: Vec<Point>,
}

impl Candidate {
    /// Create a candidate from its vertices
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Number of polygon vertices
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the polygon has no vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<[Point; 4]> for Candidate {
    fn from(points: [Point; 4]) -> Self {
        Self {
            points: points.to_vec(),
        }
    }
}
