//! Marker candidate analysis
//!
//! Turns a candidate polygon into a decoded marker:
//! 1. Shape gate (four vertices, convex, large enough) and winding fix
//! 2. Sub-pixel corner refinement
//! 3. Perspective rectification onto a square raster
//! 4. Area downsampling and mean-threshold binarization
//! 5. 6x6 cell sampling and decoding
//! 6. Corner reordering so the first corner is the orientation corner

use crate::config::AnalyzerConfig;
use crate::decoder::MarkerDecoder;
use crate::error::MarkerError;
use crate::models::grid::GRID_SIZE;
use crate::models::{Candidate, DetectedMarker, MarkerGrid, Point, Rotation};
use crate::utils::geometry::signed_area;
use crate::utils::ops::{ImageOps, StandardOps};
use image::GrayImage;
use tracing::{debug, trace};

/// Sub-samples per grid cell after downsampling
const CELL_SAMPLES: u32 = 3;

/// Pixels at or below this value in the binarized raster read as ink
const DARK_LEVEL: u8 = 128;

/// Analyzer for marker candidates
///
/// Holds no mutable state; one instance can serve many threads.
#[derive(Debug, Clone)]
pub struct MarkerAnalyzer<G: ImageOps = StandardOps> {
    ops: G,
    config: AnalyzerConfig,
}

impl MarkerAnalyzer<StandardOps> {
    /// Analyzer backed by the default image operations
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            ops: StandardOps,
            config,
        }
    }
}

impl Default for MarkerAnalyzer<StandardOps> {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl<G: ImageOps> MarkerAnalyzer<G> {
    /// Analyzer backed by custom image operations
    pub fn with_ops(ops: G, config: AnalyzerConfig) -> Self {
        Self { ops, config }
    }

    /// Active settings
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Image operations in use
    pub fn ops(&self) -> &G {
        &self.ops
    }

    /// Side of the rectified raster in pixels
    pub fn raster_size(&self) -> u32 {
        GRID_SIZE as u32 * CELL_SAMPLES * self.config.supersample.max(1)
    }

    /// Decide whether `candidate` is a marker and identify it
    ///
    /// Returns `Ok(None)` for anything that is not a valid marker. Only a
    /// failed raster allocation is an error.
    pub fn analyze(
        &self,
        gray: &GrayImage,
        candidate: &Candidate,
    ) -> Result<Option<DetectedMarker>, MarkerError> {
        let Some((corners, area)) = self.shape_gate(candidate) else {
            return Ok(None);
        };

        let mut refined = corners;
        self.ops
            .refine_corners(gray, &mut refined, &self.config.subpix());

        let Some(grid) = self.sample_grid(gray, &refined)? else {
            return Ok(None);
        };

        let Some(decoded) = MarkerDecoder::decode(&grid) else {
            trace!("candidate grid failed structural checks\n{grid}");
            return Ok(None);
        };

        debug!(
            id = decoded.id,
            rotation = decoded.rotation.degrees(),
            "decoded marker"
        );

        Ok(Some(DetectedMarker {
            id: decoded.id,
            rotation: decoded.rotation,
            corners: reorder_corners(&refined, decoded.rotation),
            area: area as f32,
        }))
    }

    /// Rectify the quadrilateral `corners` and sample its 6x6 grid
    ///
    /// `corners` map in order to the top-left, bottom-left, bottom-right
    /// and top-right of the rectified square. `Ok(None)` when the corners do
    /// not define an invertible transform.
    pub fn sample_grid(
        &self,
        gray: &GrayImage,
        corners: &[Point; 4],
    ) -> Result<Option<MarkerGrid>, MarkerError> {
        let size = self.raster_size();
        let s = size as f32;
        let canonical = [
            Point::new(0.0, 0.0),
            Point::new(0.0, s),
            Point::new(s, s),
            Point::new(s, 0.0),
        ];

        let Some(transform) = self.ops.find_homography(corners, &canonical) else {
            trace!("degenerate candidate homography");
            return Ok(None);
        };
        let rectified = self.ops.warp_perspective(gray, &transform, size, size)?;

        let cells = GRID_SIZE as u32 * CELL_SAMPLES;
        let mut small = self.ops.resize_area(&rectified, cells, cells)?;
        let threshold = self.ops.mean_intensity(&small).clamp(0.0, 255.0) as u8;
        self.ops.threshold(&mut small, threshold);

        let mut grid = MarkerGrid::new();
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                let x = col as u32 * CELL_SAMPLES + 1;
                let y = row as u32 * CELL_SAMPLES + 1;
                grid.set(row, col, small.get_pixel(x, y).0[0] <= DARK_LEVEL);
            }
        }
        Ok(Some(grid))
    }

    fn shape_gate(&self, candidate: &Candidate) -> Option<([Point; 4], f64)> {
        let mut corners: [Point; 4] = match candidate.points.as_slice().try_into() {
            Ok(corners) => corners,
            Err(_) => {
                trace!(vertices = candidate.len(), "rejected: not a quadrilateral");
                return None;
            }
        };
        if !self.ops.is_convex(&corners) {
            trace!("rejected: not convex");
            return None;
        }
        let area = self.ops.polygon_area(&corners);
        if area < self.config.min_area {
            trace!(area, "rejected: too small");
            return None;
        }
        // Clockwise on screen would sample a mirrored grid
        if signed_area(&corners) > 0.0 {
            corners.swap(1, 3);
        }
        Some((corners, area))
    }
}

/// Rotate corner order so index 0 is the corner of the orientation cell
///
/// The winding is preserved; `corners[0]` is the polygon vertex that was
/// mapped to the rectified top-left.
pub fn reorder_corners(corners: &[Point; 4], rotation: Rotation) -> [Point; 4] {
    let shift = (4 - rotation.quarter_turns()) % 4;
    std::array::from_fn(|i| corners[(i + shift) % 4])
}
