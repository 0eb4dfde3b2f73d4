//! Core data structures

/// Sampled 6x6 cell matrix
pub mod grid;
/// Rotations, decoded and detected markers, candidates
pub mod marker;
/// Image-space points
pub mod point;

pub use grid::MarkerGrid;
pub use marker::{Candidate, DecodedMarker, DetectedMarker, Rotation};
pub use point::Point;
