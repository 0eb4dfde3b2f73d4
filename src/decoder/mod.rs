//! Marker glyph decoding
//!
//! Turns a sampled 6x6 grid into a marker ID and rotation:
//! - Structural checks (dark outer ring, light guard ring)
//! - Orientation from the single dark inner corner
//! - Payload extraction through rotation-specific bit tables and the ID table

/// Grid validation, decoding and the inverse encoder
pub mod marker_decoder;
/// Glyph layout constants (ID permutation, bit tables, cell regions)
pub mod tables;

pub use marker_decoder::MarkerDecoder;
