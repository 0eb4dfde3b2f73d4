//! glyph_crop - fiducial glyph detection and book page rectification
//!
//! Finds small printed 6x6 glyphs in a photo of an open book, decodes their
//! IDs and orientation, and uses four glyphs per page to produce an upright,
//! perspective-corrected crop of each page.
//!
//! ```no_run
//! use glyph_crop::page::{BookSpread, SpreadLayout};
//!
//! let photo = glyph_crop::tools::load_rgb("spread.jpg")?;
//! let gray = image::DynamicImage::ImageRgb8(photo.clone()).to_luma8();
//! let markers = glyph_crop::detect_markers(&gray)?;
//!
//! let spread = BookSpread::new(&photo, &markers);
//! let left = spread.page_image(&SpreadLayout::book(6.0, 9.5, 600.0).left)?;
//! left.save("left.png")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Tunable parameters and their environment overrides
pub mod config;
/// Glyph grid decoding (structure checks, rotation, ID tables)
pub mod decoder;
/// Candidate extraction and analysis
pub mod detector;
/// Error types
pub mod error;
/// Core data structures (MarkerGrid, DetectedMarker, Point, etc.)
pub mod models;
/// Page layouts and rectified page images
pub mod page;
/// Image loading and glyph rendering helpers
pub mod tools;
/// Utility functions (binarization, geometry, resampling)
pub mod utils;

pub use config::{AnalyzerConfig, CandidateConfig, ThresholdPolicy};
pub use decoder::MarkerDecoder;
pub use detector::{CandidateFinder, Detector, MarkerAnalyzer};
pub use error::{MarkerError, PageError};
pub use models::{Candidate, DecodedMarker, DetectedMarker, MarkerGrid, Point, Rotation};
pub use page::{BookSpread, PageLayout, SpreadLayout};

use image::GrayImage;

/// Detect markers in a grayscale image
///
/// Uses settings from the `GLYPH_*` environment variables, falling back to
/// the defaults. Results are sorted by ID.
pub fn detect_markers(gray: &GrayImage) -> Result<Vec<DetectedMarker>, MarkerError> {
    Detector::from_env().detect(gray)
}

/// Decode a sampled 6x6 grid
pub fn decode(grid: &MarkerGrid) -> Option<DecodedMarker> {
    MarkerDecoder::decode(grid)
}

/// Grid of the glyph for `id` turned by `rotation`
pub fn encode(id: u8, rotation: Rotation) -> Option<MarkerGrid> {
    MarkerDecoder::encode(id, rotation)
}
