//! Image-processing helpers shared by the detector and page assembler
//!
//! - Binarization (Otsu's method and fixed thresholds)
//! - Geometry (homographies, polygon measurements)
//! - Raster allocation and area resizing
//! - Sub-pixel corner refinement
//! - The [`ImageOps`] capability used by the marker analyzer

pub mod binarization;
pub mod geometry;
pub mod ops;
pub mod raster;
pub mod subpix;

pub use ops::{ImageOps, StandardOps};
