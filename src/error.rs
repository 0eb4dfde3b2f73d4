//! Error types
//!
//! Candidates that are not markers are never errors: they decode to `None`.
//! Only conditions the caller must react to are surfaced here.

use thiserror::Error;

/// Fatal failure while analyzing a candidate
#[derive(Debug, Error)]
pub enum MarkerError {
    /// A working raster could not be allocated
    #[error("failed to allocate {width}x{height} working raster")]
    RasterAllocation {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },
}

/// Failure while building a rectified page image
#[derive(Debug, Error)]
pub enum PageError {
    /// A marker required by the layout was not detected
    #[error("marker {0} required by the page layout was not detected")]
    MissingMarker(u8),

    /// The layout does not name exactly four markers
    #[error("page layout must name exactly 4 markers, found {0}")]
    MarkerCount(usize),

    /// The layout crop box or resolution is empty or not finite
    #[error("invalid page layout: {0}")]
    InvalidLayout(String),

    /// Marker positions do not define a usable page transform
    #[error("page homography is degenerate")]
    DegenerateHomography,

    /// Raster allocation failed
    #[error(transparent)]
    Marker(#[from] MarkerError),
}
