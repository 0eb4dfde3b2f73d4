//! Image-processing capabilities used by the marker analyzer
//!
//! The analyzer only talks to [`ImageOps`], so tests can substitute a double
//! that records or forbids individual operations.

use crate::error::MarkerError;
use crate::models::Point;
use crate::utils::binarization;
use crate::utils::geometry;
use crate::utils::raster;
use crate::utils::subpix::{self, SubPixParams};
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

/// Primitive operations needed to turn a candidate polygon into a grid
pub trait ImageOps: Send + Sync {
    /// True if the polygon is convex
    fn is_convex(&self, poly: &[Point]) -> bool;

    /// Unsigned polygon area in square pixels
    fn polygon_area(&self, poly: &[Point]) -> f64;

    /// Refine corner positions in place
    fn refine_corners(&self, gray: &GrayImage, corners: &mut [Point], params: &SubPixParams);

    /// Projective transform taking `src[i]` to `dst[i]`, `None` if degenerate
    fn find_homography(&self, src: &[Point; 4], dst: &[Point; 4]) -> Option<Projection>;

    /// Resample `src` into a `width` x `height` raster through `transform`
    fn warp_perspective(
        &self,
        src: &GrayImage,
        transform: &Projection,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, MarkerError>;

    /// Area-averaging resize
    fn resize_area(&self, src: &GrayImage, width: u32, height: u32)
    -> Result<GrayImage, MarkerError>;

    /// Mean intensity
    fn mean_intensity(&self, src: &GrayImage) -> f64;

    /// Binary threshold in place: values above `threshold` become 255
    fn threshold(&self, src: &mut GrayImage, threshold: u8);
}

/// Default implementation backed by `image` and `imageproc`
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOps;

impl ImageOps for StandardOps {
    fn is_convex(&self, poly: &[Point]) -> bool {
        geometry::is_convex(poly)
    }

    fn polygon_area(&self, poly: &[Point]) -> f64 {
        geometry::polygon_area(poly)
    }

    fn refine_corners(&self, gray: &GrayImage, corners: &mut [Point], params: &SubPixParams) {
        subpix::refine_corners(gray, corners, params);
    }

    fn find_homography(&self, src: &[Point; 4], dst: &[Point; 4]) -> Option<Projection> {
        geometry::projection(src, dst)
    }

    fn warp_perspective(
        &self,
        src: &GrayImage,
        transform: &Projection,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, MarkerError> {
        let mut out = raster::try_alloc::<Luma<u8>>(width, height)?;
        warp_into(src, transform, Interpolation::Bilinear, Luma([0]), &mut out);
        Ok(out)
    }

    fn resize_area(
        &self,
        src: &GrayImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, MarkerError> {
        raster::resize_area(src, width, height)
    }

    fn mean_intensity(&self, src: &GrayImage) -> f64 {
        binarization::mean_intensity(src)
    }

    fn threshold(&self, src: &mut GrayImage, threshold: u8) {
        binarization::threshold_in_place(src, threshold);
    }
}
