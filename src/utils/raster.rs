//! Working raster allocation and resampling

use crate::error::MarkerError;
use image::imageops::{self, FilterType};
use image::{GrayImage, ImageBuffer, Luma, Pixel};

/// Allocate a zeroed image, reporting allocation failure instead of aborting
pub fn try_alloc<P>(width: u32, height: u32) -> Result<ImageBuffer<P, Vec<u8>>, MarkerError>
where
    P: Pixel<Subpixel = u8>,
{
    let err = || MarkerError::RasterAllocation { width, height };
    let len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(P::CHANNEL_COUNT as usize))
        .ok_or_else(err)?;

    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|_| err())?;
    data.resize(len, 0);
    ImageBuffer::from_raw(width, height, data).ok_or_else(err)
}

/// Shrink by area averaging
///
/// Exact integer factors average each source block (rounded to nearest).
/// Other ratios fall back to a triangle filter.
pub fn resize_area(src: &GrayImage, width: u32, height: u32) -> Result<GrayImage, MarkerError> {
    let (sw, sh) = src.dimensions();
    if width == 0 || height == 0 || sw % width != 0 || sh % height != 0 {
        return Ok(imageops::resize(src, width, height, FilterType::Triangle));
    }

    let fx = sw / width;
    let fy = sh / height;
    let block = fx * fy;
    let mut out = try_alloc::<Luma<u8>>(width, height)?;

    for (x, y, pixel) in out.enumerate_pixels_mut() {
        let mut sum = 0u32;
        for sy in y * fy..(y + 1) * fy {
            for sx in x * fx..(x + 1) * fx {
                sum += src.get_pixel(sx, sy).0[0] as u32;
            }
        }
        pixel.0[0] = ((sum + block / 2) / block) as u8;
    }

    Ok(out)
}
