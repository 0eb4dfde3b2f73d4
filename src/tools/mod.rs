//! Helpers shared by the CLI, benches and integration tests

use crate::decoder::MarkerDecoder;
use crate::models::grid::GRID_SIZE;
use crate::models::{MarkerGrid, Rotation};
use crate::utils::raster::try_alloc;
use image::{DynamicImage, GenericImageView, GrayImage, Luma, RgbImage};
use std::env;
use std::path::Path;

/// Ink level used when drawing glyphs
pub const INK: u8 = 0;
/// Paper level used when drawing glyphs
pub const PAPER: u8 = 255;

fn max_dim_from_env() -> Option<u32> {
    match env::var("GLYPH_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

fn open_limited<P: AsRef<Path>>(path: P) -> Result<DynamicImage, image::ImageError> {
    let img = image::open(path)?;
    if let Some(max_dim) = max_dim_from_env() {
        let (w, h) = img.dimensions();
        if w.max(h) > max_dim {
            return Ok(img.resize(max_dim, max_dim, image::imageops::FilterType::Triangle));
        }
    }
    Ok(img)
}

/// Load an image as RGB, downscaled to `GLYPH_MAX_DIM` when set
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage, image::ImageError> {
    Ok(open_limited(path)?.to_rgb8())
}

/// Draw a grid with `cell` pixels per cell and `quiet` cells of paper around it
///
/// Returns `None` when the image side does not fit in `u32` or the raster
/// cannot be allocated.
pub fn render_grid(grid: &MarkerGrid, cell: u32, quiet: u32) -> Option<GrayImage> {
    let cell = cell.max(1);
    let side = quiet
        .checked_mul(2)
        .and_then(|q| q.checked_add(GRID_SIZE as u32))
        .and_then(|cells| cells.checked_mul(cell))?;

    let mut img = try_alloc::<Luma<u8>>(side, side).ok()?;
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let col = (x / cell) as i64 - quiet as i64;
        let row = (y / cell) as i64 - quiet as i64;
        let inside = (0..GRID_SIZE as i64).contains(&col) && (0..GRID_SIZE as i64).contains(&row);
        *pixel = if inside && grid.get(row as usize, col as usize) {
            Luma([INK])
        } else {
            Luma([PAPER])
        };
    }
    Some(img)
}

/// Draw the glyph for `id` turned by `rotation`
///
/// Returns `None` for IDs outside 0-15 or sizes [`render_grid`] rejects.
pub fn render_marker(id: u8, rotation: Rotation, cell: u32, quiet: u32) -> Option<GrayImage> {
    let grid = MarkerDecoder::encode(id, rotation)?;
    render_grid(&grid, cell, quiet)
}
