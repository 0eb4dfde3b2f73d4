//! Sub-pixel corner refinement
//!
//! Iteratively moves each corner to the point where the image gradient in a
//! surrounding window is orthogonal to the offset from the corner.

use crate::models::Point;
use image::GrayImage;

/// Parameters for [`refine_corners`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubPixParams {
    /// Half side of the search window in pixels
    pub half_window: usize,
    /// Maximum iterations per corner
    pub max_iterations: usize,
    /// Stop when a corner moves less than this many pixels
    pub epsilon: f32,
}

impl Default for SubPixParams {
    fn default() -> Self {
        Self {
            half_window: 3,
            max_iterations: 20,
            epsilon: 0.03,
        }
    }
}

/// Bilinear sample with replicated borders
fn sample(gray: &GrayImage, x: f32, y: f32) -> f32 {
    let max_x = gray.width().saturating_sub(1) as f32;
    let max_y = gray.height().saturating_sub(1) as f32;
    let x = x.clamp(0.0, max_x);
    let y = y.clamp(0.0, max_y);

    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let x0 = x0 as u32;
    let y0 = y0 as u32;
    let x1 = (x0 + 1).min(max_x as u32);
    let y1 = (y0 + 1).min(max_y as u32);

    let p = |x: u32, y: u32| gray.get_pixel(x, y).0[0] as f32;
    let top = p(x0, y0) * (1.0 - fx) + p(x1, y0) * fx;
    let bottom = p(x0, y1) * (1.0 - fx) + p(x1, y1) * fx;
    top * (1.0 - fy) + bottom * fy
}

/// Refine corner locations in place
///
/// A corner that drifts farther than the window from where it started is
/// restored to its starting position.
pub fn refine_corners(gray: &GrayImage, corners: &mut [Point], params: &SubPixParams) {
    if gray.width() == 0 || gray.height() == 0 || params.half_window == 0 {
        return;
    }

    let win = params.half_window as i32;
    let side = (2 * win + 1) as usize;
    let patch_side = side + 2;

    // Separable Gaussian weight over the window
    let weights: Vec<f32> = (-win..=win)
        .map(|i| {
            let t = i as f32 / win as f32;
            (-t * t).exp()
        })
        .collect();

    let eps_sq = params.epsilon * params.epsilon;
    let mut patch = vec![0.0f32; patch_side * patch_side];

    for corner in corners.iter_mut() {
        let start = *corner;
        let mut current = start;

        for _ in 0..params.max_iterations.max(1) {
            for (i, row) in patch.chunks_exact_mut(patch_side).enumerate() {
                let y = current.y + (i as i32 - win - 1) as f32;
                for (j, value) in row.iter_mut().enumerate() {
                    *value = sample(gray, current.x + (j as i32 - win - 1) as f32, y);
                }
            }

            let (mut gxx, mut gxy, mut gyy) = (0.0f64, 0.0f64, 0.0f64);
            let (mut bb1, mut bb2) = (0.0f64, 0.0f64);

            for i in 0..side {
                let py = (i as i32 - win) as f64;
                for j in 0..side {
                    let px = (j as i32 - win) as f64;
                    let m = (weights[i] * weights[j]) as f64;
                    let at = |r: usize, c: usize| patch[r * patch_side + c] as f64;
                    let tgx = at(i + 1, j + 2) - at(i + 1, j);
                    let tgy = at(i + 2, j + 1) - at(i, j + 1);

                    let txx = tgx * tgx * m;
                    let txy = tgx * tgy * m;
                    let tyy = tgy * tgy * m;
                    gxx += txx;
                    gxy += txy;
                    gyy += tyy;
                    bb1 += txx * px + txy * py;
                    bb2 += txy * px + tyy * py;
                }
            }

            let det = gxx * gyy - gxy * gxy;
            if det.abs() <= f64::EPSILON * f64::EPSILON {
                break;
            }
            let scale = 1.0 / det;
            let next = Point::new(
                current.x + (scale * (gyy * bb1 - gxy * bb2)) as f32,
                current.y + (scale * (gxx * bb2 - gxy * bb1)) as f32,
            );

            let moved = current.distance_squared(&next);
            current = next;
            let outside = current.x < 0.0
                || current.y < 0.0
                || current.x >= gray.width() as f32
                || current.y >= gray.height() as f32;
            if outside || moved <= eps_sq {
                break;
            }
        }

        if (current.x - start.x).abs() > win as f32
            || (current.y - start.y).abs() > win as f32
            || !current.x.is_finite()
            || !current.y.is_finite()
        {
            current = start;
        }
        *corner = current;
    }
}
