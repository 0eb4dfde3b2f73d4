//! Candidate polygon extraction from a grayscale frame

use crate::config::{CandidateConfig, ThresholdPolicy};
use crate::models::{Candidate, Point};
use crate::utils::binarization::dark_mask;
use crate::utils::geometry::signed_area;
use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::contrast::otsu_level;
use imageproc::geometry::{approximate_polygon_dp, arc_length};
use imageproc::point::Point as PixelPoint;
use tracing::trace;

/// Traces ink blobs and simplifies their outlines into polygons
///
/// No shape filtering happens here beyond dropping very short contours; the
/// analyzer decides which polygons are markers.
#[derive(Debug, Clone, Default)]
pub struct CandidateFinder {
    config: CandidateConfig,
}

impl CandidateFinder {
    /// Create a finder with explicit settings
    pub fn new(config: CandidateConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &CandidateConfig {
        &self.config
    }

    /// Threshold separating ink from paper for this frame
    pub fn threshold_for(&self, gray: &GrayImage) -> u8 {
        match self.config.threshold {
            ThresholdPolicy::Otsu => otsu_level(gray),
            ThresholdPolicy::Fixed(t) => t,
        }
    }

    /// Extract candidate polygons
    ///
    /// Every returned polygon starts at the vertex nearest the image origin
    /// and winds top-left, bottom-left, bottom-right, top-right for an
    /// upright square (negative signed area with y down).
    pub fn find(&self, gray: &GrayImage) -> Vec<Candidate> {
        let threshold = self.threshold_for(gray);
        let mask = dark_mask(gray, threshold);

        let candidates: Vec<Candidate> = find_contours::<i32>(&mask)
            .into_iter()
            .filter(|contour| contour.border_type == BorderType::Outer)
            .filter(|contour| contour.points.len() >= self.config.min_contour_points.max(3))
            .map(|contour| {
                let outline = start_at_extreme(contour.points);
                let epsilon =
                    (self.config.approx_epsilon * arc_length(&outline, true)).max(f64::EPSILON);
                let mut poly: Vec<Point> = approximate_polygon_dp(&outline, epsilon, true)
                    .into_iter()
                    .map(|p| Point::new(p.x as f32, p.y as f32))
                    .collect();
                if signed_area(&poly) > 0.0 {
                    poly.reverse();
                }
                if let Some(first) = poly
                    .iter()
                    .enumerate()
                    .min_by(|a, b| (a.1.x + a.1.y).total_cmp(&(b.1.x + b.1.y)))
                    .map(|(i, _)| i)
                {
                    poly.rotate_left(first);
                }
                Candidate::new(poly)
            })
            .collect();

        trace!(
            threshold,
            count = candidates.len(),
            "extracted candidate polygons"
        );
        candidates
    }
}

/// Rotate a closed contour to begin at the point farthest from its first one
///
/// Douglas-Peucker keeps the first point of the curve, so it must be a
/// hull vertex rather than a point in the middle of an edge.
fn start_at_extreme(mut points: Vec<PixelPoint<i32>>) -> Vec<PixelPoint<i32>> {
    let Some(&origin) = points.first() else {
        return points;
    };
    let far = points
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| {
            let (dx, dy) = ((p.x - origin.x) as i64, (p.y - origin.y) as i64);
            dx * dx + dy * dy
        })
        .map_or(0, |(i, _)| i);
    points.rotate_left(far);
    points
}
