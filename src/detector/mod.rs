//! Marker detection
//!
//! - Candidate extraction (ink contours simplified into polygons)
//! - Candidate analysis (shape gate, rectification, grid decoding)
//! - [`Detector`], which runs both over a whole frame

/// Candidate analysis into decoded markers
pub mod analyzer;
/// Contour tracing and candidate polygons
pub mod candidates;

pub use analyzer::MarkerAnalyzer;
pub use candidates::CandidateFinder;

use crate::config::{AnalyzerConfig, CandidateConfig};
use crate::error::MarkerError;
use crate::models::DetectedMarker;
use crate::utils::ops::{ImageOps, StandardOps};
use image::GrayImage;
use rayon::prelude::*;
use tracing::info;

/// Frame-level marker detector
///
/// Candidates are analyzed in parallel; results are sorted by ID, then by
/// descending area.
#[derive(Debug, Clone)]
pub struct Detector<G: ImageOps = StandardOps> {
    finder: CandidateFinder,
    analyzer: MarkerAnalyzer<G>,
}

impl Detector<StandardOps> {
    /// Create a detector with explicit settings
    pub fn new(candidates: CandidateConfig, analysis: AnalyzerConfig) -> Self {
        Self {
            finder: CandidateFinder::new(candidates),
            analyzer: MarkerAnalyzer::new(analysis),
        }
    }

    /// Create a detector from `GLYPH_*` environment overrides
    pub fn from_env() -> Self {
        Self::new(*CandidateConfig::global(), *AnalyzerConfig::global())
    }
}

impl Default for Detector<StandardOps> {
    fn default() -> Self {
        Self::new(CandidateConfig::default(), AnalyzerConfig::default())
    }
}

impl<G: ImageOps> Detector<G> {
    /// Combine a finder with an analyzer using custom image operations
    pub fn with_parts(finder: CandidateFinder, analyzer: MarkerAnalyzer<G>) -> Self {
        Self { finder, analyzer }
    }

    /// Candidate finder in use
    pub fn finder(&self) -> &CandidateFinder {
        &self.finder
    }

    /// Analyzer in use
    pub fn analyzer(&self) -> &MarkerAnalyzer<G> {
        &self.analyzer
    }

    /// Detect all markers in a grayscale frame
    pub fn detect(&self, gray: &GrayImage) -> Result<Vec<DetectedMarker>, MarkerError> {
        let candidates = self.finder.find(gray);

        let analyzed: Vec<Option<DetectedMarker>> = candidates
            .par_iter()
            .map(|candidate| self.analyzer.analyze(gray, candidate))
            .collect::<Result<_, _>>()?;

        let mut markers: Vec<DetectedMarker> = analyzed.into_iter().flatten().collect();
        markers.sort_by(|a, b| a.id.cmp(&b.id).then(b.area.total_cmp(&a.area)));

        info!(
            candidates = candidates.len(),
            markers = markers.len(),
            "marker detection finished"
        );
        Ok(markers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn test_detect_empty() {
        let gray = GrayImage::from_pixel(64, 64, Luma([255]));
        let markers = Detector::default().detect(&gray).unwrap();
        assert!(markers.is_empty());
    }

    #[test]
    fn test_plain_square_is_not_a_marker() {
        let gray = GrayImage::from_fn(100, 100, |x, y| {
            if (20..80).contains(&x) && (20..80).contains(&y) {
                Luma([10])
            } else {
                Luma([245])
            }
        });
        let detector = Detector::default();
        assert_eq!(detector.finder().find(&gray).len(), 1);
        assert!(detector.detect(&gray).unwrap().is_empty());
    }
}
