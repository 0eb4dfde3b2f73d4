//! Tunable parameters
//!
//! Every setting has a compiled-in default and can be overridden through a
//! `GLYPH_*` environment variable. Unparseable values fall back to the
//! default.

use crate::utils::subpix::SubPixParams;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_threshold(name: &str, default: ThresholdPolicy) -> ThresholdPolicy {
    match std::env::var(name) {
        Ok(v) if v.trim().eq_ignore_ascii_case("otsu") => ThresholdPolicy::Otsu,
        Ok(v) => v
            .trim()
            .parse::<u8>()
            .map(ThresholdPolicy::Fixed)
            .unwrap_or(default),
        Err(_) => default,
    }
}

/// Marker analysis parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Smallest accepted candidate area in square pixels
    pub min_area: f64,
    /// Half side of the corner refinement window
    pub subpix_half_window: usize,
    /// Corner refinement iteration cap
    pub subpix_iterations: usize,
    /// Corner refinement convergence distance in pixels
    pub subpix_epsilon: f32,
    /// Pixels per sub-cell in the rectified raster
    pub supersample: u32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            min_area: 360.0,
            subpix_half_window: 3,
            subpix_iterations: 20,
            subpix_epsilon: 0.03,
            supersample: 10,
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overridden by `GLYPH_MIN_AREA`, `GLYPH_SUBPIX_WINDOW`,
    /// `GLYPH_SUBPIX_ITERATIONS`, `GLYPH_SUBPIX_EPSILON` and
    /// `GLYPH_SUPERSAMPLE`
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            min_area: parse_env_f64("GLYPH_MIN_AREA", d.min_area).max(0.0),
            subpix_half_window: parse_env_usize("GLYPH_SUBPIX_WINDOW", d.subpix_half_window)
                .clamp(1, 16),
            subpix_iterations: parse_env_usize("GLYPH_SUBPIX_ITERATIONS", d.subpix_iterations)
                .clamp(1, 200),
            subpix_epsilon: parse_env_f64("GLYPH_SUBPIX_EPSILON", d.subpix_epsilon as f64)
                .max(0.0) as f32,
            supersample: parse_env_u32("GLYPH_SUPERSAMPLE", d.supersample).clamp(1, 64),
        }
    }

    /// Process-wide configuration, read from the environment once
    pub fn global() -> &'static Self {
        static CONFIG: OnceLock<AnalyzerConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::from_env)
    }

    /// Corner refinement parameters
    pub fn subpix(&self) -> SubPixParams {
        SubPixParams {
            half_window: self.subpix_half_window,
            max_iterations: self.subpix_iterations,
            epsilon: self.subpix_epsilon,
        }
    }
}

/// How a frame is split into ink and paper before contour tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// Otsu's threshold computed per frame
    Otsu,
    /// Pixels at or below this value are ink
    Fixed(u8),
}

/// Candidate extraction parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateConfig {
    /// Frame binarization
    pub threshold: ThresholdPolicy,
    /// Polygon approximation tolerance as a fraction of contour length
    pub approx_epsilon: f64,
    /// Contours shorter than this many points are skipped
    pub min_contour_points: usize,
}

impl Default for CandidateConfig {
    fn default() -> Self {
        Self {
            threshold: ThresholdPolicy::Otsu,
            approx_epsilon: 0.02,
            min_contour_points: 16,
        }
    }
}

impl CandidateConfig {
    /// Defaults overridden by `GLYPH_THRESHOLD` (`otsu` or 0-255),
    /// `GLYPH_APPROX_EPSILON` and `GLYPH_MIN_CONTOUR_POINTS`
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            threshold: parse_env_threshold("GLYPH_THRESHOLD", d.threshold),
            approx_epsilon: parse_env_f64("GLYPH_APPROX_EPSILON", d.approx_epsilon)
                .clamp(0.001, 0.5),
            min_contour_points: parse_env_usize("GLYPH_MIN_CONTOUR_POINTS", d.min_contour_points),
        }
    }

    /// Process-wide configuration, read from the environment once
    pub fn global() -> &'static Self {
        static CONFIG: OnceLock<CandidateConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::from_env)
    }
}
