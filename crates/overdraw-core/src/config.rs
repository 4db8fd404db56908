//! Tunable parameters for the authoring surface.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Height of the paper relative to its width (3:4 portrait paper).
pub const PAPER_ASPECT: f64 = 4.0 / 3.0;

/// Default zoom ceiling relative to content size.
pub const DEFAULT_MAX_SCALE: f64 = 10.0;

/// Default minimum distance, in canvas units, between recorded stroke samples.
pub const DEFAULT_MIN_SEGMENT_DISTANCE: f64 = 2.5;

/// Configuration for a drawing canvas.
///
/// The zoom ceiling and sample threshold are product-tuning values, so they live here
/// rather than being baked into the transform and builder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Maximum allowed scale while pinch-zooming.
    pub max_scale: f64,
    /// Samples closer than this (canvas units) to the previous one are dropped.
    pub min_segment_distance: f64,
    /// Paper height divided by paper width.
    pub paper_aspect: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            max_scale: DEFAULT_MAX_SCALE,
            min_segment_distance: DEFAULT_MIN_SEGMENT_DISTANCE,
            paper_aspect: PAPER_ASPECT,
        }
    }
}

impl CanvasConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.max_scale.is_finite() && self.max_scale > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "max_scale must be positive, got {}",
                self.max_scale
            )));
        }
        if !(self.min_segment_distance.is_finite() && self.min_segment_distance >= 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "min_segment_distance must be non-negative, got {}",
                self.min_segment_distance
            )));
        }
        if !(self.paper_aspect.is_finite() && self.paper_aspect > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "paper_aspect must be positive, got {}",
                self.paper_aspect
            )));
        }
        Ok(())
    }

    /// Load a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}
