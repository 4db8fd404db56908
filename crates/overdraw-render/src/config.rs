//! Tunable parameters for replaying drawings.

use overdraw_core::{CoreError, CoreResult, PAPER_ASPECT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the replay renderer and viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Total margin (not per side) left around content when auto-centering.
    pub content_padding: f64,
    /// Content boxes this small on either side are treated as empty.
    pub content_noise_floor: f64,
    /// Upper bound on the auto-center scale, so a single dot does not fill the view.
    pub max_content_scale: f64,
    /// Seconds for the reveal trim to go from 0 to 1.
    pub reveal_secs: f64,
    /// Seconds for the ink opacity to fade from 0 to 1.
    pub fade_secs: f64,
    /// Paper height divided by paper width.
    pub paper_aspect: f64,
    /// Arc-length accuracy used when trimming paths.
    pub trim_accuracy: f64,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            content_padding: 40.0,
            content_noise_floor: 10.0,
            max_content_scale: 5.0,
            reveal_secs: 2.2,
            fade_secs: 1.0,
            paper_aspect: PAPER_ASPECT,
            trim_accuracy: 1e-3,
        }
    }
}

impl ReplayConfig {
    /// Check that every parameter is usable.
    pub fn validate(&self) -> CoreResult<()> {
        let non_negative = [
            ("content_padding", self.content_padding),
            ("content_noise_floor", self.content_noise_floor),
            ("reveal_secs", self.reveal_secs),
            ("fade_secs", self.fade_secs),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        let positive = [
            ("max_content_scale", self.max_content_scale),
            ("paper_aspect", self.paper_aspect),
            ("trim_accuracy", self.trim_accuracy),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn reveal_duration(&self) -> Duration {
        seconds(self.reveal_secs)
    }

    pub fn fade_duration(&self) -> Duration {
        seconds(self.fade_secs)
    }
}

/// Non-finite or negative values mean "no animation".
fn seconds(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
