//! Reveal animation timing.
//!
//! `RevealTiming` maps elapsed time to a frame state. `RevealAnimation` pins that to a
//! monotonic start instant; the caller schedules frame callbacks, asks the animation for
//! the current state each frame, and cancels it on teardown.

use crate::config::ReplayConfig;
use std::time::Duration;

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Global reveal state shared by every stroke in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Fraction of each stroke's length that is drawn, in `[0, 1]`.
    pub progress: f64,
    /// Ink layer opacity, in `[0, 1]`.
    pub opacity: f64,
}

impl FrameState {
    /// Everything fully drawn and opaque.
    pub const COMPLETE: FrameState = FrameState {
        progress: 1.0,
        opacity: 1.0,
    };

    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0 && self.opacity >= 1.0
    }
}

/// Durations of the trim reveal and the opacity fade, both starting at time zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    pub reveal: Duration,
    pub fade: Duration,
}

impl RevealTiming {
    pub fn new(reveal: Duration, fade: Duration) -> Self {
        Self { reveal, fade }
    }

    pub fn from_config(config: &ReplayConfig) -> Self {
        Self::new(config.reveal_duration(), config.fade_duration())
    }

    /// Linear progress and opacity after `elapsed`.
    pub fn frame_at(&self, elapsed: Duration) -> FrameState {
        FrameState {
            progress: linear(elapsed, self.reveal),
            opacity: linear(elapsed, self.fade),
        }
    }

    /// Time after which every frame is complete.
    pub fn total(&self) -> Duration {
        self.reveal.max(self.fade)
    }
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self::from_config(&ReplayConfig::default())
    }
}

fn linear(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    (elapsed.as_secs_f64() / duration.as_secs_f64()).clamp(0.0, 1.0)
}

/// A running reveal, started at a fixed instant.
#[derive(Debug, Clone)]
pub struct RevealAnimation {
    timing: RevealTiming,
    started_at: Instant,
    cancelled: bool,
}

impl RevealAnimation {
    pub fn start(timing: RevealTiming, now: Instant) -> Self {
        Self {
            timing,
            started_at: now,
            cancelled: false,
        }
    }

    /// Frame state at `now`, or `None` once cancelled.
    pub fn tick(&self, now: Instant) -> Option<FrameState> {
        if self.cancelled {
            return None;
        }
        Some(
            self.timing
                .frame_at(now.saturating_duration_since(self.started_at)),
        )
    }

    /// Stop the animation. Later ticks return `None`.
    pub fn cancel(&mut self) {
        if !self.cancelled {
            log::debug!("Reveal animation cancelled");
        }
        self.cancelled = true;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Whether frames past `now` would all be complete.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.cancelled || now.saturating_duration_since(self.started_at) >= self.timing.total()
    }
}
