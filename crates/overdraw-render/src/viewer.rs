//! Replay viewer: one mounted, read-only view of a saved drawing.

use crate::clock::{FrameState, RevealAnimation, RevealTiming};
use crate::config::ReplayConfig;
use crate::plan::{build_plan, PlanInput, RenderPlan};
use crate::projection::project;
use kurbo::Size;
use overdraw_core::{records_from_json_lenient, Stroke, StrokeRecord, Transform};
use std::time::Duration;

#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// How a viewer presents its drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Reveal strokes over time instead of showing them at once.
    pub animated: bool,
    /// Show the finished drawing even when `animated` is set.
    pub start_visible: bool,
    /// Fit the ink, not the paper, to the viewport.
    pub auto_center: bool,
}

impl Default for ReplayOptions {
    fn default() -> Self {
        Self {
            animated: true,
            start_visible: false,
            auto_center: false,
        }
    }
}

impl ReplayOptions {
    /// Finished drawing, paper fit to the viewport.
    pub fn still() -> Self {
        Self {
            animated: false,
            ..Self::default()
        }
    }

    fn reveals(&self) -> bool {
        self.animated && !self.start_visible
    }
}

/// A mounted replay of one drawing.
///
/// The projection is computed once per viewport size. The host calls `frame` from its
/// per-frame callback while `is_animating` holds, and `unmount` on teardown.
#[derive(Debug, Clone)]
pub struct ReplayViewer {
    background: String,
    strokes: Vec<Stroke>,
    reference_paper_width: f64,
    viewport: Size,
    options: ReplayOptions,
    config: ReplayConfig,
    transform: Transform,
    animation: Option<RevealAnimation>,
    mounted: bool,
}

impl ReplayViewer {
    /// Mount a viewer over stroke records. Records that fail to parse are skipped.
    pub fn new(
        background: impl Into<String>,
        records: &[StrokeRecord],
        reference_paper_width: f64,
        viewport: Size,
        options: ReplayOptions,
        config: ReplayConfig,
    ) -> Self {
        let strokes = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match Stroke::from_record(record) {
                Ok(stroke) => Some(stroke),
                Err(e) => {
                    log::warn!("Skipping stroke {index}: {e}");
                    None
                }
            })
            .collect();
        Self::from_strokes(background, strokes, reference_paper_width, viewport, options, config)
    }

    /// Mount a viewer over already parsed strokes.
    pub fn from_strokes(
        background: impl Into<String>,
        strokes: Vec<Stroke>,
        reference_paper_width: f64,
        viewport: Size,
        options: ReplayOptions,
        config: ReplayConfig,
    ) -> Self {
        let transform = project(
            &strokes,
            reference_paper_width,
            viewport,
            options.auto_center,
            &config,
        );
        log::debug!(
            "Replay viewer mounted: {} strokes, scale {:.3}",
            strokes.len(),
            transform.scale
        );
        Self {
            background: background.into(),
            strokes,
            reference_paper_width,
            viewport,
            options,
            config,
            transform,
            animation: None,
            mounted: true,
        }
    }

    /// Mount a viewer over a serialized stroke list. Unreadable input gives an empty drawing.
    pub fn from_json(
        background: impl Into<String>,
        json: &str,
        reference_paper_width: f64,
        viewport: Size,
        options: ReplayOptions,
        config: ReplayConfig,
    ) -> Self {
        let records = records_from_json_lenient(json);
        Self::new(background, &records, reference_paper_width, viewport, options, config)
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn options(&self) -> ReplayOptions {
        self.options
    }

    pub fn stroke_count(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Start (or restart) the reveal at `now`. No-op for viewers that do not animate.
    pub fn start(&mut self, now: Instant) {
        if !self.mounted || !self.options.reveals() {
            return;
        }
        self.animation = Some(RevealAnimation::start(
            RevealTiming::from_config(&self.config),
            now,
        ));
    }

    /// Plan for the frame at `now`, or `None` once unmounted.
    ///
    /// The first call on an animated viewer starts the reveal.
    pub fn frame(&mut self, now: Instant) -> Option<RenderPlan> {
        if !self.mounted {
            return None;
        }
        if self.options.reveals() && self.animation.is_none() {
            self.start(now);
        }
        let frame = match &self.animation {
            Some(animation) => animation.tick(now)?,
            None => FrameState::COMPLETE,
        };
        Some(self.plan(frame))
    }

    /// Plan as it looks `elapsed` after the reveal started.
    pub fn plan_at(&self, elapsed: Duration) -> RenderPlan {
        let frame = if self.options.reveals() {
            RevealTiming::from_config(&self.config).frame_at(elapsed)
        } else {
            FrameState::COMPLETE
        };
        self.plan(frame)
    }

    /// The finished drawing.
    pub fn static_plan(&self) -> RenderPlan {
        self.plan(FrameState::COMPLETE)
    }

    /// Whether the host should keep scheduling frames.
    pub fn is_animating(&self, now: Instant) -> bool {
        self.mounted
            && self
                .animation
                .as_ref()
                .is_some_and(|animation| !animation.is_finished(now))
    }

    /// Re-project for a new viewport size. The reveal keeps its clock.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.transform = project(
            &self.strokes,
            self.reference_paper_width,
            viewport,
            self.options.auto_center,
            &self.config,
        );
    }

    /// Tear down: stop the reveal. Later frames return `None`.
    pub fn unmount(&mut self) {
        if let Some(animation) = self.animation.as_mut() {
            animation.cancel();
        }
        self.mounted = false;
    }

    fn paper_size(&self) -> Size {
        Size::new(
            self.reference_paper_width,
            self.reference_paper_width * self.config.paper_aspect,
        )
    }

    fn plan(&self, frame: FrameState) -> RenderPlan {
        build_plan(
            &PlanInput {
                background: &self.background,
                strokes: &self.strokes,
                paper: self.paper_size(),
                viewport: self.viewport,
                transform: self.transform,
                trim_accuracy: self.config.trim_accuracy,
            },
            frame,
        )
    }
}
