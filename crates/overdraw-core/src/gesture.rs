//! Gesture state machine separating one-finger drawing from two-finger zoom.

use crate::builder::StrokeBuilder;
use crate::config::CanvasConfig;
use crate::history::History;
use crate::input::TouchEvent;
use crate::stroke::{SerializableColor, Stroke};
use crate::transform::{Transform, TransformEngine};
use serde::{Deserialize, Serialize};

/// What the touches on the surface currently mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GestureState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// One finger is drawing a stroke.
    Drawing,
    /// Two or more fingers are pinching.
    Zooming,
}

/// Current ink settings, applied when a stroke is finished.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brush {
    pub color: SerializableColor,
    /// Nominal on-screen width, before dividing by the view scale.
    pub width: f64,
    pub is_eraser: bool,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: SerializableColor::black(),
            width: 6.0,
            is_eraser: false,
        }
    }
}

/// Result of feeding one event to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEffect {
    /// The event did not change anything.
    None,
    StrokeBegan,
    StrokeExtended,
    /// A finished stroke was added to the history.
    StrokeCommitted,
    /// The stroke in progress was dropped (too short, preempted or cancelled).
    StrokeDiscarded,
    ZoomBegan,
    ZoomUpdated,
    ZoomEnded,
}

/// Owns the transform and stroke builder while gestures run.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    state: GestureState,
    engine: TransformEngine,
    builder: StrokeBuilder,
}

impl Default for GestureMachine {
    fn default() -> Self {
        Self::new(&CanvasConfig::default())
    }
}

impl GestureMachine {
    pub fn new(config: &CanvasConfig) -> Self {
        Self {
            state: GestureState::Idle,
            engine: TransformEngine::new(config.max_scale),
            builder: StrokeBuilder::new(config.min_segment_distance),
        }
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn transform(&self) -> Transform {
        self.engine.transform()
    }

    pub fn transform_engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn transform_engine_mut(&mut self) -> &mut TransformEngine {
        &mut self.engine
    }

    /// The stroke being drawn, if any, styled with `brush`.
    pub fn preview(&self, brush: &Brush) -> Option<Stroke> {
        if self.state != GestureState::Drawing {
            return None;
        }
        self.builder.preview(
            brush.color,
            brush.width,
            brush.is_eraser,
            &self.engine.transform(),
        )
    }

    /// Feed one touch event. Finished strokes are committed to `history`.
    pub fn handle(
        &mut self,
        event: &TouchEvent,
        brush: &Brush,
        history: &mut History,
    ) -> GestureEffect {
        if matches!(event, TouchEvent::Cancel) {
            return self.abort();
        }

        let touches = event.touches();
        let is_move = matches!(event, TouchEvent::Move { .. });
        let is_down = matches!(event, TouchEvent::Down { .. });
        let transform = self.engine.transform();

        match (self.state, touches.len()) {
            (_, 0) => self.release(brush, history),
            (GestureState::Idle, 1) if is_down => {
                self.builder.begin(touches[0], &transform);
                self.set_state(GestureState::Drawing);
                GestureEffect::StrokeBegan
            }
            (GestureState::Idle, n) if n >= 2 && is_down => self.begin_zoom(touches),
            (GestureState::Idle, _) => GestureEffect::None,
            (GestureState::Drawing, 1) if is_move => {
                if self.builder.extend(touches[0], &transform) {
                    GestureEffect::StrokeExtended
                } else {
                    GestureEffect::None
                }
            }
            (GestureState::Drawing, 1) => GestureEffect::None,
            (GestureState::Drawing, _) => {
                // A second finger always wins; the partial stroke is thrown away.
                self.builder.cancel();
                log::debug!("Stroke preempted by pinch");
                self.begin_zoom(touches)
            }
            // Lifting one of two fingers keeps the zoom until every finger is up.
            (GestureState::Zooming, 1) => GestureEffect::None,
            (GestureState::Zooming, _) if is_move => {
                if self.engine.update_pinch(touches[0], touches[1]) {
                    GestureEffect::ZoomUpdated
                } else {
                    GestureEffect::None
                }
            }
            // The finger pair changed; restart from the current transform.
            (GestureState::Zooming, _) => self.begin_zoom(touches),
        }
    }

    /// Terminate the gesture without committing anything.
    pub fn abort(&mut self) -> GestureEffect {
        let effect = match self.state {
            GestureState::Idle => GestureEffect::None,
            GestureState::Drawing => {
                self.builder.cancel();
                GestureEffect::StrokeDiscarded
            }
            GestureState::Zooming => {
                self.engine.end_pinch();
                GestureEffect::ZoomEnded
            }
        };
        self.set_state(GestureState::Idle);
        effect
    }

    fn release(&mut self, brush: &Brush, history: &mut History) -> GestureEffect {
        let effect = match self.state {
            GestureState::Idle => GestureEffect::None,
            GestureState::Drawing => {
                let finished = self.builder.finish(
                    brush.color,
                    brush.width,
                    brush.is_eraser,
                    &self.engine.transform(),
                );
                match finished {
                    Some(stroke) => {
                        log::debug!(
                            "Committing stroke: {} points, width {:.3}, eraser {}",
                            stroke.point_count(),
                            stroke.width,
                            stroke.is_eraser
                        );
                        history.add(stroke);
                        GestureEffect::StrokeCommitted
                    }
                    None => {
                        log::debug!("Dropping stroke with fewer than two points");
                        GestureEffect::StrokeDiscarded
                    }
                }
            }
            GestureState::Zooming => {
                self.engine.end_pinch();
                GestureEffect::ZoomEnded
            }
        };
        self.set_state(GestureState::Idle);
        effect
    }

    fn begin_zoom(&mut self, touches: &[kurbo::Point]) -> GestureEffect {
        self.engine.begin_pinch(touches[0], touches[1]);
        self.set_state(GestureState::Zooming);
        GestureEffect::ZoomBegan
    }

    fn set_state(&mut self, state: GestureState) {
        if self.state != state {
            log::debug!("Gesture {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }
}
