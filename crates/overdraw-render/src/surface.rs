//! Drawing backend abstraction.

use kurbo::{BezPath, Rect, Stroke as StrokeStyle};
use overdraw_core::SerializableColor;
use peniko::{BlendMode, Color, Compose, Mix};

/// How an ink command affects the ink layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InkPaint {
    /// Paint with a color, composited source-over.
    Ink(SerializableColor),
    /// Clear whatever ink lies beneath, within the ink layer only.
    Clear,
}

impl InkPaint {
    /// Blend mode a backend should use for this paint.
    pub fn blend_mode(&self) -> BlendMode {
        match self {
            InkPaint::Ink(_) => BlendMode::new(Mix::Normal, Compose::SrcOver),
            InkPaint::Clear => BlendMode::new(Mix::Normal, Compose::Clear),
        }
    }

    /// Brush color, or `None` for clearing strokes.
    pub fn color(&self) -> Option<Color> {
        match self {
            InkPaint::Ink(color) => Some((*color).into()),
            InkPaint::Clear => None,
        }
    }
}

/// Trait for rendering backends that can draw a replay plan.
///
/// Calls always come in the order `draw_background`, `push_ink_layer`, zero or more
/// `stroke`, `pop_layer`. The ink layer is an isolated offscreen group: `InkPaint::Clear`
/// erases ink drawn earlier in the same layer and must leave the background untouched.
pub trait InkSurface {
    /// Draw the background image into `rect` (view coordinates).
    fn draw_background(&mut self, image: &str, rect: Rect);

    /// Start the isolated ink layer, to be composited with `opacity` when popped.
    fn push_ink_layer(&mut self, opacity: f64);

    /// Stroke a path (view coordinates) into the current layer.
    fn stroke(&mut self, path: &BezPath, style: &StrokeStyle, paint: InkPaint);

    /// Composite the current layer onto what is beneath it.
    fn pop_layer(&mut self);
}

/// One call recorded by `RecordingSurface`.
#[derive(Debug, Clone)]
pub enum SurfaceCommand {
    Background { image: String, rect: Rect },
    PushInkLayer { opacity: f64 },
    Stroke { path: BezPath, width: f64, paint: InkPaint },
    PopLayer,
}

/// Backend that records every call, for tests and inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    pub commands: Vec<SurfaceCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stroke commands issued inside an ink layer, with their layer depth.
    pub fn strokes(&self) -> impl Iterator<Item = (&SurfaceCommand, usize)> {
        let mut depth = 0usize;
        self.commands.iter().filter_map(move |command| match command {
            SurfaceCommand::PushInkLayer { .. } => {
                depth += 1;
                None
            }
            SurfaceCommand::PopLayer => {
                depth = depth.saturating_sub(1);
                None
            }
            SurfaceCommand::Stroke { .. } => Some((command, depth)),
            SurfaceCommand::Background { .. } => None,
        })
    }
}

impl InkSurface for RecordingSurface {
    fn draw_background(&mut self, image: &str, rect: Rect) {
        self.commands.push(SurfaceCommand::Background {
            image: image.to_string(),
            rect,
        });
    }

    fn push_ink_layer(&mut self, opacity: f64) {
        self.commands.push(SurfaceCommand::PushInkLayer { opacity });
    }

    fn stroke(&mut self, path: &BezPath, style: &StrokeStyle, paint: InkPaint) {
        self.commands.push(SurfaceCommand::Stroke {
            path: path.clone(),
            width: style.width,
            paint,
        });
    }

    fn pop_layer(&mut self) {
        self.commands.push(SurfaceCommand::PopLayer);
    }
}
