//! Overdraw Core Library
//!
//! Stroke model, view transform, gesture handling and undo history for drawing
//! freehand ink over a fixed background image.

pub mod builder;
pub mod canvas;
pub mod config;
pub mod error;
pub mod gesture;
pub mod history;
pub mod input;
pub mod stroke;
pub mod transform;

pub use builder::StrokeBuilder;
pub use canvas::DrawingCanvas;
pub use config::{CanvasConfig, PAPER_ASPECT};
pub use error::{CoreError, CoreResult};
pub use gesture::{Brush, GestureEffect, GestureMachine, GestureState};
pub use history::History;
pub use input::{TouchEvent, TouchId, TouchTracker};
pub use stroke::{
    parse_path, records_from_json, records_from_json_lenient, records_to_json,
    SerializableColor, Stroke, StrokeRecord,
};
pub use transform::{cover_fit_scale, PinchSnapshot, Transform, TransformEngine};
