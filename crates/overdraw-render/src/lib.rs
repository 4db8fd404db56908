//! Overdraw Render Library
//!
//! Replays saved drawings: projects paper coordinates onto a viewport, drives the reveal
//! animation and produces render plans for any `InkSurface` backend.

pub mod clock;
pub mod config;
pub mod plan;
pub mod projection;
pub mod surface;
pub mod viewer;

pub use clock::{FrameState, RevealAnimation, RevealTiming};
pub use config::ReplayConfig;
pub use plan::{
    build_plan, BackgroundLayer, DrawCommand, InkLayer, PlanInput, PlanSummary, RenderPlan,
};
pub use projection::{content_bounds, content_fit_projection, project, standard_projection};
pub use surface::{InkPaint, InkSurface, RecordingSurface, SurfaceCommand};
pub use viewer::{ReplayOptions, ReplayViewer};
