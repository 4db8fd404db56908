//! Render plans: what to draw for one replay frame.

use crate::clock::FrameState;
use crate::surface::{InkPaint, InkSurface};
use kurbo::{
    Affine, BezPath, Cap, Join, ParamCurve, ParamCurveArclen, Rect, Shape, Size,
    Stroke as StrokeStyle, Vec2,
};
use overdraw_core::{Stroke, Transform};
use serde::Serialize;

/// The background image and where it lands in the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundLayer {
    /// Opaque image reference.
    pub image: String,
    /// Projected paper rectangle, in view coordinates.
    pub rect: Rect,
}

/// One stroke, projected into view coordinates.
#[derive(Debug, Clone)]
pub struct DrawCommand {
    /// Full stroke path in view coordinates.
    pub path: BezPath,
    /// Projected stroke width.
    pub width: f64,
    pub paint: InkPaint,
    /// Drawn fraction of the path, from its start.
    pub trim_end: f64,
}

impl DrawCommand {
    /// Round-capped, round-joined stroke style.
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::new(self.width)
            .with_caps(Cap::Round)
            .with_join(Join::Round)
    }

    /// The visible part of the path: the first `trim_end` of its arc length.
    pub fn trimmed_path(&self, accuracy: f64) -> BezPath {
        trim_path(&self.path, self.trim_end, accuracy)
    }
}

/// The ink drawn above the background, as one isolated layer.
#[derive(Debug, Clone)]
pub struct InkLayer {
    pub opacity: f64,
    /// Commands in paint order; later strokes draw over (or erase) earlier ones.
    pub commands: Vec<DrawCommand>,
}

/// Everything needed to draw one replay frame.
#[derive(Debug, Clone)]
pub struct RenderPlan {
    pub viewport: Size,
    /// Paper-to-view transform used for every layer.
    pub transform: Transform,
    pub background: BackgroundLayer,
    pub ink: InkLayer,
    pub frame: FrameState,
    /// Arc-length accuracy for trimming.
    pub trim_accuracy: f64,
}

/// Serializable digest of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub viewport: [f64; 2],
    pub scale: f64,
    pub translate: [f64; 2],
    pub background: [f64; 4],
    pub progress: f64,
    pub opacity: f64,
    pub stroke_count: usize,
    pub eraser_count: usize,
    /// Bounds of the projected ink, if any, as `[x0, y0, x1, y1]`.
    pub ink_bounds: Option<[f64; 4]>,
}

/// Inputs of `build_plan` that stay fixed across the frames of one replay.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub background: &'a str,
    pub strokes: &'a [Stroke],
    /// Paper size in paper coordinates.
    pub paper: Size,
    pub viewport: Size,
    pub transform: Transform,
    pub trim_accuracy: f64,
}

/// Build the plan for one frame. Same input, same plan.
pub fn build_plan(input: &PlanInput<'_>, frame: FrameState) -> RenderPlan {
    let affine = input.transform.affine();
    let paper = Rect::from_origin_size(kurbo::Point::ZERO, input.paper);

    let commands = input
        .strokes
        .iter()
        .map(|stroke| DrawCommand {
            path: affine * stroke.path.clone(),
            width: stroke.width * input.transform.scale,
            paint: if stroke.is_eraser {
                InkPaint::Clear
            } else {
                InkPaint::Ink(stroke.color)
            },
            trim_end: frame.progress,
        })
        .collect();

    RenderPlan {
        viewport: input.viewport,
        transform: input.transform,
        background: BackgroundLayer {
            image: input.background.to_string(),
            rect: affine.transform_rect_bbox(paper),
        },
        ink: InkLayer {
            opacity: frame.opacity,
            commands,
        },
        frame,
        trim_accuracy: input.trim_accuracy,
    }
}

impl RenderPlan {
    /// Drive a backend through the plan: background, then the isolated ink layer.
    pub fn replay<S: InkSurface + ?Sized>(&self, surface: &mut S) {
        surface.draw_background(&self.background.image, self.background.rect);
        surface.push_ink_layer(self.ink.opacity);
        for command in &self.ink.commands {
            let path = command.trimmed_path(self.trim_accuracy);
            if path.elements().is_empty() {
                continue;
            }
            surface.stroke(&path, &command.style(), command.paint);
        }
        surface.pop_layer();
    }

    /// The paper-to-view mapping as an affine.
    pub fn affine(&self) -> Affine {
        self.transform.affine()
    }

    /// Bounds of all projected ink, widths excluded.
    pub fn ink_bounds(&self) -> Option<Rect> {
        self.ink
            .commands
            .iter()
            .map(|c| c.path.bounding_box())
            .reduce(|acc, b| acc.union(b))
    }

    pub fn summary(&self) -> PlanSummary {
        let rect_array = |r: Rect| [r.x0, r.y0, r.x1, r.y1];
        let Vec2 { x: tx, y: ty } = self.transform.translate;
        PlanSummary {
            viewport: [self.viewport.width, self.viewport.height],
            scale: self.transform.scale,
            translate: [tx, ty],
            background: rect_array(self.background.rect),
            progress: self.frame.progress,
            opacity: self.frame.opacity,
            stroke_count: self.ink.commands.len(),
            eraser_count: self
                .ink
                .commands
                .iter()
                .filter(|c| c.paint == InkPaint::Clear)
                .count(),
            ink_bounds: self.ink_bounds().map(rect_array),
        }
    }
}

/// Finest arc-length accuracy used for trimming; kurbo's solvers do not terminate at zero.
const MIN_TRIM_ACCURACY: f64 = 1e-9;

/// Cut `path` after `fraction` of its total arc length.
fn trim_path(path: &BezPath, fraction: f64, accuracy: f64) -> BezPath {
    if fraction >= 1.0 {
        return path.clone();
    }
    if !(fraction > 0.0) {
        return BezPath::new();
    }
    let accuracy = if accuracy.is_finite() && accuracy >= MIN_TRIM_ACCURACY {
        accuracy
    } else {
        MIN_TRIM_ACCURACY
    };

    let lengths: Vec<f64> = path.segments().map(|seg| seg.arclen(accuracy)).collect();
    let total: f64 = lengths.iter().sum();
    if total <= 0.0 {
        return path.clone();
    }

    let mut remaining = total * fraction;
    let mut kept = Vec::new();
    for (seg, length) in path.segments().zip(lengths) {
        if remaining >= length {
            kept.push(seg);
            remaining -= length;
            continue;
        }
        if remaining > 0.0 {
            let t = seg.inv_arclen(remaining, accuracy);
            kept.push(seg.subsegment(0.0..t));
        }
        break;
    }
    BezPath::from_path_segments(kept.into_iter())
}
