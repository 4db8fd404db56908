//! Incremental stroke construction with midpoint smoothing.

use crate::stroke::{SerializableColor, Stroke};
use crate::transform::Transform;
use kurbo::{BezPath, Point};

/// State of a stroke being drawn.
#[derive(Debug, Clone)]
struct ActiveStroke {
    /// Smoothed path accumulated so far, in canvas coordinates.
    path: BezPath,
    /// Last accepted sample, in canvas coordinates.
    last_point: Point,
    /// Number of accepted samples.
    point_count: usize,
}

/// Turns view-space touch samples into one smoothed canvas-space stroke.
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    /// Samples this close (canvas units) to the last accepted one are ignored.
    min_segment_distance: f64,
    active: Option<ActiveStroke>,
}

impl Default for StrokeBuilder {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MIN_SEGMENT_DISTANCE)
    }
}

impl StrokeBuilder {
    pub fn new(min_segment_distance: f64) -> Self {
        Self {
            min_segment_distance,
            active: None,
        }
    }

    /// Start a new stroke at a view point. Any stroke in progress is dropped.
    pub fn begin(&mut self, view_point: Point, transform: &Transform) {
        let point = transform.view_to_canvas(view_point);
        let mut path = BezPath::new();
        path.move_to(point);
        self.active = Some(ActiveStroke {
            path,
            last_point: point,
            point_count: 1,
        });
    }

    /// Add a sample. Returns whether it produced a new segment.
    ///
    /// Each accepted sample adds a quadratic that uses the previous sample as control and
    /// ends halfway to the new one, so the curve trails the finger by half a segment.
    pub fn extend(&mut self, view_point: Point, transform: &Transform) -> bool {
        let Some(active) = &mut self.active else {
            return false;
        };
        let point = transform.view_to_canvas(view_point);
        if active.last_point.distance(point) <= self.min_segment_distance {
            return false;
        }

        active
            .path
            .quad_to(active.last_point, active.last_point.midpoint(point));
        active.last_point = point;
        active.point_count += 1;
        true
    }

    /// Close the stroke and return it, or `None` if fewer than two samples were accepted.
    ///
    /// `width` is the nominal on-screen width; the stored width is divided by the current
    /// scale so it stays fixed relative to the canvas.
    pub fn finish(
        &mut self,
        color: SerializableColor,
        width: f64,
        is_eraser: bool,
        transform: &Transform,
    ) -> Option<Stroke> {
        let mut active = self.active.take()?;
        if active.point_count < 2 {
            return None;
        }
        active.path.line_to(active.last_point);
        Some(Stroke {
            path: active.path,
            color,
            width: width / transform.scale,
            is_eraser,
        })
    }

    /// Drop the stroke in progress without producing anything.
    pub fn cancel(&mut self) {
        self.active = None;
    }

    /// Check if a stroke is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Number of samples accepted for the stroke in progress.
    pub fn point_count(&self) -> usize {
        self.active.as_ref().map_or(0, |a| a.point_count)
    }

    /// The stroke in progress, as it would look if finished now.
    pub fn preview(
        &self,
        color: SerializableColor,
        width: f64,
        is_eraser: bool,
        transform: &Transform,
    ) -> Option<Stroke> {
        let active = self.active.as_ref()?;
        if active.point_count < 2 {
            return None;
        }
        let mut path = active.path.clone();
        path.line_to(active.last_point);
        Some(Stroke {
            path,
            color,
            width: width / transform.scale,
            is_eraser,
        })
    }

    pub fn min_segment_distance(&self) -> f64 {
        self.min_segment_distance
    }
}
