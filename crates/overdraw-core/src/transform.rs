//! View transform for pan/zoom over a fixed content area.

use kurbo::{Affine, Point, Size, Vec2};

/// Affine mapping `view = canvas * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Uniform scale, always positive.
    pub scale: f64,
    /// Translation in view coordinates.
    pub translate: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

impl Transform {
    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    /// Get the affine transform from canvas to view coordinates.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Get the inverse transform, from view to canvas coordinates.
    pub fn inverse_affine(&self) -> Affine {
        Affine::scale(1.0 / self.scale) * Affine::translate(-self.translate)
    }

    /// Convert a view point to canvas coordinates.
    pub fn view_to_canvas(&self, view_point: Point) -> Point {
        self.inverse_affine() * view_point
    }

    /// Convert a canvas point to view coordinates.
    pub fn canvas_to_view(&self, canvas_point: Point) -> Point {
        self.affine() * canvas_point
    }
}

/// Smallest scale at which `content` fully covers `view`.
pub fn cover_fit_scale(content: Size, view: Size) -> f64 {
    (view.width / content.width).max(view.height / content.height)
}

/// State captured when a two-finger gesture starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchSnapshot {
    /// Distance between the two touches at gesture start.
    pub start_distance: f64,
    /// Scale at gesture start.
    pub start_scale: f64,
    /// Canvas point that sat under the midpoint at gesture start.
    pub anchor: Point,
}

/// Owns the transform of one mounted canvas and updates it for fit and pinch-zoom.
#[derive(Debug, Clone)]
pub struct TransformEngine {
    transform: Transform,
    content: Size,
    view: Size,
    max_scale: f64,
    initialized: bool,
    pinch: Option<PinchSnapshot>,
}

impl TransformEngine {
    /// Create an engine with the given zoom ceiling.
    pub fn new(max_scale: f64) -> Self {
        Self {
            transform: Transform::default(),
            content: Size::ZERO,
            view: Size::ZERO,
            max_scale,
            initialized: false,
            pinch: None,
        }
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn content_size(&self) -> Size {
        self.content
    }

    pub fn view_size(&self) -> Size {
        self.view
    }

    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Zoom floor: the cover-fit scale once content is mounted.
    pub fn min_scale(&self) -> f64 {
        if self.initialized {
            cover_fit_scale(self.content, self.view)
        } else {
            f64::MIN_POSITIVE
        }
    }

    /// Cover-fit the content into a square view and center it.
    ///
    /// Only the first call per mounted content has an effect; returns whether it ran.
    pub fn initial_fit(&mut self, content: Size, view_size: f64) -> bool {
        if self.initialized {
            return false;
        }
        if !(content.width > 0.0 && content.height > 0.0 && view_size > 0.0) {
            log::warn!("Ignoring fit for empty content {content:?} in view {view_size}");
            return false;
        }

        self.content = content;
        self.view = Size::new(view_size, view_size);
        let scale = cover_fit_scale(content, self.view);
        self.transform = Transform::new(
            scale,
            Vec2::new(
                (view_size - content.width * scale) / 2.0,
                (view_size - content.height * scale) / 2.0,
            ),
        );
        self.initialized = true;
        log::debug!("Initial fit: scale {scale:.4}, translate {:?}", self.transform.translate);
        true
    }

    /// Forget the mounted content so the next `initial_fit` runs again.
    pub fn unmount(&mut self) {
        self.initialized = false;
        self.pinch = None;
        self.transform = Transform::default();
    }

    /// Record the start of a pinch between two touches.
    pub fn begin_pinch(&mut self, a: Point, b: Point) {
        let midpoint = a.midpoint(b);
        self.pinch = Some(PinchSnapshot {
            start_distance: a.distance(b),
            start_scale: self.transform.scale,
            anchor: self.transform.view_to_canvas(midpoint),
        });
    }

    /// Apply a pinch update. Returns false if no pinch is in progress.
    ///
    /// The anchor recorded at `begin_pinch` is placed under the current midpoint first and
    /// the translation is clamped afterwards.
    pub fn update_pinch(&mut self, a: Point, b: Point) -> bool {
        let Some(snapshot) = self.pinch else {
            return false;
        };

        let ratio = if snapshot.start_distance > f64::EPSILON {
            a.distance(b) / snapshot.start_distance
        } else {
            1.0
        };
        // max() last so the cover floor wins if a ceiling is configured below it
        let scale = (snapshot.start_scale * ratio)
            .min(self.max_scale)
            .max(self.min_scale());

        let midpoint = a.midpoint(b);
        self.transform = Transform::new(
            scale,
            midpoint.to_vec2() - snapshot.anchor.to_vec2() * scale,
        );
        self.clamp_translation();
        true
    }

    /// Finish the pinch, leaving the transform where it is.
    pub fn end_pinch(&mut self) {
        self.pinch = None;
    }

    pub fn is_pinching(&self) -> bool {
        self.pinch.is_some()
    }

    pub fn pinch_snapshot(&self) -> Option<&PinchSnapshot> {
        self.pinch.as_ref()
    }

    fn clamp_translation(&mut self) {
        if !self.initialized {
            return;
        }
        let scale = self.transform.scale;
        self.transform.translate = Vec2::new(
            clamp_axis(
                self.transform.translate.x,
                self.content.width * scale,
                self.view.width,
            ),
            clamp_axis(
                self.transform.translate.y,
                self.content.height * scale,
                self.view.height,
            ),
        );
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_SCALE)
    }
}

/// Keep scaled content covering the view on one axis, or center it if it is smaller.
fn clamp_axis(translate: f64, scaled_content: f64, view: f64) -> f64 {
    if scaled_content >= view {
        translate.clamp(view - scaled_content, 0.0)
    } else {
        (view - scaled_content) / 2.0
    }
}
