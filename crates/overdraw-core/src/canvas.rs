//! Authoring surface: background, brush, gestures and history for one mounted canvas.

use crate::config::CanvasConfig;
use crate::error::{CoreError, CoreResult};
use crate::gesture::{Brush, GestureEffect, GestureMachine, GestureState};
use crate::history::History;
use crate::input::TouchEvent;
use crate::stroke::{self, SerializableColor, Stroke, StrokeRecord};
use crate::transform::Transform;
use kurbo::{Affine, Size};

/// Runtime state of a square drawing surface over a background image.
///
/// The paper is as wide as the view and `paper_aspect` times as tall. Strokes are stored in
/// paper coordinates, so the view width at mount time is the drawing's reference width.
#[derive(Debug, Clone)]
pub struct DrawingCanvas {
    config: CanvasConfig,
    /// Opaque image reference, resolved by whoever renders the background.
    background: String,
    paper: Size,
    /// Ink settings applied to the next finished stroke.
    pub brush: Brush,
    gestures: GestureMachine,
    history: History,
}

impl DrawingCanvas {
    /// Mount a canvas `view_width` pixels square over `background`.
    pub fn new(
        background: impl Into<String>,
        view_width: f64,
        config: CanvasConfig,
    ) -> CoreResult<Self> {
        config.validate()?;
        check_view_width(view_width)?;

        let paper = Size::new(view_width, view_width * config.paper_aspect);
        let mut gestures = GestureMachine::new(&config);
        gestures.transform_engine_mut().initial_fit(paper, view_width);

        Ok(Self {
            config,
            background: background.into(),
            paper,
            brush: Brush::default(),
            gestures,
            history: History::new(),
        })
    }

    /// Fit the paper to a new view size, e.g. after the surface is resized.
    ///
    /// Strokes keep their paper coordinates. A gesture in progress is aborted.
    pub fn remount(&mut self, view_width: f64) -> CoreResult<()> {
        check_view_width(view_width)?;
        self.gestures.abort();
        let engine = self.gestures.transform_engine_mut();
        engine.unmount();
        engine.initial_fit(self.paper, view_width);
        Ok(())
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn paper_size(&self) -> Size {
        self.paper
    }

    /// Width of the paper every stored coordinate is relative to.
    pub fn reference_paper_width(&self) -> f64 {
        self.paper.width
    }

    pub fn set_color(&mut self, color: SerializableColor) {
        self.brush.color = color;
    }

    /// Set the nominal on-screen width of new strokes.
    pub fn set_width(&mut self, width: f64) {
        self.brush.width = width;
    }

    pub fn set_eraser(&mut self, is_eraser: bool) {
        self.brush.is_eraser = is_eraser;
    }

    /// Feed a touch event through the gesture machine.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> GestureEffect {
        self.gestures.handle(event, &self.brush, &mut self.history)
    }

    /// Abort whatever gesture is running, e.g. when the surface loses focus.
    pub fn cancel_gesture(&mut self) -> GestureEffect {
        self.gestures.abort()
    }

    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    /// Current view transform.
    pub fn transform(&self) -> Transform {
        self.gestures.transform()
    }

    /// The stroke being drawn, for live display.
    pub fn preview_stroke(&self) -> Option<Stroke> {
        self.gestures.preview(&self.brush)
    }

    pub fn undo(&mut self) -> bool {
        self.history.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Remove all strokes.
    pub fn clear(&mut self) {
        self.history.clear();
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Committed strokes, unaffected by later edits.
    pub fn strokes(&self) -> Vec<Stroke> {
        self.history.snapshot()
    }

    /// Committed strokes in the portable record form.
    pub fn records(&self) -> Vec<StrokeRecord> {
        self.history.records()
    }

    /// Committed strokes as a JSON array.
    pub fn to_json(&self) -> CoreResult<String> {
        stroke::records_to_json(&self.history.records())
    }

    /// Replace the history with a previously saved drawing.
    ///
    /// Records authored on paper of a different width are rescaled to this paper.
    /// Undecodable records are skipped. Returns the number of strokes loaded.
    pub fn load_records(&mut self, records: &[StrokeRecord], reference_paper_width: f64) -> usize {
        let ratio = if reference_paper_width > 0.0 {
            self.paper.width / reference_paper_width
        } else {
            1.0
        };
        let rescale = Affine::scale(ratio);

        let strokes: Vec<Stroke> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match Stroke::from_record(record) {
                Ok(mut stroke) => {
                    stroke.path.apply_affine(rescale);
                    stroke.width *= ratio;
                    Some(stroke)
                }
                Err(e) => {
                    log::warn!("Skipping stroke {index} while loading: {e}");
                    None
                }
            })
            .collect();

        let loaded = strokes.len();
        self.history = History::from_strokes(strokes);
        loaded
    }
}

fn check_view_width(view_width: f64) -> CoreResult<()> {
    if !(view_width.is_finite() && view_width > 0.0) {
        return Err(CoreError::InvalidConfig(format!(
            "view width must be positive, got {view_width}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Shape};

    fn canvas() -> DrawingCanvas {
        DrawingCanvas::new("bg://paper.jpg", 400.0, CanvasConfig::default()).unwrap()
    }

    fn draw_line(canvas: &mut DrawingCanvas, from: Point, to: Point, samples: usize) {
        canvas.handle_touch(&TouchEvent::Down {
            touches: vec![from],
        });
        for i in 1..samples {
            let t = i as f64 / (samples - 1) as f64;
            canvas.handle_touch(&TouchEvent::Move {
                touches: vec![from.lerp(to, t)],
            });
        }
        canvas.handle_touch(&TouchEvent::Up { touches: vec![] });
    }

    #[test]
    fn test_mount_fits_paper() {
        let canvas = canvas();
        assert!((canvas.reference_paper_width() - 400.0).abs() < f64::EPSILON);
        assert!((canvas.paper_size().height - 400.0 * 4.0 / 3.0).abs() < 1e-9);
        assert!((canvas.transform().scale - 1.0).abs() < 1e-9);
        assert_eq!(canvas.background(), "bg://paper.jpg");
    }

    #[test]
    fn test_rejects_bad_view_width() {
        assert!(DrawingCanvas::new("bg", 0.0, CanvasConfig::default()).is_err());
        assert!(DrawingCanvas::new("bg", f64::NAN, CanvasConfig::default()).is_err());
    }

    #[test]
    fn test_fifty_point_stroke_record() {
        let mut canvas = canvas();
        canvas.set_color(SerializableColor::black());
        canvas.set_width(6.0);
        draw_line(&mut canvas, Point::new(20.0, 50.0), Point::new(380.0, 300.0), 50);

        let records = canvas.records();
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_eraser);
        assert_eq!(records[0].color, "#000000");
        assert!((records[0].width - 6.0 / canvas.transform().scale).abs() < 1e-9);
        assert_eq!(canvas.strokes()[0].point_count(), 51);
    }

    #[test]
    fn test_eraser_flag_is_recorded() {
        let mut canvas = canvas();
        canvas.set_eraser(true);
        draw_line(&mut canvas, Point::new(20.0, 50.0), Point::new(200.0, 50.0), 10);
        assert!(canvas.records()[0].is_eraser);
    }

    #[test]
    fn test_undo_redo_clear() {
        let mut canvas = canvas();
        draw_line(&mut canvas, Point::new(10.0, 10.0), Point::new(100.0, 10.0), 5);
        draw_line(&mut canvas, Point::new(10.0, 50.0), Point::new(100.0, 50.0), 5);
        assert!(canvas.undo());
        assert_eq!(canvas.strokes().len(), 1);
        assert!(canvas.can_redo());
        assert!(canvas.redo());
        assert_eq!(canvas.strokes().len(), 2);
        canvas.clear();
        assert!(!canvas.can_undo());
        assert!(!canvas.can_redo());
    }

    #[test]
    fn test_remount_refits_and_keeps_strokes() {
        let mut canvas = canvas();
        draw_line(&mut canvas, Point::new(20.0, 50.0), Point::new(200.0, 50.0), 10);
        let before = canvas.strokes();

        canvas.handle_touch(&TouchEvent::Down {
            touches: vec![Point::new(10.0, 10.0)],
        });
        canvas.remount(800.0).unwrap();
        assert_eq!(canvas.gesture_state(), GestureState::Idle);
        assert!((canvas.transform().scale - 2.0).abs() < 1e-9);
        assert_eq!(canvas.strokes(), before);
        assert!((canvas.reference_paper_width() - 400.0).abs() < f64::EPSILON);

        // New strokes land in the same paper coordinates at the new size.
        let t = canvas.transform();
        let from = t.canvas_to_view(Point::new(20.0, 100.0));
        let to = t.canvas_to_view(Point::new(200.0, 100.0));
        draw_line(&mut canvas, from, to, 10);
        let bounds = canvas.strokes()[1].bounds();
        assert!((bounds.x0 - 20.0).abs() < 1e-6);
        assert!((bounds.x1 - 200.0).abs() < 1e-6);

        assert!(canvas.remount(0.0).is_err());
    }

    #[test]
    fn test_json_roundtrip_through_load() {
        let mut canvas = canvas();
        draw_line(&mut canvas, Point::new(10.0, 10.0), Point::new(200.0, 120.0), 12);
        let json = canvas.to_json().unwrap();

        let records = stroke::records_from_json(&json).unwrap();
        let mut reopened = DrawingCanvas::new("bg", 800.0, CanvasConfig::default()).unwrap();
        assert_eq!(reopened.load_records(&records, 400.0), 1);

        let original = canvas.strokes()[0].bounds();
        let loaded = reopened.strokes()[0].bounds();
        assert!((loaded.width() - original.width() * 2.0).abs() < 1e-6);
        assert!((loaded.x0 - original.x0 * 2.0).abs() < 1e-6);
        assert!((reopened.strokes()[0].width - canvas.strokes()[0].width * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_load_skips_bad_records() {
        let mut canvas = canvas();
        let records = vec![
            StrokeRecord {
                svg_path: "M0 0 L10 10".to_string(),
                color: "#ff0000".to_string(),
                width: 2.0,
                is_eraser: false,
            },
            StrokeRecord {
                svg_path: "garbage".to_string(),
                color: "#ff0000".to_string(),
                width: 2.0,
                is_eraser: false,
            },
        ];
        assert_eq!(canvas.load_records(&records, 400.0), 1);
        assert_eq!(canvas.history().len(), 1);
    }

    #[test]
    fn test_preview_while_drawing() {
        let mut canvas = canvas();
        canvas.handle_touch(&TouchEvent::Down {
            touches: vec![Point::new(10.0, 10.0)],
        });
        canvas.handle_touch(&TouchEvent::Move {
            touches: vec![Point::new(60.0, 10.0)],
        });
        let preview = canvas.preview_stroke().unwrap();
        assert!(preview.path.bounding_box().width() > 0.0);
        assert_eq!(canvas.cancel_gesture(), GestureEffect::StrokeDiscarded);
        assert!(canvas.strokes().is_empty());
    }
}
