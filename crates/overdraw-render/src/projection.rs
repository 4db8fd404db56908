//! Projection of paper coordinates onto a replay viewport.

use crate::config::ReplayConfig;
use kurbo::{Point, Rect, Size, Vec2};
use overdraw_core::{Stroke, Transform};

/// Scale the paper to the viewport width and center it vertically.
pub fn standard_projection(
    reference_paper_width: f64,
    paper_aspect: f64,
    viewport: Size,
) -> Transform {
    if !(reference_paper_width > 0.0) {
        return Transform::default();
    }
    let scale = viewport.width / reference_paper_width;
    let paper_height = reference_paper_width * paper_aspect;
    Transform::new(
        scale,
        Vec2::new(0.0, (viewport.height - paper_height * scale) / 2.0),
    )
}

/// Union of the bounding boxes of every stroke path.
pub fn content_bounds(strokes: &[Stroke]) -> Option<Rect> {
    strokes
        .iter()
        .map(Stroke::bounds)
        .reduce(|acc, bounds| acc.union(bounds))
}

/// Fit the stroke content into the viewport, centered, with padding.
///
/// Returns `None` when the content is below the noise floor on either side.
pub fn content_fit_projection(
    strokes: &[Stroke],
    viewport: Size,
    config: &ReplayConfig,
) -> Option<Transform> {
    let bounds = content_bounds(strokes)?;
    let floor = config.content_noise_floor;
    if bounds.width() <= floor || bounds.height() <= floor {
        return None;
    }

    let available = Size::new(
        (viewport.width - config.content_padding).max(1.0),
        (viewport.height - config.content_padding).max(1.0),
    );
    let scale = (available.width / bounds.width())
        .min(available.height / bounds.height())
        .min(config.max_content_scale);

    let center = bounds.center();
    let viewport_center = Point::new(viewport.width / 2.0, viewport.height / 2.0);
    Some(Transform::new(
        scale,
        Vec2::new(
            viewport_center.x - center.x * scale,
            viewport_center.y - center.y * scale,
        ),
    ))
}

/// Pick the projection for a replay.
pub fn project(
    strokes: &[Stroke],
    reference_paper_width: f64,
    viewport: Size,
    auto_center: bool,
    config: &ReplayConfig,
) -> Transform {
    if auto_center {
        if let Some(transform) = content_fit_projection(strokes, viewport, config) {
            return transform;
        }
        log::debug!("Content below noise floor, using standard projection");
    }
    standard_projection(reference_paper_width, config.paper_aspect, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::BezPath;
    use overdraw_core::SerializableColor;

    const EPS: f64 = 1e-9;

    fn line(from: Point, to: Point) -> Stroke {
        let mut path = BezPath::new();
        path.move_to(from);
        path.line_to(to);
        Stroke {
            path,
            color: SerializableColor::black(),
            width: 2.0,
            is_eraser: false,
        }
    }

    #[test]
    fn test_standard_projection() {
        let t = standard_projection(400.0, 4.0 / 3.0, Size::new(800.0, 800.0));
        assert!((t.scale - 2.0).abs() < EPS);
        assert!(t.translate.x.abs() < EPS);
        assert!((t.translate.y - (800.0 - 400.0 * 4.0 / 3.0 * 2.0) / 2.0).abs() < EPS);

        // Same aspect as the paper: no vertical offset.
        let t = standard_projection(300.0, 4.0 / 3.0, Size::new(150.0, 200.0));
        assert!((t.scale - 0.5).abs() < EPS);
        assert!(t.translate.y.abs() < EPS);
    }

    #[test]
    fn test_standard_projection_bad_reference() {
        let t = standard_projection(0.0, 4.0 / 3.0, Size::new(100.0, 100.0));
        assert_eq!(t, Transform::default());
    }

    #[test]
    fn test_content_bounds_union() {
        let strokes = vec![
            line(Point::new(10.0, 20.0), Point::new(30.0, 40.0)),
            line(Point::new(-5.0, 50.0), Point::new(0.0, 60.0)),
        ];
        let bounds = content_bounds(&strokes).unwrap();
        assert_eq!(bounds, Rect::new(-5.0, 20.0, 30.0, 60.0));
        assert!(content_bounds(&[]).is_none());
    }

    #[test]
    fn test_content_fit_centers_box() {
        let config = ReplayConfig::default();
        let strokes = vec![line(Point::new(100.0, 100.0), Point::new(200.0, 150.0))];
        let viewport = Size::new(240.0, 240.0);
        let t = content_fit_projection(&strokes, viewport, &config).unwrap();

        // (240 - 40) / 100 = 2 beats (240 - 40) / 50 = 4
        assert!((t.scale - 2.0).abs() < EPS);
        let center = t.canvas_to_view(Point::new(150.0, 125.0));
        assert!((center.x - 120.0).abs() < EPS);
        assert!((center.y - 120.0).abs() < EPS);
    }

    #[test]
    fn test_content_fit_caps_scale() {
        let config = ReplayConfig::default();
        let strokes = vec![line(Point::new(0.0, 0.0), Point::new(20.0, 20.0))];
        let t = content_fit_projection(&strokes, Size::new(1000.0, 1000.0), &config).unwrap();
        assert!((t.scale - 5.0).abs() < EPS);
    }

    #[test]
    fn test_tiny_content_falls_back() {
        let config = ReplayConfig::default();
        let strokes = vec![line(Point::new(100.0, 100.0), Point::new(300.0, 105.0))];
        let viewport = Size::new(200.0, 300.0);
        assert!(content_fit_projection(&strokes, viewport, &config).is_none());

        let t = project(&strokes, 400.0, viewport, true, &config);
        assert_eq!(t, standard_projection(400.0, config.paper_aspect, viewport));
    }
}
