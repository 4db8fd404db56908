//! Overdraw App Library
//!
//! Inspection helpers behind the `overdraw` command-line tool.

pub mod error;
pub mod files;

pub use error::{AppError, AppResult};

use kurbo::Size;
use overdraw_core::{Stroke, StrokeRecord};
use overdraw_render::{PlanSummary, ReplayConfig, ReplayOptions, ReplayViewer};
use serde::Serialize;
use std::time::Duration;

/// Parameters for replaying a drawing once.
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest {
    /// Paper width the drawing was authored at.
    pub paper_width: f64,
    pub viewport: Size,
    pub auto_center: bool,
    /// Replay the reveal and sample it at this point; `None` shows the finished drawing.
    pub elapsed: Option<Duration>,
}

/// Summarize the plan a viewer would draw for `json`.
pub fn plan_summary(json: &str, request: &PlanRequest, config: ReplayConfig) -> PlanSummary {
    let options = ReplayOptions {
        animated: request.elapsed.is_some(),
        start_visible: false,
        auto_center: request.auto_center,
    };
    let viewer = ReplayViewer::from_json(
        "",
        json,
        request.paper_width,
        request.viewport,
        options,
        config,
    );
    viewer
        .plan_at(request.elapsed.unwrap_or_default())
        .summary()
}

/// One record that would be skipped on replay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub index: usize,
    pub reason: String,
}

/// Health of a stroke file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub total: usize,
    pub valid: usize,
    pub erasers: usize,
    pub points: usize,
    pub rejected: Vec<RejectedRecord>,
}

/// Decode every record and report which ones a replay would skip.
pub fn check_records(records: &[StrokeRecord]) -> CheckReport {
    let mut report = CheckReport {
        total: records.len(),
        valid: 0,
        erasers: 0,
        points: 0,
        rejected: Vec::new(),
    };
    for (index, record) in records.iter().enumerate() {
        match Stroke::from_record(record) {
            Ok(stroke) => {
                report.valid += 1;
                report.points += stroke.point_count();
                if stroke.is_eraser {
                    report.erasers += 1;
                }
            }
            Err(e) => report.rejected.push(RejectedRecord {
                index,
                reason: e.to_string(),
            }),
        }
    }
    report
}

/// Records that decode cleanly, in their original order.
pub fn valid_records(records: &[StrokeRecord]) -> Vec<StrokeRecord> {
    records
        .iter()
        .filter(|record| Stroke::from_record(record).is_ok())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAWING: &str = r##"[
        {"svgPath": "M 10 10 L 110 10", "color": "#000000", "width": 6},
        {"svgPath": "M 60 0 L 60 40", "color": "", "width": 12, "isEraser": true},
        {"svgPath": "garbage", "color": "#000000", "width": 6}
    ]"##;

    fn request(elapsed: Option<Duration>) -> PlanRequest {
        PlanRequest {
            paper_width: 400.0,
            viewport: Size::new(800.0, 800.0),
            auto_center: false,
            elapsed,
        }
    }

    #[test]
    fn test_plan_summary_static() {
        let summary = plan_summary(DRAWING, &request(None), ReplayConfig::default());
        assert_eq!(summary.stroke_count, 2);
        assert_eq!(summary.eraser_count, 1);
        assert!((summary.scale - 2.0).abs() < 1e-9);
        assert!((summary.progress - 1.0).abs() < f64::EPSILON);
        assert!((summary.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_plan_summary_mid_reveal() {
        let summary = plan_summary(
            DRAWING,
            &request(Some(Duration::from_millis(1100))),
            ReplayConfig::default(),
        );
        assert!((summary.progress - 0.5).abs() < 1e-9);
        assert!((summary.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_check_records() {
        let records = overdraw_core::records_from_json(DRAWING).unwrap();
        let report = check_records(&records);
        assert_eq!(report.total, 3);
        assert_eq!(report.valid, 2);
        assert_eq!(report.erasers, 1);
        assert_eq!(report.points, 4);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].index, 2);
    }

    #[test]
    fn test_valid_records_drop_rejected() {
        let records = overdraw_core::records_from_json(DRAWING).unwrap();
        let kept = valid_records(&records);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], records[0]);
        assert!(kept[1].is_eraser);
        assert!(check_records(&kept).rejected.is_empty());
    }
}
