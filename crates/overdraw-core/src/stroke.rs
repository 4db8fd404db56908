//! Stroke model and its portable record form.

use crate::error::{CoreError, CoreResult};
use kurbo::{BezPath, PathEl, Rect, Shape};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accuracy used when measuring stroke length.
const LENGTH_ACCURACY: f64 = 1e-3;

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> CoreResult<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || CoreError::InvalidColor(hex.to_string());
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };
        match digits.len() {
            3 => {
                let short = |i: usize| {
                    u8::from_str_radix(&digits[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(short(0)?, short(1)?, short(2)?, 255))
            }
            6 => Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for SerializableColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// The persisted form of a stroke, as handed to external storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeRecord {
    /// SVG path data in canvas space.
    pub svg_path: String,
    /// Hex color string.
    pub color: String,
    /// Thickness in canvas units.
    pub width: f64,
    #[serde(default)]
    pub is_eraser: bool,
}

/// One committed pen gesture in canvas space.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Move-to followed by quadratic and line segments.
    pub path: BezPath,
    /// Ink color, ignored for eraser strokes.
    pub color: SerializableColor,
    /// Thickness in canvas units (nominal width divided by the scale at draw time).
    pub width: f64,
    /// Whether this stroke clears ink instead of painting it.
    pub is_eraser: bool,
}

impl Stroke {
    /// Number of on-curve points in the path.
    pub fn point_count(&self) -> usize {
        count_points(&self.path)
    }

    /// Tight bounding box of the path, ignoring stroke width.
    pub fn bounds(&self) -> Rect {
        self.path.bounding_box()
    }

    /// Arc length of the path in canvas units.
    pub fn length(&self) -> f64 {
        self.path.perimeter(LENGTH_ACCURACY)
    }

    /// Convert into the portable record form.
    pub fn to_record(&self) -> StrokeRecord {
        StrokeRecord {
            svg_path: self.path.to_svg(),
            color: self.color.to_hex(),
            width: self.width,
            is_eraser: self.is_eraser,
        }
    }

    /// Decode a record. Eraser strokes tolerate an unreadable color.
    pub fn from_record(record: &StrokeRecord) -> CoreResult<Self> {
        let path = parse_path(&record.svg_path)
            .ok_or_else(|| CoreError::InvalidPath(record.svg_path.clone()))?;
        if !(record.width.is_finite() && record.width >= 0.0) {
            return Err(CoreError::InvalidWidth(record.width));
        }
        let color = match SerializableColor::from_hex(&record.color) {
            Ok(color) => color,
            Err(_) if record.is_eraser => SerializableColor::transparent(),
            Err(e) => return Err(e),
        };
        Ok(Self {
            path,
            color,
            width: record.width,
            is_eraser: record.is_eraser,
        })
    }
}

/// Parse SVG path data into a stroke path.
///
/// Returns `None` when the data does not parse, does not start with a move-to, or holds
/// fewer than two points.
pub fn parse_path(raw: &str) -> Option<BezPath> {
    let path = match BezPath::from_svg(raw.trim()) {
        Ok(path) => path,
        Err(e) => {
            let preview: String = raw.chars().take(64).collect();
            log::debug!("Unparsable path data ({e}): {preview}");
            return None;
        }
    };
    if !matches!(path.elements().first(), Some(PathEl::MoveTo(_))) {
        return None;
    }
    if count_points(&path) < 2 {
        return None;
    }
    Some(path)
}

fn count_points(path: &BezPath) -> usize {
    path.elements()
        .iter()
        .filter(|el| !matches!(el, PathEl::ClosePath))
        .count()
}

/// Parse a JSON array of stroke records, failing on the first malformed record.
pub fn records_from_json(json: &str) -> CoreResult<Vec<StrokeRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a JSON array of stroke records, dropping records that do not deserialize.
///
/// Input that is not a JSON array yields an empty list.
pub fn records_from_json_lenient(json: &str) -> Vec<StrokeRecord> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(json) {
        Ok(values) => values,
        Err(e) => {
            log::warn!("Stroke list is not a JSON array: {e}");
            return Vec::new();
        }
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping stroke record {index}: {e}");
                None
            }
        })
        .collect()
}

/// Serialize stroke records to a JSON array.
pub fn records_to_json(records: &[StrokeRecord]) -> CoreResult<String> {
    Ok(serde_json::to_string(records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    fn sample_stroke() -> Stroke {
        let mut path = BezPath::new();
        path.move_to(Point::new(10.0, 10.0));
        path.quad_to(Point::new(10.0, 10.0), Point::new(15.0, 12.5));
        path.line_to(Point::new(20.0, 15.0));
        Stroke {
            path,
            color: SerializableColor::new(255, 0, 0, 255),
            width: 3.0,
            is_eraser: false,
        }
    }

    #[test]
    fn test_hex_parsing() {
        assert_eq!(
            SerializableColor::from_hex("#000000").unwrap(),
            SerializableColor::black()
        );
        assert_eq!(
            SerializableColor::from_hex("#f0a").unwrap(),
            SerializableColor::new(255, 0, 170, 255)
        );
        assert_eq!(
            SerializableColor::from_hex("11223344").unwrap(),
            SerializableColor::new(0x11, 0x22, 0x33, 0x44)
        );
        assert!(SerializableColor::from_hex("#12345").is_err());
        assert!(SerializableColor::from_hex("#gggggg").is_err());
        assert!(SerializableColor::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(SerializableColor::black().to_hex(), "#000000");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::new(12, 34, 56, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }

    #[test]
    fn test_record_roundtrip() {
        let stroke = sample_stroke();
        let record = stroke.to_record();
        assert_eq!(record.color, "#ff0000");
        assert!(!record.is_eraser);

        let decoded = Stroke::from_record(&record).unwrap();
        assert_eq!(decoded.point_count(), 3);
        assert_eq!(decoded.color, stroke.color);
        assert!((decoded.width - 3.0).abs() < f64::EPSILON);
        assert_eq!(decoded.path.elements().len(), stroke.path.elements().len());
    }

    #[test]
    fn test_record_json_field_names() {
        let json = serde_json::to_string(&sample_stroke().to_record()).unwrap();
        assert!(json.contains("\"svgPath\""));
        assert!(json.contains("\"isEraser\":false"));
    }

    #[test]
    fn test_parse_path_rejects_bad_data() {
        assert!(parse_path("M0 0 L10 10").is_some());
        assert!(parse_path("M0 0").is_none());
        assert!(parse_path("").is_none());
        assert!(parse_path("this is not a path").is_none());
    }

    #[test]
    fn test_eraser_tolerates_bad_color() {
        let record = StrokeRecord {
            svg_path: "M0 0 L10 10".to_string(),
            color: "rgba(nope)".to_string(),
            width: 4.0,
            is_eraser: true,
        };
        let stroke = Stroke::from_record(&record).unwrap();
        assert_eq!(stroke.color, SerializableColor::transparent());

        let ink = StrokeRecord {
            is_eraser: false,
            ..record
        };
        assert!(matches!(
            Stroke::from_record(&ink),
            Err(CoreError::InvalidColor(_))
        ));
    }

    #[test]
    fn test_rejects_negative_width() {
        let record = StrokeRecord {
            svg_path: "M0 0 L10 10".to_string(),
            color: "#000".to_string(),
            width: -1.0,
            is_eraser: false,
        };
        assert!(matches!(
            Stroke::from_record(&record),
            Err(CoreError::InvalidWidth(_))
        ));
    }

    #[test]
    fn test_bounds_and_length() {
        let mut path = BezPath::new();
        path.move_to(Point::new(0.0, 0.0));
        path.line_to(Point::new(30.0, 40.0));
        let stroke = Stroke {
            path,
            color: SerializableColor::black(),
            width: 1.0,
            is_eraser: false,
        };
        let bounds = stroke.bounds();
        assert!((bounds.width() - 30.0).abs() < 1e-9);
        assert!((bounds.height() - 40.0).abs() < 1e-9);
        assert!((stroke.length() - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_lenient_list_skips_bad_records() {
        let json = r##"[
            {"svgPath": "M0 0 L1 1", "color": "#000000", "width": 2, "isEraser": false},
            {"svgPath": 42},
            {"svgPath": "M5 5 L6 6", "color": "#ffffff", "width": 1}
        ]"##;
        let records = records_from_json_lenient(json);
        assert_eq!(records.len(), 2);
        assert!(!records[1].is_eraser);

        assert!(records_from_json(json).is_err());
        assert!(records_from_json_lenient("{}").is_empty());
    }

    #[test]
    fn test_records_to_json_roundtrip() {
        let records = vec![sample_stroke().to_record()];
        let json = records_to_json(&records).unwrap();
        assert_eq!(records_from_json(&json).unwrap(), records);
    }
}
