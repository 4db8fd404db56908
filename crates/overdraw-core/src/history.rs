//! Committed strokes with undo/redo.

use crate::stroke::{Stroke, StrokeRecord};

/// Committed strokes plus a LIFO buffer of undone ones.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// Committed strokes, oldest first.
    committed: Vec<Stroke>,
    /// Strokes removed by undo, most recent last.
    undone: Vec<Stroke>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history from already committed strokes, with no redo buffer.
    pub fn from_strokes(strokes: Vec<Stroke>) -> Self {
        Self {
            committed: strokes,
            undone: Vec::new(),
        }
    }

    /// Commit a stroke. Clears the redo buffer.
    pub fn add(&mut self, stroke: Stroke) {
        self.committed.push(stroke);
        self.undone.clear();
    }

    /// Undo the last committed stroke.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        if let Some(stroke) = self.committed.pop() {
            self.undone.push(stroke);
            true
        } else {
            false
        }
    }

    /// Redo the last undone stroke.
    /// Returns true if redo was performed, false if nothing to redo.
    pub fn redo(&mut self) -> bool {
        if let Some(stroke) = self.undone.pop() {
            self.committed.push(stroke);
            true
        } else {
            false
        }
    }

    /// Drop everything, including the redo buffer.
    pub fn clear(&mut self) {
        self.committed.clear();
        self.undone.clear();
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.committed.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Committed strokes in draw order.
    pub fn strokes(&self) -> &[Stroke] {
        &self.committed
    }

    /// Independent copy of the committed strokes.
    pub fn snapshot(&self) -> Vec<Stroke> {
        self.committed.clone()
    }

    /// Committed strokes in their portable form.
    pub fn records(&self) -> Vec<StrokeRecord> {
        self.committed.iter().map(Stroke::to_record).collect()
    }

    pub fn len(&self) -> usize {
        self.committed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::SerializableColor;
    use kurbo::{BezPath, Point};

    fn stroke(x: f64) -> Stroke {
        let mut path = BezPath::new();
        path.move_to(Point::new(x, 0.0));
        path.line_to(Point::new(x, 10.0));
        Stroke {
            path,
            color: SerializableColor::black(),
            width: 2.0,
            is_eraser: false,
        }
    }

    #[test]
    fn test_undo_redo_inverse() {
        let mut history = History::new();
        for x in [1.0, 2.0, 3.0] {
            history.add(stroke(x));
        }
        let before = history.snapshot();

        assert!(history.undo());
        assert_eq!(history.len(), 2);
        assert!(history.redo());
        assert_eq!(history.snapshot(), before);

        assert!(history.undo());
        assert!(history.undo());
        assert!(history.redo());
        assert!(history.redo());
        assert_eq!(history.snapshot(), before);
    }

    #[test]
    fn test_add_clears_redo() {
        let mut history = History::new();
        history.add(stroke(1.0));
        history.add(stroke(2.0));
        history.undo();
        history.undo();
        assert!(history.can_redo());

        history.add(stroke(3.0));
        assert!(!history.can_redo());
        assert!(!history.redo());
        assert_eq!(history.snapshot(), vec![stroke(3.0)]);
    }

    #[test]
    fn test_noops_on_empty() {
        let mut history = History::new();
        assert!(!history.undo());
        assert!(!history.redo());
        assert!(history.is_empty());
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut history = History::new();
        history.add(stroke(1.0));
        history.add(stroke(2.0));
        history.undo();
        history.clear();
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut history = History::new();
        history.add(stroke(1.0));
        let snapshot = history.snapshot();
        history.add(stroke(2.0));
        history.clear();
        assert_eq!(snapshot, vec![stroke(1.0)]);
    }

    #[test]
    fn test_records() {
        let history = History::from_strokes(vec![stroke(1.0), stroke(2.0)]);
        let records = history.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].color, "#000000");
        assert!(!history.can_redo());
    }
}
