//! Touch events and per-finger tracking.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Platform identifier of one finger for the duration of its contact.
pub type TouchId = u64;

/// A touch event as seen by the gesture machine.
///
/// Each variant carries the positions of every finger on the surface *after* the event,
/// in the order the fingers touched down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TouchEvent {
    /// A finger touched down.
    Down { touches: Vec<Point> },
    /// One or more fingers moved.
    Move { touches: Vec<Point> },
    /// A finger lifted. `touches` holds the fingers still down.
    Up { touches: Vec<Point> },
    /// The system took the gesture away (incoming call, app switch, ...).
    Cancel,
}

impl TouchEvent {
    /// Positions of the fingers on the surface after this event.
    pub fn touches(&self) -> &[Point] {
        match self {
            TouchEvent::Down { touches }
            | TouchEvent::Move { touches }
            | TouchEvent::Up { touches } => touches,
            TouchEvent::Cancel => &[],
        }
    }

    pub fn touch_count(&self) -> usize {
        self.touches().len()
    }
}

/// Tracks active fingers from per-finger platform callbacks and produces `TouchEvent`s.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    /// Active fingers in touch-down order.
    active: Vec<(TouchId, Point)>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// A finger touched down. A repeated id is treated as a move.
    pub fn down(&mut self, id: TouchId, position: Point) -> TouchEvent {
        if let Some(entry) = self.active.iter_mut().find(|(tid, _)| *tid == id) {
            entry.1 = position;
            return TouchEvent::Move {
                touches: self.positions(),
            };
        }
        self.active.push((id, position));
        TouchEvent::Down {
            touches: self.positions(),
        }
    }

    /// A finger moved. Unknown ids are ignored but still report the current fingers.
    pub fn moved(&mut self, id: TouchId, position: Point) -> TouchEvent {
        if let Some(entry) = self.active.iter_mut().find(|(tid, _)| *tid == id) {
            entry.1 = position;
        }
        TouchEvent::Move {
            touches: self.positions(),
        }
    }

    /// A finger lifted.
    pub fn up(&mut self, id: TouchId) -> TouchEvent {
        self.active.retain(|(tid, _)| *tid != id);
        TouchEvent::Up {
            touches: self.positions(),
        }
    }

    /// The platform cancelled every touch.
    pub fn cancel(&mut self) -> TouchEvent {
        self.active.clear();
        TouchEvent::Cancel
    }

    pub fn touch_count(&self) -> usize {
        self.active.len()
    }

    fn positions(&self) -> Vec<Point> {
        self.active.iter().map(|(_, p)| *p).collect()
    }
}
