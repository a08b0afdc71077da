//! core::path
//!
//! Encoded path representation.
//!
//! An [`EncodedPath`] is an ordered list of [`PathEvent`]s plus the
//! bookkeeping needed to recover text without re-reading geometry.
//!
//! # Wire Format
//!
//! ```json
//! {
//!   "events": [
//!     { "type": "move", "char": "A", "x": 0.5, "y": 0.5 },
//!     { "type": "line", "char": "A", "x": 0.5, "y": 0.5 },
//!     { "type": "tick", "char": "A", "x": 0.5, "y": 0.5, "tickEndX": 0.5, "tickEndY": 0.58 }
//!   ],
//!   "visitedChars": ["A", "A"],
//!   "visitCounts": { "A": 2 }
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::types::Point;

/// A single drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PathEvent {
    /// Lift the pen and place it on an anchor. Always the first event.
    Move {
        #[serde(rename = "char")]
        ch: char,
        x: f64,
        y: f64,
    },

    /// Draw from the current pen position to an anchor.
    Line {
        #[serde(rename = "char")]
        ch: char,
        x: f64,
        y: f64,
    },

    /// Notch drawn at a revisited anchor.
    ///
    /// The pen ends at the notch endpoint, not at the anchor.
    Tick {
        #[serde(rename = "char")]
        ch: char,
        x: f64,
        y: f64,
        #[serde(rename = "tickEndX")]
        tick_end_x: f64,
        #[serde(rename = "tickEndY")]
        tick_end_y: f64,
    },
}

impl PathEvent {
    /// The character that produced this event.
    pub fn ch(&self) -> char {
        match *self {
            PathEvent::Move { ch, .. } | PathEvent::Line { ch, .. } | PathEvent::Tick { ch, .. } => {
                ch
            }
        }
    }

    /// The anchor this event refers to.
    pub fn anchor(&self) -> Point {
        match *self {
            PathEvent::Move { x, y, .. } | PathEvent::Line { x, y, .. } | PathEvent::Tick { x, y, .. } => {
                Point::raw(x, y)
            }
        }
    }

    /// Where the pen rests once this event has been drawn.
    pub fn pen_after(&self) -> Point {
        match *self {
            PathEvent::Tick {
                tick_end_x,
                tick_end_y,
                ..
            } => Point::raw(tick_end_x, tick_end_y),
            _ => self.anchor(),
        }
    }
}

/// The result of encoding text against a lattice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedPath {
    /// Drawing instructions in order
    pub events: Vec<PathEvent>,

    /// Every character that was visited, repeats included
    pub visited_chars: Vec<char>,

    /// Occurrences per visited character
    pub visit_counts: BTreeMap<char, usize>,
}

impl EncodedPath {
    /// Create an empty path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visited character.
    pub fn visit(&mut self, ch: char) {
        self.visited_chars.push(ch);
        *self.visit_counts.entry(ch).or_insert(0) += 1;
    }

    /// The visited characters joined in order.
    pub fn text(&self) -> String {
        self.visited_chars.iter().collect()
    }

    /// Returns true if the path contains no drawing events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of drawing events.
    pub fn len(&self) -> usize {
        self.events.len()
    }
}
