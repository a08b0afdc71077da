//! core::encode
//!
//! Path encoder: walks normalized text against an anchor map.
//!
//! # Algorithm
//!
//! The encoder tracks the pen (current drawing location) and the previous
//! pen position. For each character:
//!
//! - No anchor: skipped entirely
//! - First mapped character: `Move` to its anchor
//! - Revisited character with ticks enabled: `Line` to the anchor followed
//!   by a `Tick` whose endpoint is perpendicular to the incoming direction;
//!   the pen moves to the notch endpoint
//! - Otherwise: `Line` to the anchor
//!
//! Encoding is deterministic: the same text and lattice always produce the
//! same events, bit for bit.

use crate::core::lattice::GenerationRules;
use crate::core::normalize::normalize;
use crate::core::path::{EncodedPath, PathEvent};
use crate::core::types::{AnchorMap, Point};

/// Below this length a direction vector is treated as zero.
const DIRECTION_EPSILON: f64 = 1e-12;

/// Encode text into a path over the given anchors.
///
/// The text is normalized first (unsupported characters replaced). Characters
/// with no anchor are dropped silently.
///
/// # Example
///
/// ```
/// use qbc::core::encode::encode;
/// use qbc::core::lattice::GenerationRules;
/// use qbc::core::path::PathEvent;
/// use qbc::core::types::{AnchorMap, Point};
///
/// let mut anchors = AnchorMap::new();
/// anchors.insert('A', Point::raw(0.5, 0.5));
///
/// let path = encode("aa", &anchors, &GenerationRules::default());
/// assert_eq!(path.visited_chars, vec!['A', 'A']);
/// assert_eq!(path.visit_counts[&'A'], 2);
/// assert!(matches!(path.events[0], PathEvent::Move { ch: 'A', .. }));
/// assert!(matches!(path.events[1], PathEvent::Line { ch: 'A', .. }));
/// assert!(matches!(path.events[2], PathEvent::Tick { ch: 'A', .. }));
/// ```
pub fn encode(text: &str, anchors: &AnchorMap, rules: &GenerationRules) -> EncodedPath {
    let normalized = normalize(text, true);
    let mut path = EncodedPath::new();

    // (pen, previous pen) once the first anchor has been placed
    let mut pens: Option<(Point, Point)> = None;

    for ch in normalized.chars() {
        let Some(&anchor) = anchors.get(&ch) else {
            continue;
        };

        let revisit = path.visit_counts.contains_key(&ch);
        path.visit(ch);

        let Some((pen, prev_pen)) = pens else {
            path.events.push(PathEvent::Move {
                ch,
                x: anchor.x,
                y: anchor.y,
            });
            pens = Some((anchor, anchor));
            continue;
        };

        path.events.push(PathEvent::Line {
            ch,
            x: anchor.x,
            y: anchor.y,
        });

        if revisit && rules.enable_tick {
            let end = tick_endpoint(pen, prev_pen, anchor, rules);
            path.events.push(PathEvent::Tick {
                ch,
                x: anchor.x,
                y: anchor.y,
                tick_end_x: end.x,
                tick_end_y: end.y,
            });
            pens = Some((end, pen));
        } else {
            pens = Some((anchor, pen));
        }
    }

    path
}

/// Compute the notch endpoint for a revisit of `anchor`.
///
/// The incoming direction is `pen -> anchor`. When the pen already sits on
/// the anchor (an immediate double), the previous pen position is used
/// instead; if that is also degenerate the direction defaults to `+x`.
pub(crate) fn tick_endpoint(
    pen: Point,
    prev_pen: Point,
    anchor: Point,
    rules: &GenerationRules,
) -> Point {
    let (dx, dy) = unit_direction(pen, anchor)
        .or_else(|| unit_direction(prev_pen, anchor))
        .unwrap_or((1.0, 0.0));

    let len = rules.tick_length_factor;
    let candidates = [(-dy, dx), (dy, -dx)].map(|(px, py)| {
        Point::raw(anchor.x + px * len, anchor.y + py * len)
    });

    let chosen = if rules.inside_boundary_preference {
        // Stable: the first candidate keeps ties
        let mut ranked: Vec<(usize, f64)> = candidates
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.edge_margin()))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates[ranked[0].0]
    } else {
        candidates[0]
    };

    chosen.clamp_unit()
}

fn unit_direction(from: Point, to: Point) -> Option<(f64, f64)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len = dx.hypot(dy);
    (len > DIRECTION_EPSILON).then(|| (dx / len, dy / len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchors(points: &[(char, f64, f64)]) -> AnchorMap {
        points
            .iter()
            .map(|&(c, x, y)| (c, Point::raw(x, y)))
            .collect()
    }

    #[test]
    fn immediate_double_at_centre() {
        let map = anchors(&[('A', 0.5, 0.5), ('B', 0.1, 0.1)]);
        let path = encode("AA", &map, &GenerationRules::default());

        assert_eq!(path.events.len(), 3);
        assert_eq!(
            path.events[0],
            PathEvent::Move {
                ch: 'A',
                x: 0.5,
                y: 0.5
            }
        );
        assert_eq!(
            path.events[1],
            PathEvent::Line {
                ch: 'A',
                x: 0.5,
                y: 0.5
            }
        );
        // No incoming direction: defaults to +x, first perpendicular is +y
        match path.events[2] {
            PathEvent::Tick {
                ch,
                tick_end_x,
                tick_end_y,
                ..
            } => {
                assert_eq!(ch, 'A');
                assert!((tick_end_x - 0.5).abs() < 1e-12);
                assert!((tick_end_y - 0.58).abs() < 1e-12);
            }
            other => panic!("expected tick, got {other:?}"),
        }
        assert_eq!(path.visited_chars, vec!['A', 'A']);
        assert_eq!(path.visit_counts.get(&'A'), Some(&2));
    }

    #[test]
    fn immediate_double_uses_previous_pen_direction() {
        // B -> A travels along +x, so the notch is vertical
        let map = anchors(&[('A', 0.5, 0.9), ('B', 0.1, 0.9)]);
        let path = encode("BAA", &map, &GenerationRules::default());

        match path.events[3] {
            PathEvent::Tick {
                tick_end_x,
                tick_end_y,
                ..
            } => {
                assert!((tick_end_x - 0.5).abs() < 1e-12);
                // Downward keeps the notch further from the top edge
                assert!((tick_end_y - 0.82).abs() < 1e-12);
            }
            other => panic!("expected tick, got {other:?}"),
        }
    }

    #[test]
    fn non_adjacent_revisit_ticks() {
        let map = anchors(&[('A', 0.2, 0.2), ('B', 0.8, 0.2)]);
        let path = encode("ABA", &map, &GenerationRules::default());
        let kinds: Vec<_> = path
            .events
            .iter()
            .map(|e| match e {
                PathEvent::Move { .. } => "move",
                PathEvent::Line { .. } => "line",
                PathEvent::Tick { .. } => "tick",
            })
            .collect();
        assert_eq!(kinds, ["move", "line", "line", "tick"]);
    }

    #[test]
    fn pen_continues_from_notch() {
        let map = anchors(&[('A', 0.5, 0.5), ('B', 0.9, 0.5)]);
        let path = encode("AAB", &map, &GenerationRules::default());
        let notch = path.events[2].pen_after();
        assert_ne!(notch, Point::raw(0.5, 0.5));
        assert_eq!(path.events[3].anchor(), Point::raw(0.9, 0.5));
    }

    #[test]
    fn ticks_disabled() {
        let map = anchors(&[('A', 0.5, 0.5)]);
        let rules = GenerationRules {
            enable_tick: false,
            ..Default::default()
        };
        let path = encode("AAA", &map, &rules);
        assert_eq!(path.events.len(), 3);
        assert!(path
            .events
            .iter()
            .all(|e| !matches!(e, PathEvent::Tick { .. })));
    }

    #[test]
    fn unmapped_characters_are_dropped() {
        let map = anchors(&[('H', 0.1, 0.1), ('I', 0.9, 0.9)]);
        let path = encode("Hi there!", &map, &GenerationRules::default());
        assert_eq!(path.text(), "HIH");
        assert!(!path.visit_counts.contains_key(&' '));
    }

    #[test]
    fn empty_text_gives_empty_path() {
        let map = anchors(&[('A', 0.5, 0.5)]);
        let path = encode("", &map, &GenerationRules::default());
        assert!(path.is_empty());
        assert!(path.visited_chars.is_empty());
    }

    #[test]
    fn corner_tick_stays_inside() {
        let map = anchors(&[('A', 0.0, 0.0), ('B', 1.0, 1.0)]);
        let path = encode("BAA", &map, &GenerationRules::default());
        for event in &path.events {
            if let PathEvent::Tick {
                tick_end_x,
                tick_end_y,
                ..
            } = *event
            {
                assert!((0.0..=1.0).contains(&tick_end_x));
                assert!((0.0..=1.0).contains(&tick_end_y));
            }
        }
    }

    #[test]
    fn boundary_preference_off_takes_first_candidate() {
        let rules = GenerationRules {
            inside_boundary_preference: false,
            ..Default::default()
        };
        // Incoming +x; first candidate is +y, which would be clamped at the top
        let end = tick_endpoint(
            Point::raw(0.1, 0.98),
            Point::raw(0.1, 0.98),
            Point::raw(0.5, 0.98),
            &rules,
        );
        assert_eq!(end.y, 1.0);

        let end = tick_endpoint(
            Point::raw(0.1, 0.98),
            Point::raw(0.1, 0.98),
            Point::raw(0.5, 0.98),
            &GenerationRules::default(),
        );
        assert!((end.y - 0.90).abs() < 1e-12);
    }

    #[test]
    fn deterministic() {
        let map = crate::core::lattice::Lattice::standard().anchors;
        let a = encode("MISSISSIPPI RIVER", &map, &GenerationRules::default());
        let b = encode("MISSISSIPPI RIVER", &map, &GenerationRules::default());
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
