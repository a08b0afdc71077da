//! core::types
//!
//! Shared geometric and alphabet types.
//!
//! # Types
//!
//! - [`Point`] - A 2D point in normalized lattice space
//! - [`AnchorMap`] - Character to anchor point mapping
//! - [`TypeError`] - Validation failures for the primitive types
//!
//! # Alphabet
//!
//! The codec supports exactly the uppercase letters `A`-`Z` and the space
//! character. Anything else is dropped during normalization.
//!
//! # Examples
//!
//! ```
//! use qbc::core::types::{is_supported, Point};
//!
//! assert!(is_supported('Q'));
//! assert!(is_supported(' '));
//! assert!(!is_supported('q'));
//!
//! let p = Point::new(0.25, 1.0).unwrap();
//! assert!(p.in_unit_square());
//! assert!(Point::new(1.5, 0.0).is_err());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq)]
pub enum TypeError {
    #[error("unsupported character {0:?}")]
    UnsupportedChar(char),

    #[error("point ({x}, {y}) is outside the unit square")]
    OutOfBounds { x: f64, y: f64 },

    #[error("point coordinates must be finite")]
    NonFinite,
}

/// Every character the codec can place on a lattice, in canonical order.
pub const ALPHABET: [char; 27] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', ' ',
];

/// Returns true if `c` belongs to the supported alphabet.
pub fn is_supported(c: char) -> bool {
    c.is_ascii_uppercase() || c == ' '
}

/// A point in normalized lattice space.
///
/// Lattice anchors live in `[0,1]x[0,1]`. Intermediate geometry (rotated
/// points, viewport coordinates) reuses this type without the bound.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a point that must lie within the unit square (inclusive).
    ///
    /// # Errors
    ///
    /// Returns `TypeError::NonFinite` for NaN or infinite coordinates and
    /// `TypeError::OutOfBounds` if either coordinate leaves `[0,1]`.
    pub fn new(x: f64, y: f64) -> Result<Self, TypeError> {
        let p = Self { x, y };
        if !x.is_finite() || !y.is_finite() {
            return Err(TypeError::NonFinite);
        }
        if !p.in_unit_square() {
            return Err(TypeError::OutOfBounds { x, y });
        }
        Ok(p)
    }

    /// Create a point without bounds checking.
    pub const fn raw(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates lie within `[0,1]`.
    pub fn in_unit_square(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    /// Smallest distance from this point to any edge of the unit square.
    ///
    /// Negative when the point lies outside.
    pub fn edge_margin(&self) -> f64 {
        self.x.min(1.0 - self.x).min(self.y).min(1.0 - self.y)
    }

    /// Clamp both coordinates into `[0,1]`.
    pub fn clamp_unit(self) -> Self {
        Self {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Character to anchor point mapping.
///
/// A `BTreeMap` keeps iteration order stable, which keeps rendering and
/// nearest-anchor tie-breaks deterministic.
pub type AnchorMap = BTreeMap<char, Point>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_is_supported() {
        assert!(ALPHABET.iter().all(|&c| is_supported(c)));
        assert_eq!(ALPHABET.len(), 27);
    }

    #[test]
    fn unsupported_chars() {
        for c in ['a', '1', '!', '\t', 'É'] {
            assert!(!is_supported(c), "{c:?} should be unsupported");
        }
    }

    #[test]
    fn point_bounds_are_inclusive() {
        assert!(Point::new(0.0, 0.0).is_ok());
        assert!(Point::new(1.0, 1.0).is_ok());
        assert_eq!(
            Point::new(-0.01, 0.5),
            Err(TypeError::OutOfBounds { x: -0.01, y: 0.5 })
        );
        assert_eq!(Point::new(f64::NAN, 0.5), Err(TypeError::NonFinite));
    }

    #[test]
    fn edge_margin_is_min_distance() {
        assert!((Point::raw(0.5, 0.5).edge_margin() - 0.5).abs() < 1e-12);
        assert!((Point::raw(0.1, 0.7).edge_margin() - 0.1).abs() < 1e-12);
        assert!(Point::raw(-0.2, 0.5).edge_margin() < 0.0);
    }

    #[test]
    fn clamp_unit_pulls_inside() {
        let p = Point::raw(-0.3, 1.4).clamp_unit();
        assert_eq!(p, Point::raw(0.0, 1.0));
    }
}
