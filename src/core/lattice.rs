//! core::lattice
//!
//! The static geometric vocabulary: anchors, generation rules, and style.
//!
//! # Identity
//!
//! A lattice is identified by `(key, version)` and is immutable once
//! published. A new version is a new value.
//!
//! # Generation Rules
//!
//! Rules may arrive from older sources under legacy field names. They are
//! resolved exactly once, at load time, by [`GenerationRules::normalize`].
//! Every deserialization of [`GenerationRules`] goes through it.
//!
//! # Example
//!
//! ```
//! use qbc::core::lattice::Lattice;
//!
//! let lattice = Lattice::standard();
//! assert_eq!(lattice.key, "standard");
//! assert!(lattice.validate().is_ok());
//! assert!(lattice.anchor('A').is_some());
//! assert!(lattice.anchor(' ').is_some());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::types::{is_supported, AnchorMap, Point, TypeError, ALPHABET};

/// Default tick length as a fraction of the unit square.
pub const DEFAULT_TICK_LENGTH: f64 = 0.08;

/// Default grid pitch for generated lattices.
pub const DEFAULT_NODE_SPACING: f64 = 0.2;

/// Errors from lattice construction and validation.
#[derive(Debug, Error)]
pub enum LatticeError {
    #[error("failed to parse lattice: {0}")]
    ParseError(String),

    #[error("lattice key cannot be empty")]
    EmptyKey,

    #[error("lattice version must be at least 1")]
    InvalidVersion,

    #[error("lattice has no anchors")]
    NoAnchors,

    #[error("anchor {ch:?}: {source}")]
    InvalidAnchor { ch: char, source: TypeError },

    #[error("node spacing {0} cannot fit the alphabet in the unit square")]
    InvalidSpacing(f64),
}

/// Canonical generation rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct GenerationRules {
    /// Draw a notch at revisited anchors
    pub enable_tick: bool,

    /// Notch length as a fraction of the unit square
    pub tick_length_factor: f64,

    /// Prefer the notch direction that stays furthest from the edges
    pub inside_boundary_preference: bool,

    /// Grid pitch used by generated lattices
    pub node_spacing: f64,
}

impl Default for GenerationRules {
    fn default() -> Self {
        Self {
            enable_tick: true,
            tick_length_factor: DEFAULT_TICK_LENGTH,
            inside_boundary_preference: true,
            node_spacing: DEFAULT_NODE_SPACING,
        }
    }
}

const ENABLE_TICK_KEYS: &[&str] = &["enableTick", "enable_tick", "tickEnabled", "ticks"];
const TICK_LENGTH_KEYS: &[&str] = &[
    "tickLengthFactor",
    "tick_length_factor",
    "tickLength",
    "tick_length",
];
const BOUNDARY_KEYS: &[&str] = &[
    "insideBoundaryPreference",
    "inside_boundary_preference",
    "preferInside",
    "boundaryPreference",
];
const SPACING_KEYS: &[&str] = &["nodeSpacing", "node_spacing", "spacing"];

impl GenerationRules {
    /// Resolve rules from a loosely-shaped JSON object.
    ///
    /// For each field the canonical name is tried first, then the legacy
    /// names in fixed order. A missing or wrong-typed value falls through to
    /// the next name and finally to the hard-coded default. Non-objects yield
    /// the defaults.
    ///
    /// # Example
    ///
    /// ```
    /// use qbc::core::lattice::GenerationRules;
    /// use serde_json::json;
    ///
    /// let rules = GenerationRules::normalize(&json!({
    ///     "tick_length": 0.05,
    ///     "preferInside": false,
    /// }));
    /// assert!(rules.enable_tick);
    /// assert_eq!(rules.tick_length_factor, 0.05);
    /// assert!(!rules.inside_boundary_preference);
    /// assert_eq!(rules.node_spacing, 0.2);
    /// ```
    pub fn normalize(raw: &Value) -> Self {
        let defaults = Self::default();
        Self {
            enable_tick: first_bool(raw, ENABLE_TICK_KEYS).unwrap_or(defaults.enable_tick),
            tick_length_factor: first_f64(raw, TICK_LENGTH_KEYS)
                .unwrap_or(defaults.tick_length_factor),
            inside_boundary_preference: first_bool(raw, BOUNDARY_KEYS)
                .unwrap_or(defaults.inside_boundary_preference),
            node_spacing: first_f64(raw, SPACING_KEYS).unwrap_or(defaults.node_spacing),
        }
    }
}

impl From<Value> for GenerationRules {
    fn from(raw: Value) -> Self {
        Self::normalize(&raw)
    }
}

fn first_bool(raw: &Value, keys: &[&str]) -> Option<bool> {
    keys.iter().find_map(|k| raw.get(k).and_then(Value::as_bool))
}

fn first_f64(raw: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .find_map(|k| raw.get(k).and_then(Value::as_f64))
        .filter(|v| v.is_finite())
}

/// Visual style carried by a lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Style {
    pub stroke_color: String,
    pub stroke_width: f64,
    pub background: String,
    pub node_color: String,
    pub start_node_color: String,
    pub node_radius: f64,
    pub label_color: String,
    pub grid_color: String,
    /// End-cap length in viewport units
    pub end_cap_length: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke_color: "#1a1a2e".into(),
            stroke_width: 3.0,
            background: "#ffffff".into(),
            node_color: "#9aa5b1".into(),
            start_node_color: "#e94560".into(),
            node_radius: 4.0,
            label_color: "#52606d".into(),
            grid_color: "#e4e7eb".into(),
            end_cap_length: 12.0,
        }
    }
}

/// A named, versioned geometric template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lattice {
    pub key: String,
    pub version: u32,
    pub anchors: AnchorMap,
    #[serde(default)]
    pub rules: GenerationRules,
    #[serde(default)]
    pub style: Style,
}

impl Lattice {
    /// Parse a lattice from JSON and validate it.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::ParseError` for malformed JSON, or any
    /// validation error from [`Lattice::validate`].
    pub fn from_json(json: &str) -> Result<Self, LatticeError> {
        let lattice: Lattice =
            serde_json::from_str(json).map_err(|e| LatticeError::ParseError(e.to_string()))?;
        lattice.validate()?;
        Ok(lattice)
    }

    /// Check the lattice invariants.
    ///
    /// - Key is non-empty and version is at least 1
    /// - At least one anchor exists
    /// - Every anchor key is in the supported alphabet
    /// - Every anchor point is finite and inside the unit square
    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.key.trim().is_empty() {
            return Err(LatticeError::EmptyKey);
        }
        if self.version == 0 {
            return Err(LatticeError::InvalidVersion);
        }
        if self.anchors.is_empty() {
            return Err(LatticeError::NoAnchors);
        }

        for (&ch, point) in &self.anchors {
            if !is_supported(ch) {
                return Err(LatticeError::InvalidAnchor {
                    ch,
                    source: TypeError::UnsupportedChar(ch),
                });
            }
            Point::new(point.x, point.y)
                .map_err(|source| LatticeError::InvalidAnchor { ch, source })?;
        }

        Ok(())
    }

    /// Generate a lattice placing the alphabet on a regular grid.
    ///
    /// Symbols are laid out row-major (`A`-`Z`, then space) with a pitch of
    /// `rules.node_spacing`, centred in the unit square. Rows run top to
    /// bottom, so `A` sits in the upper-left.
    ///
    /// # Errors
    ///
    /// Returns `LatticeError::InvalidSpacing` if the spacing is non-positive
    /// or too coarse for all symbols to fit.
    pub fn grid(
        key: impl Into<String>,
        version: u32,
        rules: GenerationRules,
    ) -> Result<Self, LatticeError> {
        let spacing = rules.node_spacing;
        if !(spacing.is_finite() && spacing > 0.0) {
            return Err(LatticeError::InvalidSpacing(spacing));
        }

        let (_, rows) = grid_shape(spacing);
        if (rows - 1) as f64 * spacing > 1.0 + 1e-9 {
            return Err(LatticeError::InvalidSpacing(spacing));
        }

        let anchors = grid_anchors(spacing);

        let lattice = Self {
            key: key.into(),
            version,
            anchors,
            rules,
            style: Style::default(),
        };
        lattice.validate()?;
        Ok(lattice)
    }

    /// The built-in lattice used when no other is configured.
    ///
    /// Equal to `grid("standard", 1, GenerationRules::default())`.
    pub fn standard() -> Self {
        Self {
            key: "standard".into(),
            version: 1,
            anchors: grid_anchors(DEFAULT_NODE_SPACING),
            rules: GenerationRules::default(),
            style: Style::default(),
        }
    }

    /// Look up the anchor for a character.
    pub fn anchor(&self, ch: char) -> Option<Point> {
        self.anchors.get(&ch).copied()
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, LatticeError> {
        serde_json::to_string_pretty(self).map_err(|e| LatticeError::ParseError(e.to_string()))
    }
}

/// Columns per row and number of rows for a grid pitch.
///
/// `spacing` must be positive. Columns never exceed the alphabet, so tiny
/// pitches put every symbol on one row.
fn grid_shape(spacing: f64) -> (usize, usize) {
    let symbols = ALPHABET.len();
    // Float error can leave 1.0 / 0.2 just under 5
    let steps = ((1.0 / spacing) + 1e-9).floor();
    let cols = if steps >= (symbols - 1) as f64 {
        symbols
    } else {
        steps as usize + 1
    };
    (cols, symbols.div_ceil(cols))
}

/// Lay the alphabet out row-major, centred in the unit square.
fn grid_anchors(spacing: f64) -> AnchorMap {
    let (cols, rows) = grid_shape(spacing);
    let height = (rows - 1) as f64 * spacing;
    let x0 = (1.0 - (cols - 1) as f64 * spacing) / 2.0;
    let y0 = 1.0 - (1.0 - height) / 2.0;

    ALPHABET
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let col = (i % cols) as f64;
            let row = (i / cols) as f64;
            (ch, Point::raw(x0 + col * spacing, y0 - row * spacing).clamp_unit())
        })
        .collect()
}
