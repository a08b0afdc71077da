//! core::package
//!
//! Glyph package schema (v1.0).
//!
//! # Schema Design
//!
//! A package is the single lossless serialization of an encoded text:
//! - Self-describing with a literal `version` of `"1.0"`
//! - Carries the source text directly, so decoding never infers geometry
//! - Names the lattice `(key, version)` it was encoded against
//!
//! # Content Hash
//!
//! The `hash` is a SHA-256 over the text and lattice identity only. It is
//! deterministic: identical `(text, latticeKey, latticeVersion)` triples hash
//! identically. Per-generation uniqueness is carried by `timestamp`.
//!
//! # Example
//!
//! ```
//! use qbc::core::encode::encode;
//! use qbc::core::lattice::Lattice;
//! use qbc::core::package::{parse_package, GlyphPackage, Orientation};
//!
//! let lattice = Lattice::standard();
//! let path = encode("HELLO", &lattice.anchors, &lattice.rules);
//! let pkg = GlyphPackage::new("HELLO", &lattice, Orientation::default(), path);
//!
//! let json = pkg.to_json().unwrap();
//! let parsed = parse_package(&json).unwrap();
//! assert_eq!(parsed.metadata.text, "HELLO");
//! assert!(parsed.verify_hash().is_ok());
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::core::lattice::{Lattice, Style};
use crate::core::path::EncodedPath;

/// The only supported package version.
pub const PACKAGE_VERSION: &str = "1.0";

/// Tolerance when comparing stored event coordinates with lattice anchors.
const ANCHOR_TOLERANCE: f64 = 1e-9;

/// Errors from package operations.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("failed to parse package: {0}")]
    ParseError(String),

    #[error("unsupported package version '{0}', expected '{PACKAGE_VERSION}'")]
    UnsupportedVersion(String),

    #[error("package is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("package hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: String, computed: String },

    #[error("package was encoded against lattice {found}, not {expected}")]
    LatticeMismatch { expected: String, found: String },

    #[error("event {index} for {ch:?} does not lie on the lattice anchor")]
    AnchorMismatch { index: usize, ch: char },

    #[error("failed to serialize package: {0}")]
    SerializeError(String),
}

/// Render-time presentation transform.
///
/// Never applied to stored anchors or path coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Orientation {
    #[serde(alias = "rotation")]
    pub rotation_degrees: f64,

    pub mirror: bool,

    #[serde(rename = "flipVertical", alias = "flip_vertical")]
    pub flip_vertical: bool,

    /// Carried for 3D consumers; ignored by the 2D renderer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,

    /// Carried for 3D consumers; ignored by the 2D renderer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective: Option<f64>,
}

impl Orientation {
    /// Rotation reduced to `[0, 360)`. Non-finite rotations count as none.
    pub fn turn_degrees(&self) -> f64 {
        if !self.rotation_degrees.is_finite() {
            return 0.0;
        }
        // Tiny negative angles round up to exactly 360
        let degrees = self.rotation_degrees.rem_euclid(360.0);
        if degrees >= 360.0 {
            0.0
        } else {
            // `+ 0.0` turns the -0.0 left by whole negative turns into 0.0
            degrees + 0.0
        }
    }

    /// Returns true if this orientation leaves points where they are.
    pub fn is_identity(&self) -> bool {
        !self.mirror && !self.flip_vertical && self.turn_degrees() == 0.0
    }

    /// The same orientation with every value storable as JSON.
    ///
    /// Rotation is reduced by [`Orientation::turn_degrees`]; non-finite
    /// 3D hints are dropped.
    pub fn normalized(self) -> Self {
        Self {
            rotation_degrees: self.turn_degrees(),
            depth: self.depth.filter(|d| d.is_finite()),
            perspective: self.perspective.filter(|p| p.is_finite()),
            ..self
        }
    }
}

/// Package metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageMetadata {
    pub text: String,
    pub lattice_key: String,
    pub lattice_version: u32,
    pub orientation: Orientation,
    pub style: Style,
    /// RFC 3339 UTC creation time
    pub timestamp: String,
    pub hash: String,
}

/// A versioned, self-describing encoded text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphPackage {
    pub version: String,
    pub metadata: PackageMetadata,
    pub path: EncodedPath,
    /// Cached rendering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

impl GlyphPackage {
    /// Bundle an encoded path with its metadata.
    ///
    /// The timestamp is taken from the current clock; the hash is computed
    /// from `text` and the lattice identity.
    pub fn new(
        text: impl Into<String>,
        lattice: &Lattice,
        orientation: Orientation,
        path: EncodedPath,
    ) -> Self {
        let text = text.into();
        let hash = content_hash(&text, &lattice.key, lattice.version);
        Self {
            version: PACKAGE_VERSION.to_string(),
            metadata: PackageMetadata {
                text,
                lattice_key: lattice.key.clone(),
                lattice_version: lattice.version,
                orientation: orientation.normalized(),
                style: lattice.style.clone(),
                timestamp: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                hash,
            },
            path,
            svg: None,
        }
    }

    /// Attach a cached rendering.
    pub fn with_svg(mut self, svg: impl Into<String>) -> Self {
        self.svg = Some(svg.into());
        self
    }

    /// Check the stored hash against the stored text and lattice identity.
    pub fn verify_hash(&self) -> Result<(), PackageError> {
        let computed = content_hash(
            &self.metadata.text,
            &self.metadata.lattice_key,
            self.metadata.lattice_version,
        );
        if computed != self.metadata.hash {
            return Err(PackageError::HashMismatch {
                stored: self.metadata.hash.clone(),
                computed,
            });
        }
        Ok(())
    }

    /// Check that this package was encoded against `lattice`.
    ///
    /// The key and version must match, and every event whose character the
    /// lattice maps must lie on that anchor. Tick endpoints are not checked.
    pub fn verify_against(&self, lattice: &Lattice) -> Result<(), PackageError> {
        if self.metadata.lattice_key != lattice.key
            || self.metadata.lattice_version != lattice.version
        {
            return Err(PackageError::LatticeMismatch {
                expected: format!("{}@{}", lattice.key, lattice.version),
                found: format!(
                    "{}@{}",
                    self.metadata.lattice_key, self.metadata.lattice_version
                ),
            });
        }

        for (index, event) in self.path.events.iter().enumerate() {
            let ch = event.ch();
            if let Some(anchor) = lattice.anchor(ch) {
                if event.anchor().distance(&anchor) > ANCHOR_TOLERANCE {
                    return Err(PackageError::AnchorMismatch { index, ch });
                }
            }
        }

        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, PackageError> {
        serde_json::to_string_pretty(self).map_err(|e| PackageError::SerializeError(e.to_string()))
    }

    /// Serialize to compact JSON.
    pub fn to_compact_json(&self) -> Result<String, PackageError> {
        serde_json::to_string(self).map_err(|e| PackageError::SerializeError(e.to_string()))
    }
}

/// Deterministic content hash for a text on a lattice.
pub fn content_hash(text: &str, lattice_key: &str, lattice_version: u32) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update(b"\0");
    hasher.update(lattice_key.as_bytes());
    hasher.update(b"\0");
    hasher.update(lattice_version.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a package, reporting why it was rejected.
///
/// The envelope is checked before the full structure so that a wrong
/// version is reported as such rather than as a shape error.
pub fn try_parse_package(raw: &str) -> Result<GlyphPackage, PackageError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| PackageError::ParseError(e.to_string()))?;

    match value.get("version").and_then(Value::as_str) {
        Some(PACKAGE_VERSION) => {}
        Some(other) => return Err(PackageError::UnsupportedVersion(other.to_string())),
        None => return Err(PackageError::MissingField("version")),
    }
    if !value.get("metadata").is_some_and(Value::is_object) {
        return Err(PackageError::MissingField("metadata"));
    }
    let Some(path) = value.get("path").filter(|p| p.is_object()) else {
        return Err(PackageError::MissingField("path"));
    };
    if !path.get("visitedChars").is_some_and(Value::is_array) {
        return Err(PackageError::MissingField("path.visitedChars"));
    }

    serde_json::from_value(value).map_err(|e| PackageError::ParseError(e.to_string()))
}

/// Parse a package, yielding `None` for anything malformed.
pub fn parse_package(raw: &str) -> Option<GlyphPackage> {
    try_parse_package(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encode::encode;
    use crate::core::types::Point;

    fn sample() -> GlyphPackage {
        let lattice = Lattice::standard();
        let path = encode("BOOK", &lattice.anchors, &lattice.rules);
        GlyphPackage::new("BOOK", &lattice, Orientation::default(), path)
    }

    #[test]
    fn new_package_shape() {
        let pkg = sample();
        assert_eq!(pkg.version, "1.0");
        assert_eq!(pkg.metadata.lattice_key, "standard");
        assert_eq!(pkg.metadata.lattice_version, 1);
        assert_eq!(pkg.metadata.hash.len(), 64);
        assert!(chrono::DateTime::parse_from_rfc3339(&pkg.metadata.timestamp).is_ok());
        assert!(pkg.svg.is_none());
    }

    #[test]
    fn hash_is_deterministic() {
        assert_eq!(
            content_hash("HELLO", "standard", 1),
            content_hash("HELLO", "standard", 1)
        );
        assert_ne!(
            content_hash("HELLO", "standard", 1),
            content_hash("HELLO", "standard", 2)
        );
        // Separator prevents boundary ambiguity
        assert_ne!(content_hash("AB", "C", 1), content_hash("A", "BC", 1));
    }

    #[test]
    fn verify_hash_detects_tampering() {
        let mut pkg = sample();
        assert!(pkg.verify_hash().is_ok());
        pkg.metadata.text = "BOOT".into();
        assert!(matches!(
            pkg.verify_hash(),
            Err(PackageError::HashMismatch { .. })
        ));
    }

    #[test]
    fn verify_against_lattice() {
        let pkg = sample();
        let lattice = Lattice::standard();
        assert!(pkg.verify_against(&lattice).is_ok());

        let mut other = lattice.clone();
        other.version = 2;
        assert!(matches!(
            pkg.verify_against(&other),
            Err(PackageError::LatticeMismatch { .. })
        ));

        let mut moved = lattice.clone();
        moved.anchors.insert('O', Point::raw(0.0, 0.0));
        assert!(matches!(
            pkg.verify_against(&moved),
            Err(PackageError::AnchorMismatch { ch: 'O', .. })
        ));
    }

    #[test]
    fn parse_roundtrip() {
        let pkg = sample().with_svg("<svg/>");
        let parsed = parse_package(&pkg.to_json().unwrap()).unwrap();
        assert_eq!(parsed.metadata, pkg.metadata);
        assert_eq!(parsed.path.visited_chars, pkg.path.visited_chars);
        assert_eq!(parsed.svg.as_deref(), Some("<svg/>"));
    }

    #[test]
    fn parse_rejects_wrong_version() {
        let raw = r#"{"version":"2.0","metadata":{},"path":{"visitedChars":[]}}"#;
        assert!(parse_package(raw).is_none());
        assert!(matches!(
            try_parse_package(raw),
            Err(PackageError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn parse_rejects_missing_fields() {
        assert!(matches!(
            try_parse_package(r#"{"version":"1.0","path":{"visitedChars":[]}}"#),
            Err(PackageError::MissingField("metadata"))
        ));
        assert!(matches!(
            try_parse_package(r#"{"version":"1.0","metadata":{}}"#),
            Err(PackageError::MissingField("path"))
        ));
        assert!(matches!(
            try_parse_package(r#"{"version":"1.0","metadata":{},"path":{"events":[]}}"#),
            Err(PackageError::MissingField("path.visitedChars"))
        ));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_package("").is_none());
        assert!(parse_package("not json").is_none());
        assert!(parse_package("[1,2,3]").is_none());
        // Envelope is fine but metadata is incomplete
        assert!(
            parse_package(r#"{"version":"1.0","metadata":{},"path":{"visitedChars":[]}}"#)
                .is_none()
        );
    }

    #[test]
    fn orientation_identity() {
        assert!(Orientation::default().is_identity());
        let full_turn = Orientation {
            rotation_degrees: 360.0,
            ..Default::default()
        };
        assert!(full_turn.is_identity());
        let mirrored = Orientation {
            mirror: true,
            ..Default::default()
        };
        assert!(!mirrored.is_identity());
    }

    #[test]
    fn turn_degrees_reduces_rotation() {
        let turn = |rotation_degrees| {
            Orientation {
                rotation_degrees,
                ..Default::default()
            }
            .turn_degrees()
        };
        assert_eq!(turn(450.0), 90.0);
        assert_eq!(turn(-90.0), 270.0);
        assert!(turn(-720.0).is_sign_positive());
        assert_eq!(turn(-1e-20), 0.0);
        assert_eq!(turn(f64::NAN), 0.0);
        assert_eq!(turn(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn non_finite_orientation_still_roundtrips() {
        let lattice = Lattice::standard();
        let path = encode("HELLO", &lattice.anchors, &lattice.rules);
        let orientation = Orientation {
            rotation_degrees: f64::INFINITY,
            depth: Some(f64::NAN),
            mirror: true,
            ..Default::default()
        };
        let pkg = GlyphPackage::new("HELLO", &lattice, orientation, path);
        assert_eq!(pkg.metadata.orientation.rotation_degrees, 0.0);
        assert_eq!(pkg.metadata.orientation.depth, None);
        assert!(pkg.metadata.orientation.mirror);

        let parsed = parse_package(&pkg.to_json().unwrap()).unwrap();
        assert_eq!(parsed, pkg);
    }

    #[test]
    fn orientation_wire_names() {
        let o: Orientation =
            serde_json::from_str(r#"{"rotation":90,"flipVertical":true,"depth":2}"#).unwrap();
        assert_eq!(o.rotation_degrees, 90.0);
        assert!(o.flip_vertical);
        assert_eq!(o.depth, Some(2.0));

        let json = serde_json::to_value(o).unwrap();
        assert_eq!(json["rotation_degrees"], 90.0);
        assert_eq!(json["flipVertical"], true);
        assert!(json.get("perspective").is_none());
    }
}
