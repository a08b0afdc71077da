//! core::decode
//!
//! Text recovery from packages and embedded markup.
//!
//! # Contract
//!
//! Decoding only ever reads text that was stored directly. No attempt is
//! made to reconstruct text by walking visible geometry, and raster images
//! are refused outright. Every function here is total: malformed input gives
//! `None`, never a panic or an error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::core::package::{parse_package, GlyphPackage};
use crate::core::path::EncodedPath;
use crate::core::types::AnchorMap;

/// Opening of the comment that carries an embedded package.
pub const EMBED_PREFIX: &str = "<!--QBC-DATA:";

/// Closing of the embedded package comment.
pub const EMBED_SUFFIX: &str = "-->";

/// Text recovered from a package.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeResult {
    pub text: String,
    /// Always 1.0: the text is stored, not inferred
    pub confidence: f64,
    pub path: EncodedPath,
    pub lattice_key: String,
}

/// Decode a structurally valid package.
///
/// The text is the package's visited characters joined in order.
pub fn decode_package(pkg: &GlyphPackage) -> DecodeResult {
    DecodeResult {
        text: pkg.path.text(),
        confidence: 1.0,
        path: pkg.path.clone(),
        lattice_key: pkg.metadata.lattice_key.clone(),
    }
}

/// Extract the raw base64 payload of an embedded package comment.
pub fn embedded_payload(markup: &str) -> Option<&str> {
    let start = markup.find(EMBED_PREFIX)? + EMBED_PREFIX.len();
    let len = markup[start..].find(EMBED_SUFFIX)?;
    Some(markup[start..start + len].trim())
}

/// Decode text from markup carrying an embedded package comment.
///
/// Returns `None` when the comment is absent, is not valid base64, or does
/// not hold a valid package.
///
/// # Example
///
/// ```
/// use qbc::core::decode::decode_from_embedded_markup;
///
/// let svg = r#"<svg><path d="M 40 40 L 360 360"/></svg>"#;
/// assert!(decode_from_embedded_markup(svg).is_none());
/// ```
pub fn decode_from_embedded_markup(markup: &str) -> Option<DecodeResult> {
    embedded_package(markup).map(|pkg| decode_package(&pkg))
}

/// Extract the package embedded in markup.
pub fn embedded_package(markup: &str) -> Option<GlyphPackage> {
    let payload = embedded_payload(markup)?;
    let bytes = STANDARD.decode(payload).ok()?;
    let json = String::from_utf8(bytes).ok()?;
    parse_package(&json)
}

/// Recovering text from a rasterized image is not supported.
///
/// Always returns `None`; a raster holds no stored text and this crate does
/// not guess from pixels.
pub fn decode_from_raster(_image: &[u8], _anchors: &AnchorMap) -> Option<DecodeResult> {
    None
}

/// Find the anchor nearest to `(x, y)` within `threshold`.
///
/// Ties go to the character that sorts first. Intended for interactive
/// tooling; not part of the decode contract.
pub fn closest_anchor(x: f64, y: f64, anchors: &AnchorMap, threshold: f64) -> Option<char> {
    let mut best: Option<(char, f64)> = None;
    for (&ch, point) in anchors {
        let d = (point.x - x).hypot(point.y - y);
        if d > threshold {
            continue;
        }
        if best.map_or(true, |(_, bd)| d < bd) {
            best = Some((ch, d));
        }
    }
    best.map(|(ch, _)| ch)
}
