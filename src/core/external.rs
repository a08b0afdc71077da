//! core::external
//!
//! Adapter for lattices described as a vertex graph.
//!
//! # Source Format
//!
//! ```json
//! {
//!   "vertex_config": {
//!     "vertices": [{ "id": 0, "x": 10, "y": 20, "label": "top" }],
//!     "edges": []
//!   },
//!   "character_map": { "A": [0, 1] }
//! }
//! ```
//!
//! Vertex coordinates are in arbitrary units. They are rescaled into
//! `[padding, 1 - padding]` on each axis before use.
//!
//! # Visited Characters
//!
//! Unlike [`crate::core::encode::encode`], [`build_path`] records unmapped
//! non-space characters in `visited_chars` even though they draw nothing.
//! Downstream consumers of adapter paths rely on seeing the full input.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::lattice::{GenerationRules, Lattice, LatticeError, Style};
use crate::core::path::{EncodedPath, PathEvent};
use crate::core::types::{AnchorMap, Point};

/// Padding applied when rescaling vertices into the unit square.
pub const DEFAULT_PADDING: f64 = 0.1;

/// Pen positions closer than this are considered coincident.
const PEN_EPSILON: f64 = 1e-6;

/// Errors from external lattice handling.
#[derive(Debug, Error)]
pub enum ExternalLatticeError {
    #[error("failed to parse external lattice: {0}")]
    ParseError(String),

    #[error("external lattice has no vertices")]
    NoVertices,

    #[error("external lattice has an empty character map")]
    NoCharacters,

    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

/// Vertex identifier: integer or string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VertexId {
    Index(i64),
    Name(String),
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexId::Index(i) => write!(f, "{i}"),
            VertexId::Name(s) => write!(f, "{s}"),
        }
    }
}

/// A vertex in source units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// The vertex graph.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VertexConfig {
    #[serde(default)]
    pub vertices: Vec<Vertex>,
    /// Carried through untouched; edges are implied by the character map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Value>,
}

/// Character to `(from, to)` vertex pair.
pub type CharacterMap = BTreeMap<String, (VertexId, VertexId)>;

/// A lattice in vertex-graph form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalLattice {
    #[serde(default)]
    pub vertex_config: VertexConfig,
    #[serde(default)]
    pub character_map: CharacterMap,
}

/// Normalized vertex positions keyed by id.
pub type VertexPositions = HashMap<VertexId, Point>;

impl ExternalLattice {
    /// Parse from JSON, reporting why it was rejected.
    pub fn try_parse(json: &str) -> Result<Self, ExternalLatticeError> {
        serde_json::from_str(json).map_err(|e| ExternalLatticeError::ParseError(e.to_string()))
    }

    /// Parse from JSON, yielding `None` for anything malformed.
    pub fn parse(json: &str) -> Option<Self> {
        Self::try_parse(json).ok()
    }

    /// Returns true if there is at least one vertex and one mapped character.
    pub fn is_valid(&self) -> bool {
        !self.vertex_config.vertices.is_empty() && !self.character_map.is_empty()
    }

    /// Anchor map built from this graph.
    pub fn anchors(&self) -> AnchorMap {
        build_anchors(&self.vertex_config, &self.character_map)
    }

    /// Encode text by walking character edges.
    pub fn encode(&self, text: &str) -> EncodedPath {
        build_path(text, &self.vertex_config, &self.character_map)
    }

    /// Convert into a validated lattice with default rules and style.
    ///
    /// Fails if any resolved character lies outside the supported alphabet.
    pub fn into_lattice(
        &self,
        key: impl Into<String>,
        version: u32,
    ) -> Result<Lattice, ExternalLatticeError> {
        if self.vertex_config.vertices.is_empty() {
            return Err(ExternalLatticeError::NoVertices);
        }
        if self.character_map.is_empty() {
            return Err(ExternalLatticeError::NoCharacters);
        }

        let lattice = Lattice {
            key: key.into(),
            version,
            anchors: self.anchors(),
            rules: GenerationRules::default(),
            style: Style::default(),
        };
        lattice.validate()?;
        Ok(lattice)
    }
}

/// Returns true if the lattice has vertices and at least one mapped character.
pub fn is_valid_lattice(lattice: &ExternalLattice) -> bool {
    lattice.is_valid()
}

/// Rescale vertices into the unit square with [`DEFAULT_PADDING`].
pub fn normalize_vertices(vertices: &[Vertex]) -> VertexPositions {
    normalize_vertices_with_padding(vertices, DEFAULT_PADDING)
}

/// Rescale vertices into `[padding, 1 - padding]` on each axis.
///
/// A zero-width or zero-height bounding box is treated as having extent 1.
pub fn normalize_vertices_with_padding(vertices: &[Vertex], padding: f64) -> VertexPositions {
    let Some(first) = vertices.first() else {
        return VertexPositions::new();
    };

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for v in vertices {
        min_x = min_x.min(v.x);
        max_x = max_x.max(v.x);
        min_y = min_y.min(v.y);
        max_y = max_y.max(v.y);
    }

    let width = if max_x - min_x == 0.0 { 1.0 } else { max_x - min_x };
    let height = if max_y - min_y == 0.0 { 1.0 } else { max_y - min_y };
    let span = 1.0 - 2.0 * padding;

    vertices
        .iter()
        .map(|v| {
            let x = padding + (v.x - min_x) / width * span;
            let y = padding + (v.y - min_y) / height * span;
            (v.id.clone(), Point::raw(x, y))
        })
        .collect()
}

/// Resolve a character map key to the character it encodes.
fn map_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    let c = chars.next()?;
    match chars.next() {
        None => c.to_uppercase().next(),
        Some(_) => None,
    }
}

/// Resolved `(start, end)` positions per character.
fn resolve_edges(
    config: &VertexConfig,
    character_map: &CharacterMap,
) -> BTreeMap<char, (Point, Point)> {
    let positions = normalize_vertices(&config.vertices);
    character_map
        .iter()
        .filter_map(|(key, (from, to))| {
            let ch = map_char(key)?;
            let start = *positions.get(from)?;
            let end = *positions.get(to)?;
            Some((ch, (start, end)))
        })
        .collect()
}

/// Build an anchor map: each character anchors at its edge's end vertex.
///
/// Characters whose edge names an unknown vertex are left out.
pub fn build_anchors(config: &VertexConfig, character_map: &CharacterMap) -> AnchorMap {
    resolve_edges(config, character_map)
        .into_iter()
        .map(|(ch, (_, end))| (ch, end))
        .collect()
}

/// Encode text by walking each character's edge.
///
/// The text is uppercased but otherwise left as is. The first drawable
/// character moves to its edge start and draws to its end; later ones draw a
/// connector to their edge start when the pen is elsewhere, then draw to the
/// end. Unmapped characters other than space are still recorded as visited.
pub fn build_path(text: &str, config: &VertexConfig, character_map: &CharacterMap) -> EncodedPath {
    let edges = resolve_edges(config, character_map);
    let mut path = EncodedPath::new();
    let mut pen: Option<Point> = None;

    for ch in text.to_uppercase().chars() {
        let Some(&(start, end)) = edges.get(&ch) else {
            if ch != ' ' {
                path.visit(ch);
            }
            continue;
        };

        path.visit(ch);

        match pen {
            None => path.events.push(PathEvent::Move {
                ch,
                x: start.x,
                y: start.y,
            }),
            Some(current) if current.distance(&start) > PEN_EPSILON => {
                path.events.push(PathEvent::Line {
                    ch,
                    x: start.x,
                    y: start.y,
                });
            }
            Some(_) => {}
        }

        path.events.push(PathEvent::Line {
            ch,
            x: end.x,
            y: end.y,
        });
        pen = Some(end);
    }

    path
}
