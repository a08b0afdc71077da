//! core
//!
//! Domain types, the codec, and configuration for qbc.
//!
//! # Modules
//!
//! - [`types`] - Points, the supported alphabet, anchor maps
//! - [`lattice`] - Lattices, generation rules, and style
//! - [`normalize`] - Text canonicalization
//! - [`path`] - Encoded path events
//! - [`encode`] - Text to path encoder
//! - [`package`] - Versioned glyph package schema
//! - [`decode`] - Text recovery from packages and embedded markup
//! - [`external`] - Vertex-graph lattice adapter
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Every codec function is pure and safe to call concurrently
//! - Malformed input yields `None` or a typed error, never a panic
//! - Encoding is deterministic, down to tie-breaks

pub mod config;
pub mod decode;
pub mod encode;
pub mod external;
pub mod lattice;
pub mod normalize;
pub mod package;
pub mod path;
pub mod types;
