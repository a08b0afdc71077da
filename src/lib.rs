//! qbc - Deterministic text-to-lattice path codec
//!
//! qbc turns normalized text into a path over a fixed set of named anchor
//! points (a lattice), renders that path as SVG, and recovers the text from
//! a self-describing package.
//!
//! # Architecture
//!
//! The codebase is layered, leaves first:
//!
//! - [`core`] - Lattice model, normalizer, encoder, decoder, packages, config
//! - [`render`] - SVG composition and async raster export
//! - [`cli`] - Command-line interface layer
//! - [`ui`] - Console output
//!
//! # Correctness Invariants
//!
//! 1. Decoding a package always returns the text it was built from
//! 2. Re-encoding identical input yields byte-identical paths
//! 3. Tick endpoints never leave the unit square
//! 4. Orientation is applied at render time only; stored geometry is never
//!    transformed
//! 5. Text is never guessed from geometry or pixels
//!
//! # Example
//!
//! ```
//! use qbc::core::decode::decode_package;
//! use qbc::core::encode::encode;
//! use qbc::core::lattice::Lattice;
//! use qbc::core::normalize::normalize;
//! use qbc::core::package::{GlyphPackage, Orientation};
//!
//! let lattice = Lattice::standard();
//! let text = normalize("Hello, World!", true);
//! let path = encode(&text, &lattice.anchors, &lattice.rules);
//! let pkg = GlyphPackage::new(text.clone(), &lattice, Orientation::default(), path);
//!
//! assert_eq!(decode_package(&pkg).text, "HELLO WORLD");
//! ```

pub mod cli;
pub mod core;
pub mod render;
pub mod ui;
