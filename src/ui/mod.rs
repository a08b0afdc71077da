//! ui
//!
//! User-facing console output.
//!
//! # Modules
//!
//! - [`output`] - Output formatting, verbosity, and diagnostics

pub mod output;
