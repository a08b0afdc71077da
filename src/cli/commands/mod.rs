//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Resolves files and flags into core types
//! 2. Calls the codec or renderer
//! 3. Writes results to stdout or the requested file
//!
//! # Async Commands
//!
//! Raster export is async. The `render` handler builds a tokio runtime and
//! blocks on the export so the rest of the CLI stays synchronous.

mod completion;
mod config_cmd;
mod decode;
mod encode;
mod lattice;
mod normalize;
mod render;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::{init as config_init, path as config_path, show as config_show};
pub use decode::decode;
pub use encode::encode;
pub use lattice::{import as lattice_import, show as lattice_show, validate as lattice_validate};
pub use normalize::normalize;
pub use render::{render, RenderRequest};

use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::cli::args::{Command, ConfigAction, LatticeAction, LatticeArgs};
use crate::cli::Context;
use crate::core::encode::encode as encode_path;
use crate::core::external::ExternalLattice;
use crate::core::lattice::Lattice;
use crate::core::normalize::normalize as normalize_text;
use crate::core::path::EncodedPath;
use crate::ui::output;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Normalize { text, strip } => normalize(ctx, &join_words(&text), strip),
        Command::Encode { text, lattice, out } => {
            encode(ctx, &join_words(&text), &lattice, out.as_deref())
        }
        Command::Render {
            text,
            lattice,
            view,
            no_embed,
            out,
            png,
            raster_size,
        } => render(
            ctx,
            &RenderRequest {
                text: join_words(&text),
                lattice,
                view,
                no_embed,
                out,
                png,
                raster_size,
            },
        ),
        Command::Decode { file, lattice } => decode(ctx, &file, lattice.as_deref()),
        Command::Lattice { action } => match action {
            LatticeAction::Show { lattice, anchors } => lattice_show(ctx, &lattice, anchors),
            LatticeAction::Validate { file, external } => lattice_validate(ctx, &file, external),
            LatticeAction::Import {
                file,
                key,
                lattice_version,
                out,
            } => lattice_import(ctx, &file, &key, lattice_version, out.as_deref()),
        },
        Command::Config { action } => match action {
            ConfigAction::Show => config_show(ctx),
            ConfigAction::Path => config_path(ctx),
            ConfigAction::Init { path, force } => config_init(ctx, path.as_deref(), force),
        },
        Command::Completion { shell } => completion(shell),
    }
}

/// Join positional words into one text argument.
fn join_words(words: &[String]) -> String {
    words.join(" ")
}

/// A lattice resolved from flags and config, ready to encode against.
#[derive(Debug, Clone)]
pub(crate) struct LatticeSource {
    /// Identity, anchors, rules, and style
    pub lattice: Lattice,
    /// Present when the lattice came from a vertex graph
    pub external: Option<ExternalLattice>,
}

impl LatticeSource {
    /// Resolve `--lattice` / `--external`, then the configured lattice, then
    /// the standard lattice.
    pub(crate) fn resolve(ctx: &Context, args: &LatticeArgs) -> Result<Self> {
        if let Some(path) = &args.external {
            return Self::from_external(ctx, path);
        }

        let lattice = match args.lattice.as_deref().or(ctx.config.lattice_path()) {
            Some(path) => read_lattice(path)?,
            None => Lattice::standard(),
        };
        output::debug(
            format!("Using lattice {}@{}", lattice.key, lattice.version),
            ctx.verbosity,
        );

        Ok(Self {
            lattice,
            external: None,
        })
    }

    fn from_external(ctx: &Context, path: &Path) -> Result<Self> {
        let external = read_external(path)?;
        if !external.is_valid() {
            anyhow::bail!(
                "External lattice '{}' needs at least one vertex and one mapped character",
                path.display()
            );
        }

        let key = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "external".to_string());

        // Adapter anchors may include characters outside the alphabet, so
        // this lattice is used for identity and rendering only.
        let lattice = Lattice {
            key,
            version: 1,
            anchors: external.anchors(),
            rules: Default::default(),
            style: Default::default(),
        };
        output::debug(
            format!(
                "Using external lattice '{}' ({} vertices, {} characters)",
                lattice.key,
                external.vertex_config.vertices.len(),
                external.character_map.len()
            ),
            ctx.verbosity,
        );

        Ok(Self {
            lattice,
            external: Some(external),
        })
    }

    /// The text as it will be stored in the package.
    pub(crate) fn canonical_text(&self, text: &str) -> String {
        match self.external {
            Some(_) => text.to_uppercase(),
            None => normalize_text(text, true),
        }
    }

    /// Encode text with the encoder that matches this source.
    pub(crate) fn encode(&self, text: &str) -> EncodedPath {
        match &self.external {
            Some(external) => external.encode(text),
            None => encode_path(text, &self.lattice.anchors, &self.lattice.rules),
        }
    }
}

/// Read and validate a lattice file.
pub(crate) fn read_lattice(path: &Path) -> Result<Lattice> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read lattice '{}'", path.display()))?;
    Lattice::from_json(&json).with_context(|| format!("Invalid lattice '{}'", path.display()))
}

/// Read an external vertex-graph lattice file.
pub(crate) fn read_external(path: &Path) -> Result<ExternalLattice> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read external lattice '{}'", path.display()))?;
    ExternalLattice::try_parse(&json)
        .with_context(|| format!("Invalid external lattice '{}'", path.display()))
}

/// Write bytes to a file, or to stdout when no path is given.
pub(crate) fn write_output(out: Option<&Path>, contents: &[u8]) -> Result<()> {
    match out {
        Some(path) => fs::write(path, contents)
            .with_context(|| format!("Failed to write '{}'", path.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(contents).context("Failed to write to stdout")?;
            if !contents.ends_with(b"\n") {
                stdout.write_all(b"\n").context("Failed to write to stdout")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn join_words_uses_single_spaces() {
        let words = vec!["hello".to_string(), "world".to_string()];
        assert_eq!(join_words(&words), "hello world");
    }

    #[test]
    fn resolve_defaults_to_standard() {
        let source = LatticeSource::resolve(&Context::default(), &LatticeArgs::default()).unwrap();
        assert_eq!(source.lattice.key, "standard");
        assert!(source.external.is_none());
        assert_eq!(source.canonical_text("Hi, you"), "HI YOU");
    }

    #[test]
    fn resolve_external_uses_file_stem() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("triangle.json");
        fs::write(
            &path,
            r#"{
                "vertex_config": { "vertices": [
                    { "id": 0, "x": 0, "y": 0 },
                    { "id": 1, "x": 1, "y": 0 },
                    { "id": 2, "x": 0, "y": 1 }
                ] },
                "character_map": { "A": [0, 1], "B": [1, 2] }
            }"#,
        )
        .unwrap();

        let args = LatticeArgs {
            external: Some(path),
            ..Default::default()
        };
        let source = LatticeSource::resolve(&Context::default(), &args).unwrap();
        assert_eq!(source.lattice.key, "triangle");
        assert_eq!(source.canonical_text("ab!"), "AB!");
        assert_eq!(source.encode("ab!").visited_chars, vec!['A', 'B', '!']);
    }

    #[test]
    fn resolve_rejects_invalid_external() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.json");
        fs::write(
            &path,
            r#"{"vertex_config":{"vertices":[]},"character_map":{"A":[0,1]}}"#,
        )
        .unwrap();
        let args = LatticeArgs {
            external: Some(path),
            ..Default::default()
        };
        assert!(LatticeSource::resolve(&Context::default(), &args).is_err());
    }

    #[test]
    fn read_lattice_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{}").unwrap();
        let err = read_lattice(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
    }
}
