//! encode command - Encode text into a glyph package

use std::path::Path;

use crate::cli::args::LatticeArgs;
use crate::cli::Context;
use crate::core::package::GlyphPackage;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

use super::{write_output, LatticeSource};

/// Encode `text` and write the package JSON.
pub fn encode(ctx: &Context, text: &str, lattice: &LatticeArgs, out: Option<&Path>) -> Result<()> {
    let source = LatticeSource::resolve(ctx, lattice)?;
    let pkg = build_package(ctx, &source, text)?;

    let json = pkg.to_json().context("Failed to serialize package")?;
    write_output(out, json.as_bytes())?;

    if let Some(path) = out {
        output::success(
            format!(
                "Encoded {} characters to {}",
                pkg.path.visited_chars.len(),
                path.display()
            ),
            ctx.verbosity,
        );
    }
    Ok(())
}

/// Canonicalize, encode, and bundle `text` against a resolved lattice.
pub(crate) fn build_package(
    ctx: &Context,
    source: &LatticeSource,
    text: &str,
) -> Result<GlyphPackage> {
    let canonical = source.canonical_text(text);
    if canonical.is_empty() {
        bail!("Nothing to encode: '{}' has no supported characters", text);
    }
    output::debug(format!("Canonical text: {canonical:?}"), ctx.verbosity);

    let path = source.encode(&canonical);
    output::debug(
        format!(
            "{} events over {} distinct anchors",
            path.len(),
            path.visit_counts.len()
        ),
        ctx.verbosity,
    );

    Ok(GlyphPackage::new(
        canonical,
        &source.lattice,
        ctx.config.orientation(),
        path,
    ))
}
