//! lattice command - Inspect, validate, and import lattices

use std::path::Path;

use crate::cli::args::LatticeArgs;
use crate::cli::Context;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

use super::{read_external, read_lattice, write_output, LatticeSource};

/// Print a lattice as JSON, or list its anchors.
pub fn show(ctx: &Context, lattice: &LatticeArgs, anchors: bool) -> Result<()> {
    let source = LatticeSource::resolve(ctx, lattice)?;
    let lattice = source.lattice;

    if anchors {
        output::print(
            format!("{}@{}", lattice.key, lattice.version),
            ctx.verbosity,
        );
        for (&ch, point) in &lattice.anchors {
            output::result(format!(
                "{:>5}  {:.4}  {:.4}",
                output::format_char(ch),
                point.x,
                point.y
            ));
        }
        return Ok(());
    }

    output::result(lattice.to_json().context("Failed to serialize lattice")?);
    Ok(())
}

/// Check a lattice file, reporting the first problem found.
pub fn validate(ctx: &Context, file: &Path, external: bool) -> Result<()> {
    if !external {
        let lattice = read_lattice(file)?;
        output::success(
            format!(
                "{} is a valid lattice ({}@{}, {} anchors)",
                file.display(),
                lattice.key,
                lattice.version,
                lattice.anchors.len()
            ),
            ctx.verbosity,
        );
        return Ok(());
    }

    let lattice = read_external(file)?;
    if !lattice.is_valid() {
        bail!(
            "{} needs at least one vertex and one mapped character",
            file.display()
        );
    }

    let anchors = lattice.anchors();
    let unresolved = lattice.character_map.len().saturating_sub(anchors.len());
    if unresolved > 0 {
        output::warn(
            format!("{unresolved} mapped entries could not be resolved to a character and vertices"),
            ctx.verbosity,
        );
    }
    output::success(
        format!(
            "{} is a valid external lattice ({} vertices, {} characters)",
            file.display(),
            lattice.vertex_config.vertices.len(),
            anchors.len()
        ),
        ctx.verbosity,
    );
    Ok(())
}

/// Convert an external lattice into a lattice file.
pub fn import(
    ctx: &Context,
    file: &Path,
    key: &str,
    version: u32,
    out: Option<&Path>,
) -> Result<()> {
    let external = read_external(file)?;
    let lattice = external
        .into_lattice(key, version)
        .with_context(|| format!("Cannot import '{}'", file.display()))?;

    let json = lattice.to_json().context("Failed to serialize lattice")?;
    write_output(out, json.as_bytes())?;

    if let Some(path) = out {
        output::success(
            format!(
                "Imported {}@{} with {} anchors to {}",
                lattice.key,
                lattice.version,
                lattice.anchors.len(),
                path.display()
            ),
            ctx.verbosity,
        );
    }
    Ok(())
}
