//! decode command - Recover text from a package or an SVG with an embedded package

use std::fs;
use std::path::Path;

use crate::cli::Context;
use crate::core::decode::{decode_from_raster, decode_package, embedded_package, EMBED_PREFIX};
use crate::core::package::{try_parse_package, GlyphPackage};
use crate::core::types::AnchorMap;
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

use super::read_lattice;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// Print the text stored in `file`.
///
/// With `lattice`, the package must also have been encoded against it.
pub fn decode(ctx: &Context, file: &Path, lattice: Option<&Path>) -> Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read '{}'", file.display()))?;

    let expected = lattice.map(read_lattice).transpose()?;

    if bytes.starts_with(&PNG_SIGNATURE) {
        let empty = AnchorMap::new();
        let anchors = expected.as_ref().map_or(&empty, |l| &l.anchors);
        if decode_from_raster(&bytes, anchors).is_none() {
            bail!(
                "'{}' is a raster image; text can only be decoded from a package or an SVG with an embedded package",
                file.display()
            );
        }
    }

    let contents = String::from_utf8(bytes)
        .with_context(|| format!("'{}' is not a text file", file.display()))?;
    let pkg = load_package(&contents)
        .with_context(|| format!("No decodable package in '{}'", file.display()))?;

    if let Err(e) = pkg.verify_hash() {
        output::warn(format!("Package hash check failed: {e}"), ctx.verbosity);
    }
    if let Some(expected) = &expected {
        pkg.verify_against(expected)
            .context("Package does not match the given lattice")?;
        output::debug(
            format!("Verified against {}@{}", expected.key, expected.version),
            ctx.verbosity,
        );
    }

    let result = decode_package(&pkg);
    output::debug(
        format!(
            "Lattice {}@{}, {} events, encoded {}",
            result.lattice_key,
            pkg.metadata.lattice_version,
            result.path.len(),
            pkg.metadata.timestamp
        ),
        ctx.verbosity,
    );
    output::result(result.text);
    Ok(())
}

/// Read a package from JSON or from markup carrying an embedded package.
fn load_package(contents: &str) -> Result<GlyphPackage> {
    if contents.trim_start().starts_with('{') {
        return Ok(try_parse_package(contents)?);
    }
    if !contents.contains(EMBED_PREFIX) {
        bail!("markup has no embedded package");
    }
    embedded_package(contents).context("embedded package is malformed")
}
