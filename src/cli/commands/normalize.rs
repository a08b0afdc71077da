//! normalize command - Canonicalize text into the supported alphabet

use crate::cli::Context;
use crate::core::normalize::normalize as normalize_text;
use crate::ui::output;
use anyhow::Result;

/// Print the canonical form of `text`.
pub fn normalize(ctx: &Context, text: &str, strip: bool) -> Result<()> {
    let canonical = normalize_text(text, !strip);
    if canonical.is_empty() {
        output::warn("Nothing left to encode after normalization", ctx.verbosity);
    }
    output::result(canonical);
    Ok(())
}
