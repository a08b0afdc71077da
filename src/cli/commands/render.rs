//! render command - Render text as SVG, optionally exporting PNG
//!
//! Settings are layered: render defaults, then the config file, then flags.
//! The package is embedded unless `--no-embed` is given or the config turns
//! embedding off.

use std::fs;
use std::path::PathBuf;

use crate::cli::args::{LatticeArgs, ViewArgs};
use crate::cli::Context;
use crate::core::config::Config;
use crate::core::package::Orientation;
use crate::render::raster::rasterize;
use crate::render::{render_package, render_with, RenderOptions};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

use super::encode::build_package;
use super::{write_output, LatticeSource};

/// Arguments for one render invocation.
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub text: String,
    pub lattice: LatticeArgs,
    pub view: ViewArgs,
    pub no_embed: bool,
    pub out: Option<PathBuf>,
    pub png: Option<PathBuf>,
    pub raster_size: Option<u32>,
}

/// Render `request.text` and write the SVG (and PNG, if asked).
pub fn render(ctx: &Context, request: &RenderRequest) -> Result<()> {
    let source = LatticeSource::resolve(ctx, &request.lattice)?;
    let options = render_options(ctx, &request.view)?;

    let orientation = orientation(ctx, &request.view)?;
    let mut pkg = build_package(ctx, &source, &request.text)?;
    pkg.metadata.orientation = orientation.normalized();

    let embed = !request.no_embed && ctx.config.embed();
    let svg = if embed {
        render_package(&pkg, &source.lattice.anchors, &options)
            .context("Failed to embed package")?
    } else {
        output::debug("Embedding disabled", ctx.verbosity);
        render_with(
            &pkg.path,
            &source.lattice.anchors,
            &pkg.metadata.style,
            &pkg.metadata.orientation,
            &options,
        )
    };

    write_output(request.out.as_deref(), svg.as_bytes())?;
    if let Some(path) = &request.out {
        output::success(format!("Rendered to {}", path.display()), ctx.verbosity);
    }

    if let Some(png_path) = &request.png {
        let size = request.raster_size.unwrap_or_else(|| ctx.config.raster_size());
        output::debug(format!("Rasterizing at {size}x{size}"), ctx.verbosity);

        let image = tokio::runtime::Runtime::new()
            .context("Failed to start async runtime")?
            .block_on(rasterize(svg, size))
            .context("Raster export failed")?;

        fs::write(png_path, &image.png)
            .with_context(|| format!("Failed to write '{}'", png_path.display()))?;
        output::success(
            format!(
                "Exported {}x{} PNG to {}",
                image.width,
                image.height,
                png_path.display()
            ),
            ctx.verbosity,
        );
    }

    Ok(())
}

/// Render options with configured values over the defaults.
pub(crate) fn configured_options(config: &Config) -> RenderOptions {
    let mut options = RenderOptions::default();
    if let Some(render) = &config.global.render {
        if let Some(size) = render.size {
            options.size = size;
        }
        if let Some(padding) = render.padding {
            options.padding = padding;
        }
        if let Some(grid) = render.grid {
            options.show_grid = grid;
        }
        if let Some(lines) = render.grid_lines {
            options.grid_lines = lines;
        }
        if let Some(nodes) = render.nodes {
            options.show_nodes = nodes;
        }
        if let Some(labels) = render.labels {
            options.show_labels = labels;
        }
    }
    options
}

/// Config render options with flag overrides applied.
fn render_options(ctx: &Context, view: &ViewArgs) -> Result<RenderOptions> {
    let mut options = configured_options(&ctx.config);
    if let Some(size) = view.size {
        if !size.is_finite() || size <= 2.0 * options.padding {
            bail!(
                "--size must exceed twice the padding ({})",
                2.0 * options.padding
            );
        }
        options.size = size;
    }
    if view.grid {
        options.show_grid = true;
    }
    if view.labels {
        options.show_labels = true;
    }
    if view.no_nodes {
        options.show_nodes = false;
    }
    Ok(options)
}

/// Config orientation with flag overrides applied.
fn orientation(ctx: &Context, view: &ViewArgs) -> Result<Orientation> {
    let mut orientation = ctx.config.orientation();
    if let Some(degrees) = view.rotate {
        if !degrees.is_finite() {
            bail!("--rotate must be a finite number of degrees, got {degrees}");
        }
        orientation.rotation_degrees = degrees;
    }
    if view.mirror {
        orientation.mirror = true;
    }
    if view.flip {
        orientation.flip_vertical = true;
    }
    Ok(orientation)
}
