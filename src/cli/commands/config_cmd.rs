//! config command - Show or initialize configuration

use std::path::Path;

use crate::cli::Context;
use crate::core::config::{
    Config, GlobalConfig, OrientationDefaults, RasterDefaults, RenderDefaults,
};
use crate::ui::output;
use anyhow::{bail, Context as _, Result};

/// Print the effective configuration as TOML.
pub fn show(ctx: &Context) -> Result<()> {
    match ctx.config.loaded_from() {
        Some(path) => output::print(format!("# Loaded from {}", path.display()), ctx.verbosity),
        None => output::print("# No config file found; showing defaults", ctx.verbosity),
    }

    let effective = effective(&ctx.config);
    let toml = toml::to_string_pretty(&effective).context("Failed to serialize config")?;
    output::result(toml.trim_end());
    Ok(())
}

/// Print the path of the loaded config, or where `config init` would write.
pub fn path(ctx: &Context) -> Result<()> {
    match ctx.config.loaded_from() {
        Some(path) => output::result(path.display()),
        None => {
            let path = Config::global_config_path().context("Failed to locate config path")?;
            output::print("No config file loaded; the canonical location is:", ctx.verbosity);
            output::result(path.display());
        }
    }
    Ok(())
}

/// Write a config file with every default spelled out.
pub fn init(ctx: &Context, path: Option<&Path>, force: bool) -> Result<()> {
    let target = match path {
        Some(path) => path.to_path_buf(),
        None => Config::global_config_path().context("Failed to locate config path")?,
    };

    if target.exists() && !force {
        bail!(
            "Config file '{}' already exists. Use --force to overwrite.",
            target.display()
        );
    }

    Config::write_to(&target, &effective(&Config::default()))
        .context("Failed to write config")?;

    output::success(format!("Wrote {}", target.display()), ctx.verbosity);
    Ok(())
}

/// Every setting resolved to the value in effect.
fn effective(config: &Config) -> GlobalConfig {
    let options = super::render::configured_options(config);
    let orientation = config.orientation();

    GlobalConfig {
        lattice: config.global.lattice.clone(),
        render: Some(RenderDefaults {
            size: Some(options.size),
            padding: Some(options.padding),
            grid: Some(options.show_grid),
            grid_lines: Some(options.grid_lines),
            nodes: Some(options.show_nodes),
            labels: Some(options.show_labels),
            embed: Some(config.embed()),
        }),
        orientation: Some(OrientationDefaults {
            rotation_degrees: Some(orientation.rotation_degrees),
            mirror: Some(orientation.mirror),
            flip_vertical: Some(orientation.flip_vertical),
        }),
        raster: Some(RasterDefaults {
            size: Some(config.raster_size()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn effective_spells_out_defaults() {
        let effective = effective(&Config::default());
        let render = effective.render.unwrap();
        assert_eq!(render.size, Some(400.0));
        assert_eq!(render.embed, Some(true));
        assert_eq!(effective.raster.unwrap().size, Some(512));
        assert!(effective.lattice.is_none());
    }

    #[test]
    fn init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/config.toml");
        let ctx = Context::default();

        init(&ctx, Some(&target), false).unwrap();
        let loaded = Config::load(Some(&target)).unwrap();
        assert_eq!(loaded.config.global, effective(&Config::default()));

        assert!(init(&ctx, Some(&target), false).is_err());
        init(&ctx, Some(&target), true).unwrap();
    }
}
