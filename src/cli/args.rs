//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the standard locations
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Results only, no status lines

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// qbc - Encode text as paths over a lattice, render them, and decode them back
#[derive(Parser, Debug)]
#[command(name = "qbc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file to use instead of the standard locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Results only; suppress status lines and warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Which lattice to encode against.
#[derive(Args, Debug, Clone, Default)]
pub struct LatticeArgs {
    /// Lattice JSON file (defaults to the configured or standard lattice)
    #[arg(long, value_name = "FILE", conflicts_with = "external")]
    pub lattice: Option<PathBuf>,

    /// External vertex-graph lattice JSON file
    #[arg(long, value_name = "FILE")]
    pub external: Option<PathBuf>,
}

/// Presentation overrides for rendering.
#[derive(Args, Debug, Clone, Default)]
pub struct ViewArgs {
    /// Rotation in degrees, counter-clockwise
    #[arg(long, value_name = "DEG", allow_negative_numbers = true)]
    pub rotate: Option<f64>,

    /// Mirror horizontally
    #[arg(long)]
    pub mirror: bool,

    /// Flip vertically
    #[arg(long)]
    pub flip: bool,

    /// Draw grid lines
    #[arg(long)]
    pub grid: bool,

    /// Draw anchor labels
    #[arg(long)]
    pub labels: bool,

    /// Do not draw anchor nodes
    #[arg(long)]
    pub no_nodes: bool,

    /// Viewport edge length
    #[arg(long, value_name = "N")]
    pub size: Option<f64>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Canonicalize text into the supported alphabet
    #[command(
        name = "normalize",
        long_about = "Canonicalize text into the supported alphabet.\n\n\
            Text is uppercased. By default every character outside A-Z and space \
            becomes a space, whitespace runs collapse, and the ends are trimmed. \
            With --strip, unsupported characters are deleted instead.",
        after_help = "\
EXAMPLES:
    qbc normalize 'Hello, World! 123'     # HELLO WORLD
    qbc normalize --strip 'x1y2z'         # XYZ"
    )]
    Normalize {
        /// Text to normalize (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Delete unsupported characters instead of replacing them
        #[arg(long)]
        strip: bool,
    },

    /// Encode text into a glyph package (JSON)
    #[command(
        name = "encode",
        after_help = "\
EXAMPLES:
    qbc encode hello world
    qbc encode --lattice round.json -o hello.json hello
    qbc encode --external graph.json hello"
    )]
    Encode {
        /// Text to encode (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[command(flatten)]
        lattice: LatticeArgs,

        /// Write the package here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Render text as SVG, optionally exporting PNG
    #[command(
        name = "render",
        long_about = "Render text as an SVG drawing.\n\n\
            The SVG carries an embedded copy of the glyph package, which is the \
            only way to decode text from a rendering. Use --no-embed for a plain \
            drawing. --png additionally rasterizes the drawing; PNGs cannot be \
            decoded.",
        after_help = "\
EXAMPLES:
    qbc render hello -o hello.svg
    qbc render --rotate 90 --mirror --grid --labels hello -o hello.svg
    qbc render hello -o hello.svg --png hello.png --raster-size 1024"
    )]
    Render {
        /// Text to render (multiple words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[command(flatten)]
        lattice: LatticeArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Do not embed the package in the SVG
        #[arg(long)]
        no_embed: bool,

        /// Write the SVG here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,

        /// Also write a PNG rendering here
        #[arg(long, value_name = "FILE")]
        png: Option<PathBuf>,

        /// PNG edge length in pixels
        #[arg(long, value_name = "PX")]
        raster_size: Option<u32>,
    },

    /// Recover text from a package or an SVG with an embedded package
    #[command(
        name = "decode",
        long_about = "Recover text from a glyph package or an SVG rendering.\n\n\
            Only stored text is read: a package JSON, or an SVG carrying an \
            embedded package. Text is never guessed from drawn geometry, and \
            raster images are refused.",
        after_help = "\
EXAMPLES:
    qbc decode hello.json
    qbc decode hello.svg
    qbc decode --lattice round.json hello.json   # also check the lattice"
    )]
    Decode {
        /// Package JSON or SVG file
        file: PathBuf,

        /// Verify the package against this lattice
        #[arg(long, value_name = "FILE")]
        lattice: Option<PathBuf>,
    },

    /// Inspect, validate, and import lattices
    #[command(name = "lattice")]
    Lattice {
        #[command(subcommand)]
        action: LatticeAction,
    },

    /// Show or initialize configuration
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Lattice subcommands.
#[derive(Subcommand, Debug)]
pub enum LatticeAction {
    /// Print a lattice as JSON
    Show {
        #[command(flatten)]
        lattice: LatticeArgs,

        /// List anchors instead of printing JSON
        #[arg(long)]
        anchors: bool,
    },

    /// Check a lattice file
    Validate {
        /// Lattice JSON file
        file: PathBuf,

        /// Treat the file as an external vertex-graph lattice
        #[arg(long)]
        external: bool,
    },

    /// Convert an external vertex-graph lattice into a lattice
    Import {
        /// External lattice JSON file
        file: PathBuf,

        /// Key for the new lattice
        #[arg(long)]
        key: String,

        /// Version for the new lattice
        #[arg(long = "lattice-version", default_value_t = 1)]
        lattice_version: u32,

        /// Write the lattice here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Print the path of the loaded (or canonical) config file
    Path,

    /// Write a config file with the defaults spelled out
    Init {
        /// Where to write (defaults to ~/.qbc/config.toml)
        #[arg(long, value_name = "FILE")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn text_words_are_collected() {
        let cli = Cli::try_parse_from(["qbc", "encode", "hello", "world"]).unwrap();
        match cli.command {
            Command::Encode { text, .. } => assert_eq!(text, ["hello", "world"]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn negative_rotation_parses() {
        let cli = Cli::try_parse_from(["qbc", "render", "--rotate", "-45", "hi"]).unwrap();
        match cli.command {
            Command::Render { view, .. } => assert_eq!(view.rotate, Some(-45.0)),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lattice_and_external_conflict() {
        let result = Cli::try_parse_from([
            "qbc",
            "encode",
            "--lattice",
            "a.json",
            "--external",
            "b.json",
            "hi",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["qbc", "normalize", "x", "-q", "--debug"]).unwrap();
        assert!(cli.quiet);
        assert!(cli.debug);
    }
}
