//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Muster asset pipeline CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: muster.toml)
    #[arg(short = 'C', long, default_value = "muster.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Concatenate (and in production minify + revision) the JS bundle
    #[command(visible_alias = "js")]
    Scripts {
        #[command(flatten)]
        mode_args: ModeArgs,
    },

    /// Compile Sass, add vendor prefixes (and in production minify + revision)
    #[command(visible_alias = "css")]
    Styles {
        #[command(flatten)]
        mode_args: ModeArgs,
    },

    /// Extract critical above-the-fold CSS for a named page template
    Critical {
        /// Page template name from [critical.pages]; all pages if omitted
        page: Option<String>,

        #[command(flatten)]
        mode_args: ModeArgs,
    },

    /// Combine all SVG icons into a single sprite
    Icons,

    /// Gzip revisioned JS and CSS artifacts (production output only)
    Compress {
        #[command(flatten)]
        mode_args: ModeArgs,
    },

    /// Run every asset pipeline
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        mode_args: ModeArgs,
    },

    /// Start development server with file watching and live reload
    #[command(visible_alias = "s")]
    Serve {
        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable file watching for auto-rebuild
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,
    },
}

/// Shared mode arguments for pipeline commands.
#[derive(clap::Args, Debug, Clone)]
pub struct ModeArgs {
    /// Build for production: minify, revision filenames, write manifests
    #[arg(short, long)]
    pub prod: bool,

    /// Gzip the produced artifacts afterwards (implies nothing in dev mode)
    #[arg(short = 'z', long)]
    pub compress: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether the invoked command carries the production switch.
    pub fn is_prod(&self) -> bool {
        match &self.command {
            Commands::Scripts { mode_args }
            | Commands::Styles { mode_args }
            | Commands::Critical { mode_args, .. }
            | Commands::Compress { mode_args }
            | Commands::Build { mode_args } => mode_args.prod,
            Commands::Icons | Commands::Serve { .. } => false,
        }
    }

    /// Whether verbose logging was requested.
    pub fn is_verbose(&self) -> bool {
        match &self.command {
            Commands::Scripts { mode_args }
            | Commands::Styles { mode_args }
            | Commands::Critical { mode_args, .. }
            | Commands::Compress { mode_args }
            | Commands::Build { mode_args } => mode_args.verbose,
            Commands::Icons | Commands::Serve { .. } => false,
        }
    }

    pub const fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}
