//! Muster - an asset build pipeline for static sites.

#![allow(dead_code)]

mod bundle;
mod cli;
mod config;
mod core;
mod logger;
mod reload;
mod serve;
mod task;
mod transform;
mod utils;
mod watch;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::PipelineConfig;
use core::BuildMode;
use task::Task;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = PipelineConfig::load(&cli)?;
    let mode = BuildMode::from_prod(cli.is_prod());

    match &cli.command {
        Commands::Scripts { mode_args } => {
            task::run(Task::Scripts, &config, mode)?;
            if mode_args.compress {
                task::run(Task::CompressScripts, &config, mode)?;
            }
            Ok(())
        }
        Commands::Styles { mode_args } => {
            task::run(Task::Styles, &config, mode)?;
            if mode_args.compress {
                task::run(Task::CompressStyles, &config, mode)?;
            }
            Ok(())
        }
        Commands::Critical { page, .. } => match page {
            Some(name) => task::run(Task::Critical(name.clone()), &config, mode),
            None => task::critical::extract_all(&config),
        },
        Commands::Icons => task::run(Task::Icons, &config, mode),
        Commands::Compress { .. } => {
            task::run(Task::CompressScripts, &config, mode)?;
            task::run(Task::CompressStyles, &config, mode)
        }
        Commands::Build { .. } => build_all(&config, mode),
        Commands::Serve { .. } => serve::serve(&config),
    }
}

/// Run every bundle pipeline: scripts and styles concurrently (they touch
/// disjoint manifests and output dirs), then icons, then gzip in production.
fn build_all(config: &PipelineConfig, mode: BuildMode) -> Result<()> {
    let (scripts, styles) = rayon::join(
        || task::run(Task::Scripts, config, mode),
        || task::run(Task::Styles, config, mode),
    );
    scripts?;
    styles?;

    task::run(Task::Icons, config, mode)?;

    if mode.is_production() {
        task::run(Task::CompressScripts, config, mode)?;
        task::run(Task::CompressStyles, config, mode)?;
    }
    Ok(())
}
