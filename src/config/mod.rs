//! Pipeline configuration management for `muster.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                             |
//! |--------------|-----------------------------------------------------|
//! | `[paths]`    | Source roots, output (temp) dirs, manifest files    |
//! | `[scripts]`  | JS bundle: ordered sources, artifact name           |
//! | `[styles]`   | Sass entry, browser targets, artifact name          |
//! | `[critical]` | Viewport dimensions and page templates              |
//! | `[serve]`    | Development server (interface, port, watch)         |

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{
    CriticalConfig, PathsConfig, ScriptsConfig, ServeConfig, StylesConfig, Viewport,
};

use util::find_config_file;

use crate::cli::Cli;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing muster.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Source roots, output dirs and manifest locations
    pub paths: PathsConfig,

    /// JS bundle settings
    pub scripts: ScriptsConfig,

    /// CSS bundle settings
    pub styles: StylesConfig,

    /// Critical CSS extraction settings
    pub critical: CriticalConfig,

    /// Development server settings
    pub serve: ServeConfig,
}

impl PipelineConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd to find the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        crate::logger::set_verbose(cli.is_verbose());

        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(ConfigError::NotFound(cli.config.clone()));
        };

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path.clone();

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.root = crate::utils::path::normalize_path(&root);

        config.apply_serve_options(cli);
        config.normalize_paths();
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let (config, _) = Self::parse_with_ignored(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            let display_path = path
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_else(|| path.to_string_lossy());
            crate::log!("warning"; "unknown fields in {}:", display_path);
            for field in &ignored {
                eprintln!("- {}", field);
            }
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Parse)?;
        Ok((config, ignored))
    }

    /// Apply serve-specific CLI overrides.
    fn apply_serve_options(&mut self, cli: &Cli) {
        if let crate::cli::Commands::Serve {
            interface,
            port,
            watch,
        } = &cli.command
        {
            if let Some(interface) = interface {
                self.serve.interface = *interface;
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
            if let Some(watch) = watch {
                self.serve.watch = *watch;
            }
        }
    }

    /// Normalize all configured paths to absolute form against the root.
    fn normalize_paths(&mut self) {
        let root = self.root.clone();
        self.paths.normalize(&root);
        self.serve.normalize(&root);
    }

    /// Validate configuration, collecting all errors before reporting.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        self.scripts.validate(&mut errors);
        self.styles.validate(&mut errors);
        self.critical.validate(&mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(ConfigError::Validation(errors.join("\n")));
        }
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config from a TOML fragment, panicking on unknown fields
/// (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> PipelineConfig {
    let (parsed, ignored) = PipelineConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
