//! `[scripts]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [scripts]
//! # Order matters: entries are concatenated top to bottom, so vendor
//! # scripts must come before application code.
//! sources = ["vendor/jquery", "plugins", "main.js"]
//! artifact = "index.js"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// JS bundle settings: ordered source entries and the artifact name.
///
/// Each source entry is relative to `paths.js` and may be a single file or
/// a directory (expanded to its `.js` files in sorted order). Entry order is
/// preserved exactly as configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Ordered source entries (files or directories) relative to `paths.js`.
    pub sources: Vec<PathBuf>,

    /// Logical artifact filename.
    pub artifact: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                PathBuf::from("vendor"),
                PathBuf::from("plugins"),
                PathBuf::from("main.js"),
            ],
            artifact: "index.js".to_string(),
        }
    }
}

impl ScriptsConfig {
    /// Validate scripts configuration.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.sources.is_empty() {
            errors.push("scripts.sources must not be empty".to_string());
        }
        if !self.artifact.ends_with(".js") {
            errors.push(format!(
                "scripts.artifact must be a .js filename, got '{}'",
                self.artifact
            ));
        }
        for source in &self.sources {
            if source.is_absolute() {
                errors.push(format!(
                    "scripts.sources entries must be relative to paths.js: '{}'",
                    source.display()
                ));
            }
        }
    }
}
