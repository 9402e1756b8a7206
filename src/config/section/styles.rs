//! `[styles]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [styles]
//! entry = "style.scss"
//! artifact = "style.css"
//! browsers = ["last 2 versions", "> 5%", "ie 9"]
//! ```

use serde::{Deserialize, Serialize};

/// CSS bundle settings: Sass entry, browser targets, artifact name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StylesConfig {
    /// Entry stylesheet filename, relative to `paths.sass`.
    pub entry: String,

    /// Logical artifact filename.
    pub artifact: String,

    /// Browserslist queries used for vendor prefixing.
    pub browsers: Vec<String>,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            entry: "style.scss".to_string(),
            artifact: "style.css".to_string(),
            browsers: vec![
                "last 2 versions".to_string(),
                "> 5%".to_string(),
                "ie 9".to_string(),
            ],
        }
    }
}

impl StylesConfig {
    /// Validate styles configuration.
    pub fn validate(&self, errors: &mut Vec<String>) {
        let is_sass = self.entry.ends_with(".scss") || self.entry.ends_with(".sass");
        if !is_sass {
            errors.push(format!(
                "styles.entry must be a .scss or .sass filename, got '{}'",
                self.entry
            ));
        }
        if !self.artifact.ends_with(".css") {
            errors.push(format!(
                "styles.artifact must be a .css filename, got '{}'",
                self.artifact
            ));
        }
    }
}
