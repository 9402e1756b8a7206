//! `[critical]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [critical]
//! dimensions = [[320, 480], [768, 1024], [1280, 960]]
//!
//! [critical.pages]
//! page = "articles/ipad-pro/index.html"
//! archive = "mastering-paper/index.html"
//! splash = "index.html"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A viewport used for critical CSS extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport(pub u32, pub u32);

impl Viewport {
    pub const fn width(&self) -> u32 {
        self.0
    }

    pub const fn height(&self) -> u32 {
        self.1
    }
}

/// Critical CSS extraction settings: viewports and the page templates to
/// extract for, keyed by template name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalConfig {
    /// Viewport dimensions for common device sizes.
    pub dimensions: Vec<Viewport>,

    /// Page template name -> rendered HTML path relative to `paths.site`.
    pub pages: BTreeMap<String, PathBuf>,
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self {
            dimensions: vec![Viewport(320, 480), Viewport(768, 1024), Viewport(1280, 960)],
            pages: BTreeMap::new(),
        }
    }
}

impl CriticalConfig {
    /// Validate critical CSS configuration.
    pub fn validate(&self, errors: &mut Vec<String>) {
        if self.dimensions.is_empty() {
            errors.push("critical.dimensions must not be empty".to_string());
        }
        for (name, path) in &self.pages {
            if path.is_absolute() {
                errors.push(format!(
                    "critical.pages.{} must be relative to paths.site: '{}'",
                    name,
                    path.display()
                ));
            }
        }
    }
}
