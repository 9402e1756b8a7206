//! `[paths]` section configuration.
//!
//! All paths are relative to the project root (the directory containing
//! `muster.toml`) and normalized to absolute form at load time.
//!
//! # Example
//!
//! ```toml
//! [paths]
//! js = "assets/js"
//! sass = "assets/scss"
//! icons = "assets/icons"
//! includes = "_includes"
//! js_out = ".tmp/assets/js"
//! css_out = ".tmp/assets/css"
//! site = "_site"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Filesystem layout: source roots, per-asset-type output directories,
/// generated-includes directory and manifest file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// JS source root (contains `vendor/`, `plugins/`, `main.js`).
    pub js: PathBuf,

    /// Sass source root (contains the entry stylesheet).
    pub sass: PathBuf,

    /// SVG icon source directory.
    pub icons: PathBuf,

    /// Generated-includes directory (sprite, critical CSS fragments).
    pub includes: PathBuf,

    /// Output (temp) directory for compiled JS.
    pub js_out: PathBuf,

    /// Output (temp) directory for compiled CSS.
    pub css_out: PathBuf,

    /// Rendered site root (served in dev, read for critical CSS pages).
    pub site: PathBuf,

    /// JS bundle manifest file.
    pub js_manifest: PathBuf,

    /// CSS bundle manifest file.
    pub css_manifest: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            js: PathBuf::from("assets/js"),
            sass: PathBuf::from("assets/scss"),
            icons: PathBuf::from("assets/icons"),
            includes: PathBuf::from("_includes"),
            js_out: PathBuf::from(".tmp/assets/js"),
            css_out: PathBuf::from(".tmp/assets/css"),
            site: PathBuf::from("_site"),
            js_manifest: PathBuf::from("assets/js-manifest.json"),
            css_manifest: PathBuf::from("assets/css-manifest.json"),
        }
    }
}

impl PathsConfig {
    /// Normalize every path against the project root.
    pub fn normalize(&mut self, root: &Path) {
        use crate::utils::path::resolve_against;

        for path in [
            &mut self.js,
            &mut self.sass,
            &mut self.icons,
            &mut self.includes,
            &mut self.js_out,
            &mut self.css_out,
            &mut self.site,
            &mut self.js_manifest,
            &mut self.css_manifest,
        ] {
            *path = resolve_against(path, root);
        }
    }
}
