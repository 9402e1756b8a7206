//! Asset bundles: the ordered source sets feeding one output artifact each.

mod manifest;
mod revision;
mod staleness;

pub use manifest::Manifest;
pub use revision::revision;
pub use staleness::is_fresh;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::config::PipelineConfig;

/// One logical output artifact: where it compiles to and which manifest
/// tracks its revisioned name.
///
/// The JS and CSS bundles have disjoint output directories and manifests,
/// so their pipelines never share mutable state.
#[derive(Debug, Clone)]
pub struct Bundle {
    /// Display label for logs (`scripts`, `styles`).
    pub label: &'static str,
    /// Logical artifact filename (`index.js`, `style.css`).
    pub artifact: String,
    /// Output (temp) directory the artifact compiles into.
    pub out_dir: PathBuf,
    /// Manifest file tracking logical name -> revisioned name.
    pub manifest_path: PathBuf,
}

impl Bundle {
    /// The JS bundle for this configuration.
    pub fn scripts(config: &PipelineConfig) -> Self {
        Self {
            label: "scripts",
            artifact: config.scripts.artifact.clone(),
            out_dir: config.paths.js_out.clone(),
            manifest_path: config.paths.js_manifest.clone(),
        }
    }

    /// The CSS bundle for this configuration.
    pub fn styles(config: &PipelineConfig) -> Self {
        Self {
            label: "styles",
            artifact: config.styles.artifact.clone(),
            out_dir: config.paths.css_out.clone(),
            manifest_path: config.paths.css_manifest.clone(),
        }
    }

    /// Full path of the un-revisioned artifact.
    pub fn artifact_path(&self) -> PathBuf {
        self.out_dir.join(&self.artifact)
    }

    /// Artifact stem and extension, split for revisioned-name construction.
    pub fn split_name(&self) -> Result<(&str, &str)> {
        match self.artifact.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Ok((stem, ext)),
            _ => bail!("artifact '{}' has no extension", self.artifact),
        }
    }
}

/// Expand the configured, ordered JS source entries into a flat file list.
///
/// Each entry is a file or a directory under the JS root; directories expand
/// to their `.js` files in sorted order. Entry order is preserved exactly as
/// configured (vendor scripts must precede application code). Entries that
/// match nothing are skipped.
pub fn collect_script_sources(config: &PipelineConfig) -> Vec<PathBuf> {
    let root = &config.paths.js;
    let mut sources = Vec::new();

    for entry in &config.scripts.sources {
        let path = root.join(entry);
        if path.is_file() {
            sources.push(path);
        } else if path.is_dir() {
            collect_js_files(&path, &mut sources);
        }
    }

    sources
}

/// Recursively collect `.js` files under a directory in sorted order.
fn collect_js_files(dir: &Path, out: &mut Vec<PathBuf>) {
    for entry in jwalk::WalkDir::new(dir).sort(true) {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|e| e == "js") {
            out.push(path);
        }
    }
}
