//! Revision manifests: logical asset name -> current revisioned filename.
//!
//! One manifest per bundle type, fully rewritten on every production run.
//! The file is a flat JSON object so downstream template generation can read
//! it without any schema knowledge.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A bundle's manifest, keyed by logical filename.
///
/// `BTreeMap` keeps serialized output byte-stable across runs so unchanged
/// content produces an identical manifest file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    entries: BTreeMap<String, String>,
}

impl Manifest {
    /// Create an empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a manifest from disk.
    ///
    /// A missing or unreadable file yields an empty manifest: there is
    /// nothing to prune on a first build, and a corrupt manifest must not
    /// fail the run (it will be rewritten wholesale).
    pub fn load(path: &Path) -> Self {
        let entries = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();
        Self { entries }
    }

    /// Look up the revisioned name for a logical filename.
    pub fn get(&self, logical: &str) -> Option<&str> {
        self.entries.get(logical).map(String::as_str)
    }

    /// Record a logical -> revisioned mapping.
    pub fn insert(&mut self, logical: impl Into<String>, revisioned: impl Into<String>) {
        self.entries.insert(logical.into(), revisioned.into());
    }

    /// Revisioned filenames recorded in this manifest.
    pub fn revisioned_names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Whether a revisioned filename is referenced by this manifest.
    pub fn references(&self, revisioned: &str) -> bool {
        self.entries.values().any(|v| v == revisioned)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Persist the manifest atomically.
    ///
    /// Writes to a temporary sibling and renames into place, so a concurrent
    /// reader (the downstream template generator) never observes a
    /// half-written mapping.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        let tmp = tmp_path(path);
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_empty() {
        let dir = TempDir::new().unwrap();
        let manifest = Manifest::load(&dir.path().join("js-manifest.json"));
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("js-manifest.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Manifest::load(&path).is_empty());
    }

    #[test]
    fn test_write_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("css-manifest.json");

        let mut manifest = Manifest::new();
        manifest.insert("style.css", "style-a1b2c3d4.css");
        manifest.write(&path).unwrap();

        let loaded = Manifest::load(&path);
        assert_eq!(loaded.get("style.css"), Some("style-a1b2c3d4.css"));
        // no temp file left behind
        assert!(!dir.path().join("css-manifest.json.tmp").exists());
    }

    #[test]
    fn test_write_is_flat_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("js-manifest.json");

        let mut manifest = Manifest::new();
        manifest.insert("index.js", "index-9f86d081.js");
        manifest.write(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["index.js"], "index-9f86d081.js");
        assert_eq!(json.as_object().unwrap().len(), 1);
    }

    #[test]
    fn test_rewrite_drops_stale_entries() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("js-manifest.json");

        let mut old = Manifest::new();
        old.insert("index.js", "index-11111111.js");
        old.insert("legacy.js", "legacy-22222222.js");
        old.write(&path).unwrap();

        // a new run only produces index.js; the full rewrite drops legacy.js
        let mut new = Manifest::new();
        new.insert("index.js", "index-33333333.js");
        new.write(&path).unwrap();

        let loaded = Manifest::load(&path);
        assert_eq!(loaded.get("index.js"), Some("index-33333333.js"));
        assert_eq!(loaded.get("legacy.js"), None);
    }

    #[test]
    fn test_references() {
        let mut manifest = Manifest::new();
        manifest.insert("index.js", "index-9f86d081.js");
        assert!(manifest.references("index-9f86d081.js"));
        assert!(!manifest.references("index-deadbeef.js"));
    }
}
