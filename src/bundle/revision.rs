//! Content-hash revisioning for cache busting.
//!
//! Renames an artifact to embed a hash of its bytes and records the mapping
//! in the bundle's manifest. When content changes the hash changes, the
//! filename changes, and browsers re-fetch.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::utils::hash::fingerprint;

use super::{Bundle, Manifest};

/// Revision an artifact and update the bundle's manifest.
///
/// Two-phase write: the new mapping is computed first, then previously
/// revisioned files absent from it are deleted, then the manifest is
/// persisted. A reader therefore never sees a manifest entry pointing at a
/// deleted file; a failure at any step leaves the previous manifest file
/// untouched.
///
/// Returns the revisioned filename (`index-9f86d081.js`).
pub fn revision(bundle: &Bundle, content: &[u8]) -> Result<String> {
    let (stem, ext) = bundle.split_name()?;
    let revisioned = format!("{stem}-{}.{ext}", fingerprint(content));

    // Phase 1: compute the new mapping and write the hashed file.
    let previous = Manifest::load(&bundle.manifest_path);
    let mut manifest = Manifest::new();
    manifest.insert(bundle.artifact.clone(), revisioned.clone());

    let revisioned_path = bundle.out_dir.join(&revisioned);
    fs::create_dir_all(&bundle.out_dir)
        .with_context(|| format!("failed to create {}", bundle.out_dir.display()))?;
    fs::write(&revisioned_path, content)
        .with_context(|| format!("failed to write {}", revisioned_path.display()))?;

    // Phase 2: delete prior revisioned files not referenced by the new
    // mapping, so hashed outputs don't accumulate across builds.
    for old in previous.revisioned_names() {
        if !manifest.references(old) {
            remove_revisioned(&bundle.out_dir, old)?;
        }
    }

    // Phase 3: persist the mapping (atomic rename inside).
    manifest.write(&bundle.manifest_path)?;

    Ok(revisioned)
}

/// Remove a stale revisioned file and its gzip sibling from a prior
/// compress run. Already-gone files are fine; other failures are not.
fn remove_revisioned(out_dir: &Path, name: &str) -> Result<()> {
    for candidate in [
        out_dir.join(name),
        out_dir.join(format!("{name}.gz")),
    ] {
        match fs::remove_file(&candidate) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to remove {}", candidate.display()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn js_bundle(dir: &TempDir) -> Bundle {
        Bundle {
            label: "scripts",
            artifact: "index.js".into(),
            out_dir: dir.path().join("out"),
            manifest_path: dir.path().join("js-manifest.json"),
        }
    }

    fn revisioned_files(bundle: &Bundle) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(&bundle.out_dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_revision_writes_hashed_file_and_manifest() {
        let dir = TempDir::new().unwrap();
        let bundle = js_bundle(&dir);

        let name = revision(&bundle, b"console.log(1)").unwrap();
        assert!(name.starts_with("index-"));
        assert!(name.ends_with(".js"));
        assert_eq!(name.len(), "index-".len() + 8 + ".js".len());

        assert!(bundle.out_dir.join(&name).exists());
        let manifest = Manifest::load(&bundle.manifest_path);
        assert_eq!(manifest.get("index.js"), Some(name.as_str()));
    }

    #[test]
    fn test_revision_idempotent() {
        let dir = TempDir::new().unwrap();
        let bundle = js_bundle(&dir);

        let first = revision(&bundle, b"console.log(1)").unwrap();
        let second = revision(&bundle, b"console.log(1)").unwrap();

        // unchanged content: same name, exactly one revisioned file on disk
        assert_eq!(first, second);
        assert_eq!(revisioned_files(&bundle), vec![first]);
    }

    #[test]
    fn test_revision_replaces_stale_output() {
        let dir = TempDir::new().unwrap();
        let bundle = js_bundle(&dir);

        let old = revision(&bundle, b"console.log(1)").unwrap();
        let new = revision(&bundle, b"console.log(2)").unwrap();

        assert_ne!(old, new);
        assert!(!bundle.out_dir.join(&old).exists());
        assert!(bundle.out_dir.join(&new).exists());
        assert_eq!(
            Manifest::load(&bundle.manifest_path).get("index.js"),
            Some(new.as_str())
        );
    }

    #[test]
    fn test_revision_removes_gzip_sibling() {
        let dir = TempDir::new().unwrap();
        let bundle = js_bundle(&dir);

        let old = revision(&bundle, b"console.log(1)").unwrap();
        fs::write(bundle.out_dir.join(format!("{old}.gz")), b"gz").unwrap();

        revision(&bundle, b"console.log(2)").unwrap();
        assert!(!bundle.out_dir.join(format!("{old}.gz")).exists());
    }

    #[test]
    fn test_revision_failure_leaves_manifest_untouched() {
        let dir = TempDir::new().unwrap();
        let mut bundle = js_bundle(&dir);

        let name = revision(&bundle, b"console.log(1)").unwrap();

        // make the output dir unwritable by pointing it at a file
        bundle.out_dir = dir.path().join("blocked");
        fs::write(&bundle.out_dir, b"not a dir").unwrap();

        assert!(revision(&bundle, b"console.log(2)").is_err());
        assert_eq!(
            Manifest::load(&bundle.manifest_path).get("index.js"),
            Some(name.as_str())
        );
    }
}
