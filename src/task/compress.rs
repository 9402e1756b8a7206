//! Gzip post-processing for revisioned artifacts.
//!
//! Appends a `.gz` suffix instead of replacing the original: the serving
//! layer picks plain or compressed at request time, so both must exist.
//! Size telemetry is operator-facing output only.

use std::fs;
use std::io::Write;

use anyhow::{Context, Result};
use flate2::Compression;
use flate2::write::GzEncoder;

use crate::bundle::{Bundle, Manifest};
use crate::core::BuildMode;
use crate::utils::size::{human, saved_percent};
use crate::{debug, log};

/// Gzip every revisioned artifact recorded in the bundle's manifest.
///
/// Production-only: outside production there are no revisioned artifacts
/// to compress and the task is a no-op.
pub fn compress_bundle(bundle: &Bundle, mode: BuildMode) -> Result<()> {
    if !mode.is_production() {
        debug!("gzip"; "skipped outside production");
        return Ok(());
    }

    let manifest = Manifest::load(&bundle.manifest_path);
    if manifest.is_empty() {
        debug!("gzip"; "no {} manifest entries, skipping", bundle.label);
        return Ok(());
    }

    for revisioned in manifest.revisioned_names() {
        let path = bundle.out_dir.join(revisioned);
        let content = fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&content)?;
        let compressed = encoder.finish()?;

        let gz_path = bundle.out_dir.join(format!("{revisioned}.gz"));
        fs::write(&gz_path, &compressed)
            .with_context(|| format!("failed to write {}", gz_path.display()))?;

        let before = content.len() as u64;
        let after = compressed.len() as u64;
        log!(
            "gzip";
            "{}.gz {} -> {} ({}% saved)",
            revisioned,
            human(before),
            human(after),
            saved_percent(before, after)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn bundle_with_artifact(dir: &TempDir, content: &[u8]) -> (Bundle, String) {
        let bundle = Bundle {
            label: "scripts",
            artifact: "index.js".into(),
            out_dir: dir.path().join("out"),
            manifest_path: dir.path().join("js-manifest.json"),
        };
        fs::create_dir_all(&bundle.out_dir).unwrap();
        let revisioned = crate::bundle::revision(&bundle, content).unwrap();
        (bundle, revisioned)
    }

    #[test]
    fn test_compress_keeps_both_files() {
        let dir = TempDir::new().unwrap();
        let payload = "var x = 1;\n".repeat(50);
        let (bundle, revisioned) = bundle_with_artifact(&dir, payload.as_bytes());

        compress_bundle(&bundle, BuildMode::PRODUCTION).unwrap();

        let plain = bundle.out_dir.join(&revisioned);
        let gz = bundle.out_dir.join(format!("{revisioned}.gz"));
        assert!(plain.exists());
        assert!(gz.exists());

        // round-trips back to the original bytes
        let mut decoder = GzDecoder::new(fs::File::open(&gz).unwrap());
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, payload);
    }

    #[test]
    fn test_compress_noop_in_development() {
        let dir = TempDir::new().unwrap();
        let (bundle, revisioned) = bundle_with_artifact(&dir, b"var x = 1;");

        compress_bundle(&bundle, BuildMode::DEVELOPMENT).unwrap();
        assert!(!bundle.out_dir.join(format!("{revisioned}.gz")).exists());
    }

    #[test]
    fn test_compress_noop_without_manifest() {
        let dir = TempDir::new().unwrap();
        let bundle = Bundle {
            label: "styles",
            artifact: "style.css".into(),
            out_dir: dir.path().join("out"),
            manifest_path: PathBuf::from("/nonexistent/css-manifest.json"),
        };

        compress_bundle(&bundle, BuildMode::PRODUCTION).unwrap();
    }
}
