//! The CSS bundle pipeline.
//!
//! Stages, in order: staleness filter (dev) -> Sass compile -> vendor
//! prefix -> source map (dev) -> minify (prod, same lightningcss pass) ->
//! revision + manifest (prod).

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::bundle::{self, Bundle};
use crate::config::PipelineConfig;
use crate::core::BuildMode;
use crate::transform::{css, sourcemap};
use crate::utils::size::human;
use crate::{debug, log};

/// Build the CSS bundle.
pub fn build(config: &PipelineConfig, mode: BuildMode) -> Result<()> {
    let entry = config.paths.sass.join(&config.styles.entry);
    if !entry.exists() {
        // Missing input is a no-op for the bundle, not an error
        debug!("styles"; "{} not found, skipping", config.styles.entry);
        return Ok(());
    }

    let bundle = Bundle::styles(config);
    let artifact_path = bundle.artifact_path();

    // The whole Sass tree feeds the one artifact: any partial re-admits it.
    if !mode.is_production() && bundle::is_fresh(&artifact_path, sass_sources(config)) {
        debug!("styles"; "{} is up to date", bundle.artifact);
        return Ok(());
    }

    let compiled = css::compile_sass(&entry, &config.paths.sass)?;
    let targets = css::browser_targets(&config.styles.browsers)?;
    let mut code = css::process(&compiled, targets, mode.is_production())?;
    log!("styles"; "{} {}", bundle.artifact, human(code.len() as u64));

    fs::create_dir_all(&bundle.out_dir)
        .with_context(|| format!("failed to create {}", bundle.out_dir.display()))?;

    if mode.source_maps {
        let mapped = [sourcemap::MappedSource {
            name: &config.styles.entry,
            content: &code,
        }];
        let map_name = format!("{}.map", bundle.artifact);
        let map = sourcemap::line_identity_map(&bundle.artifact, &mapped);
        fs::write(bundle.out_dir.join(&map_name), map)
            .with_context(|| format!("failed to write {map_name}"))?;
        code.push_str(&sourcemap::map_comment(&map_name, true));
    }

    fs::write(&artifact_path, &code)
        .with_context(|| format!("failed to write {}", artifact_path.display()))?;

    if mode.is_production() {
        let revisioned = bundle::revision(&bundle, code.as_bytes())?;
        log!("styles"; "{} {}", revisioned, human(code.len() as u64));
    }

    Ok(())
}

/// Every Sass file under the source root (entry plus partials).
fn sass_sources(config: &PipelineConfig) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    for entry in jwalk::WalkDir::new(&config.paths.sass).sort(true) {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        let is_sass = path
            .extension()
            .is_some_and(|e| e == "scss" || e == "sass");
        if path.is_file() && is_sass {
            sources.push(path);
        }
    }
    sources
}
