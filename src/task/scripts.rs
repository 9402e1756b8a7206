//! The JS bundle pipeline.
//!
//! Stages, in order: staleness filter (dev) -> ordered concatenation ->
//! source map (dev) -> minification (prod) -> revision + manifest (prod).

use std::fs;

use anyhow::{Context, Result};

use crate::bundle::{self, Bundle};
use crate::config::PipelineConfig;
use crate::core::BuildMode;
use crate::transform::{js, sourcemap};
use crate::utils::size::human;
use crate::{debug, log};

/// Build the JS bundle.
pub fn build(config: &PipelineConfig, mode: BuildMode) -> Result<()> {
    let sources = bundle::collect_script_sources(config);
    if sources.is_empty() {
        // Missing input is a no-op for the bundle, not an error
        debug!("scripts"; "no sources matched, skipping");
        return Ok(());
    }

    let bundle = Bundle::scripts(config);
    let artifact_path = bundle.artifact_path();

    // Incremental rebuilds only exist in development; production always
    // rebuilds fully since revisioning depends on final bytes.
    if !mode.is_production() && bundle::is_fresh(&artifact_path, &sources) {
        debug!("scripts"; "{} is up to date", bundle.artifact);
        return Ok(());
    }

    let files = js::read_sources(&sources, &config.paths.js)?;
    let mut code = js::concat(&files);
    log!("scripts"; "{} {}", bundle.artifact, human(code.len() as u64));

    if mode.is_production() {
        code = js::minify(&code).context("scripts minification failed")?;
    }

    fs::create_dir_all(&bundle.out_dir)
        .with_context(|| format!("failed to create {}", bundle.out_dir.display()))?;

    if mode.source_maps {
        let mapped: Vec<_> = files
            .iter()
            .map(|f| sourcemap::MappedSource {
                name: &f.name,
                content: &f.content,
            })
            .collect();
        let map_name = format!("{}.map", bundle.artifact);
        let map = sourcemap::line_identity_map(&bundle.artifact, &mapped);
        fs::write(bundle.out_dir.join(&map_name), map)
            .with_context(|| format!("failed to write {map_name}"))?;
        code.push_str(&sourcemap::map_comment(&map_name, false));
    }

    fs::write(&artifact_path, &code)
        .with_context(|| format!("failed to write {}", artifact_path.display()))?;

    if mode.is_production() {
        let revisioned = bundle::revision(&bundle, code.as_bytes())?;
        log!("scripts"; "{} {}", revisioned, human(code.len() as u64));
    }

    Ok(())
}
