//! SVG icon sprite generation.
//!
//! Combines every icon in the source directory into one hidden `<svg>` of
//! `<symbol>` elements, written into the includes directory so templates
//! can inline it and reference icons with `<use href="#icon-name">`.
//! `fill` attributes are stripped so icons inherit `currentColor`.

use std::fs;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

use crate::config::PipelineConfig;
use crate::transform::svg;
use crate::utils::size::human;
use crate::{debug, log};

static FILL_ATTR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"\s+fill="[^"]*""#).unwrap());

/// Build the icon sprite.
pub fn build(config: &PipelineConfig) -> Result<()> {
    let icons = scan_icons(config)?;
    if icons.is_empty() {
        // Missing input is a no-op, not an error
        debug!("icons"; "no icons found, skipping");
        return Ok(());
    }

    let mut sprite =
        String::from(r#"<svg xmlns="http://www.w3.org/2000/svg" style="display:none">"#);
    let count = icons.len();

    for (stem, content) in icons {
        let icon = svg::optimize(&content)
            .with_context(|| format!("failed to optimize icon '{stem}'"))?;
        let body = FILL_ATTR.replace_all(&icon.body, "");
        sprite.push_str(&format!(
            r#"<symbol id="icon-{stem}" viewBox="{}">{body}</symbol>"#,
            icon.view_box
        ));
    }

    sprite.push_str("</svg>\n");

    fs::create_dir_all(&config.paths.includes).with_context(|| {
        format!("failed to create {}", config.paths.includes.display())
    })?;
    let dest = config.paths.includes.join("icons.svg");
    fs::write(&dest, &sprite)
        .with_context(|| format!("failed to write {}", dest.display()))?;

    log!("icons"; "icons.svg {} ({} icons)", human(sprite.len() as u64), count);
    Ok(())
}

/// Read `*.svg` files from the icon directory in sorted order.
///
/// Returns (stem, content) pairs; a missing directory yields an empty list.
fn scan_icons(config: &PipelineConfig) -> Result<Vec<(String, Vec<u8>)>> {
    let dir = &config.paths.icons;
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut icons = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        let path = entry?.path();
        let is_svg = path.extension().is_some_and(|e| e == "svg");
        if !path.is_file() || !is_svg {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = fs::read(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        icons.push((stem.to_string(), content));
    }

    icons.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(icons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;

    const HEART: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><path fill="#ff0000" d="M8 14 2 8a4 4 0 1 1 6-4 4 4 0 1 1 6 4z"/></svg>"##;
    const STAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 16 16"><path d="M8 0l2 6h6l-5 4 2 6-5-4-5 4 2-6-5-4h6z"/></svg>"#;

    fn test_config(root: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::from_str("").unwrap();
        config.paths.icons = root.join("assets/icons");
        config.paths.includes = root.join("_includes");
        config
    }

    #[test]
    fn test_build_sprite() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(&config.paths.icons).unwrap();
        fs::write(config.paths.icons.join("star.svg"), STAR).unwrap();
        fs::write(config.paths.icons.join("heart.svg"), HEART).unwrap();

        build(&config).unwrap();

        let sprite = fs::read_to_string(config.paths.includes.join("icons.svg")).unwrap();
        assert!(sprite.contains(r#"id="icon-heart""#));
        assert!(sprite.contains(r#"id="icon-star""#));
        assert!(sprite.contains(r#"style="display:none""#));
        // sorted: heart before star
        assert!(sprite.find("icon-heart").unwrap() < sprite.find("icon-star").unwrap());
        // fill attributes stripped so CSS controls color
        assert!(!sprite.contains("fill=\"#ff0000\""));
    }

    #[test]
    fn test_missing_icon_dir_is_noop() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());

        build(&config).unwrap();
        assert!(!config.paths.includes.join("icons.svg").exists());
    }

    #[test]
    fn test_invalid_icon_aborts() {
        let dir = TempDir::new().unwrap();
        let config = test_config(dir.path());
        fs::create_dir_all(&config.paths.icons).unwrap();
        fs::write(config.paths.icons.join("broken.svg"), "not svg").unwrap();

        assert!(build(&config).is_err());
    }
}
