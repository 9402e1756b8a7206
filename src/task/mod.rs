//! Pipeline entry points and their dispatch table.
//!
//! Every operation is a named, independently invocable task. The CLI and
//! the file watcher both dispatch through [`run`]; there is no task
//! registry beyond this explicit mapping.

pub mod compress;
pub mod critical;
pub mod icons;
pub mod scripts;
pub mod styles;

use anyhow::Result;

use crate::config::PipelineConfig;
use crate::core::BuildMode;

/// A named pipeline invocation.
///
/// Tasks for different bundles touch disjoint manifests and output
/// directories, so re-running one while another is in flight is safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Concatenate/minify/revision the JS bundle.
    Scripts,
    /// Compile/prefix/minify/revision the CSS bundle.
    Styles,
    /// Extract critical CSS for one named page template.
    Critical(String),
    /// Rebuild the SVG icon sprite.
    Icons,
    /// Gzip the revisioned JS artifacts.
    CompressScripts,
    /// Gzip the revisioned CSS artifacts.
    CompressStyles,
}

impl Task {
    /// Display label for logs and watch status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Styles => "styles",
            Self::Critical(_) => "critical",
            Self::Icons => "icons",
            Self::CompressScripts | Self::CompressStyles => "gzip",
        }
    }
}

/// Run one task to completion.
pub fn run(task: Task, config: &PipelineConfig, mode: BuildMode) -> Result<()> {
    match task {
        Task::Scripts => scripts::build(config, mode),
        Task::Styles => styles::build(config, mode),
        Task::Critical(page) => critical::extract(config, &page),
        Task::Icons => icons::build(config),
        Task::CompressScripts => {
            compress::compress_bundle(&crate::bundle::Bundle::scripts(config), mode)
        }
        Task::CompressStyles => {
            compress::compress_bundle(&crate::bundle::Bundle::styles(config), mode)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::Manifest;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn site_config(root: &Path) -> PipelineConfig {
        let mut config = PipelineConfig::from_str("").unwrap();
        config.paths.js = root.join("assets/js");
        config.paths.sass = root.join("assets/scss");
        config.paths.js_out = root.join(".tmp/assets/js");
        config.paths.css_out = root.join(".tmp/assets/css");
        config.paths.js_manifest = root.join("assets/js-manifest.json");
        config.paths.css_manifest = root.join("assets/css-manifest.json");
        config
    }

    /// The full production scripts scenario: vendor -> plugins -> main
    /// concatenated, minified, hashed, manifest written, gzip sibling kept.
    #[test]
    fn test_production_scripts_end_to_end() {
        let dir = TempDir::new().unwrap();
        let js = dir.path().join("assets/js");
        fs::create_dir_all(js.join("vendor")).unwrap();
        fs::create_dir_all(js.join("plugins")).unwrap();
        fs::write(js.join("vendor/jquery.js"), "var jQuery = function () {};\n").unwrap();
        fs::write(js.join("plugins/a.js"), "var pluginA = jQuery;\n").unwrap();
        fs::write(js.join("main.js"), "console.log(jQuery, pluginA);\n").unwrap();

        let config = site_config(dir.path());
        run(Task::Scripts, &config, BuildMode::PRODUCTION).unwrap();
        run(Task::CompressScripts, &config, BuildMode::PRODUCTION).unwrap();

        let manifest = Manifest::load(&config.paths.js_manifest);
        let revisioned = manifest.get("index.js").unwrap();
        assert!(config.paths.js_out.join(revisioned).exists());
        assert!(
            config
                .paths
                .js_out
                .join(format!("{revisioned}.gz"))
                .exists()
        );
    }

    /// The development styles scenario: style.css plus style.css.map, no
    /// manifest entry.
    #[test]
    fn test_development_styles_end_to_end() {
        let dir = TempDir::new().unwrap();
        let sass = dir.path().join("assets/scss");
        fs::create_dir_all(&sass).unwrap();
        fs::write(sass.join("style.scss"), "body { margin: 0; }\n").unwrap();

        let config = site_config(dir.path());
        run(Task::Styles, &config, BuildMode::DEVELOPMENT).unwrap();

        assert!(config.paths.css_out.join("style.css").exists());
        assert!(config.paths.css_out.join("style.css.map").exists());
        assert!(Manifest::load(&config.paths.css_manifest).is_empty());
    }

    #[test]
    fn test_task_labels() {
        assert_eq!(Task::Scripts.label(), "scripts");
        assert_eq!(Task::Critical("splash".into()).label(), "critical");
        assert_eq!(Task::CompressStyles.label(), "gzip");
    }
}
