//! CSS transforms: Sass compilation, vendor prefixing, minification.
//!
//! Sass compiles via grass; prefixing and minification happen in a single
//! lightningcss pass driven by browserslist targets, so the minifier never
//! re-applies prefixes.

use std::path::Path;

use anyhow::{Result, anyhow};
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

/// Compile a Sass entry file to plain CSS.
///
/// `load_path` is the Sass root, so `@use`/`@import` resolve against it.
/// Errors carry grass's file/line context.
pub fn compile_sass(entry: &Path, load_path: &Path) -> Result<String> {
    let options = grass::Options::default().load_path(load_path);
    grass::from_path(entry, &options).map_err(|e| anyhow!("Sass compilation failed:\n{e}"))
}

/// Parse browserslist queries into lightningcss targets.
pub fn browser_targets(browsers: &[String]) -> Result<Targets> {
    let browsers = Browsers::from_browserslist(browsers.iter().map(String::as_str))
        .map_err(|e| anyhow!("invalid browserslist query: {e}"))?;
    Ok(Targets::from(browsers))
}

/// Add vendor prefixes for the target browsers and optionally minify.
///
/// One parse/print round-trip: targets drive prefix insertion during
/// printing, `minify` controls output compression only.
pub fn process(source: &str, targets: Targets, minify: bool) -> Result<String> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| anyhow!("CSS parse failed: {e}"))?;

    stylesheet
        .minify(MinifyOptions {
            targets,
            ..MinifyOptions::default()
        })
        .map_err(|e| anyhow!("CSS transform failed: {e}"))?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify,
            targets,
            ..PrinterOptions::default()
        })
        .map_err(|e| anyhow!("CSS print failed: {e}"))?;

    Ok(result.code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn targets() -> Targets {
        browser_targets(&["last 2 versions".into(), "> 5%".into(), "ie 9".into()]).unwrap()
    }

    #[test]
    fn test_compile_sass() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, "$color: red;\nbody { color: $color; }\n").unwrap();

        let css = compile_sass(&entry, dir.path()).unwrap();
        assert!(css.contains("color: red"));
    }

    #[test]
    fn test_compile_sass_resolves_imports() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("_base.scss"), "body { margin: 0; }\n").unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, "@use \"base\";\n").unwrap();

        let css = compile_sass(&entry, dir.path()).unwrap();
        assert!(css.contains("margin: 0"));
    }

    #[test]
    fn test_compile_sass_error_has_context() {
        let dir = TempDir::new().unwrap();
        let entry = dir.path().join("style.scss");
        fs::write(&entry, "body { color: ; }\n").unwrap();

        let err = compile_sass(&entry, dir.path()).unwrap_err();
        assert!(err.to_string().contains("Sass compilation failed"));
    }

    #[test]
    fn test_process_adds_prefixes() {
        let css = "body { user-select: none; }";
        let out = process(css, targets(), false).unwrap();
        assert!(out.contains("-webkit-user-select") || out.contains("-ms-user-select"));
    }

    #[test]
    fn test_process_minifies() {
        let css = "body {\n  color: #ff0000;\n}\n";
        let out = process(css, targets(), true).unwrap();
        assert!(!out.contains('\n') || out.lines().count() == 1);
        assert!(out.contains("body"));
    }

    #[test]
    fn test_process_rejects_malformed_css() {
        assert!(process("body { color: }", targets(), true).is_err());
    }
}
