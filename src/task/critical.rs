//! Critical CSS extraction for named page templates.
//!
//! For each configured page: parse the rendered HTML, keep stylesheet rules
//! whose selectors match elements present in the page, drop `@font-face`
//! rules and rules referencing `url(...)` (webfonts and background images
//! load deferred), minify, and write the fragment into the includes
//! directory for inlining by the page generator.

use std::fs;
use std::sync::LazyLock;

use anyhow::{Context, Result, bail};
use regex::Regex;
use rustc_hash::FxHashSet;

use crate::config::PipelineConfig;
use crate::transform::css;
use crate::utils::size::human;
use crate::{debug, log};

/// Extract critical CSS for every configured page.
pub fn extract_all(config: &PipelineConfig) -> Result<()> {
    if config.critical.pages.is_empty() {
        debug!("critical"; "no pages configured, skipping");
        return Ok(());
    }

    // Pages are independent: one failing page doesn't stop the others.
    let mut failed = 0usize;
    for name in config.critical.pages.keys() {
        if let Err(e) = extract(config, name) {
            log!("error"; "critical '{}': {:#}", name, e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{failed} critical CSS page(s) failed");
    }
    Ok(())
}

/// Extract critical CSS for one named page template.
pub fn extract(config: &PipelineConfig, page: &str) -> Result<()> {
    let Some(rel) = config.critical.pages.get(page) else {
        bail!("page '{page}' is not configured under [critical.pages]");
    };

    let html_path = config.paths.site.join(rel);
    let html = fs::read_to_string(&html_path)
        .with_context(|| format!("failed to read rendered page {}", html_path.display()))?;

    let css_path = config.paths.css_out.join(&config.styles.artifact);
    let stylesheet = fs::read_to_string(&css_path).with_context(|| {
        format!(
            "failed to read {} (run the styles pipeline first)",
            css_path.display()
        )
    })?;

    let tokens = page_tokens(&html)?;
    let filtered = filter_critical(&stylesheet, &tokens);

    let targets = css::browser_targets(&config.styles.browsers)?;
    let minified = css::process(&filtered, targets, true)?;

    fs::create_dir_all(&config.paths.includes).with_context(|| {
        format!("failed to create {}", config.paths.includes.display())
    })?;
    let dest = config.paths.includes.join(format!("critical-{page}.css"));
    fs::write(&dest, &minified)
        .with_context(|| format!("failed to write {}", dest.display()))?;

    let viewports: Vec<String> = config
        .critical
        .dimensions
        .iter()
        .map(|v| format!("{}x{}", v.width(), v.height()))
        .collect();
    log!(
        "critical";
        "critical-{}.css {} ({})",
        page,
        human(minified.len() as u64),
        viewports.join(", ")
    );

    Ok(())
}

// ============================================================================
// Page tokens
// ============================================================================

/// Selector-relevant tokens present in a rendered page.
#[derive(Debug, Default)]
struct PageTokens {
    tags: FxHashSet<String>,
    classes: FxHashSet<String>,
    ids: FxHashSet<String>,
}

/// Collect tag names, classes and ids from a rendered HTML document.
fn page_tokens(html: &str) -> Result<PageTokens> {
    let dom = tl::parse(html, tl::ParserOptions::default())
        .map_err(|e| anyhow::anyhow!("failed to parse rendered page: {e}"))?;

    let mut tokens = PageTokens::default();
    for node in dom.nodes() {
        let Some(tag) = node.as_tag() else { continue };
        tokens.tags.insert(tag.name().as_utf8_str().to_lowercase());

        if let Some(Some(class)) = tag.attributes().get("class") {
            for class in class.as_utf8_str().split_whitespace() {
                tokens.classes.insert(class.to_string());
            }
        }
        if let Some(Some(id)) = tag.attributes().get("id") {
            tokens.ids.insert(id.as_utf8_str().trim().to_string());
        }
    }
    Ok(tokens)
}

// ============================================================================
// Rule filtering
// ============================================================================

/// A top-level (or nested) CSS rule: prelude plus optional block body.
struct RawRule<'a> {
    prelude: &'a str,
    body: Option<&'a str>,
}

/// Filter a stylesheet down to the rules critical for the given page.
fn filter_critical(stylesheet: &str, tokens: &PageTokens) -> String {
    let mut out = String::new();

    for rule in split_rules(stylesheet) {
        let prelude = rule.prelude.trim();

        if let Some(at_rule) = prelude.strip_prefix('@') {
            filter_at_rule(at_rule, prelude, rule.body, tokens, &mut out);
            continue;
        }

        let Some(body) = rule.body else { continue };

        // Background images and webfonts load deferred
        if body.contains("url(") {
            continue;
        }

        if selector_matches(prelude, tokens) {
            out.push_str(prelude);
            out.push('{');
            out.push_str(body);
            out.push_str("}\n");
        }
    }

    out
}

/// Handle one at-rule during filtering.
fn filter_at_rule(
    at_rule: &str,
    prelude: &str,
    body: Option<&str>,
    tokens: &PageTokens,
    out: &mut String,
) {
    // Webfonts are deferred; @import pulls in url() resources
    if at_rule.starts_with("font-face") || at_rule.starts_with("import") {
        return;
    }

    // Conditional groups keep their matching inner rules
    if at_rule.starts_with("media") || at_rule.starts_with("supports") {
        if let Some(body) = body {
            let inner = filter_critical(body, tokens);
            if !inner.is_empty() {
                out.push_str(prelude);
                out.push('{');
                out.push_str(&inner);
                out.push_str("}\n");
            }
        }
        return;
    }

    // Everything else (@charset, @keyframes, ...) passes through
    match body {
        Some(body) => {
            out.push_str(prelude);
            out.push('{');
            out.push_str(body);
            out.push_str("}\n");
        }
        None => {
            out.push_str(prelude);
            out.push_str(";\n");
        }
    }
}

/// Split CSS text into rules at one nesting level.
///
/// A tiny scanner: tracks brace depth, quoted strings and comments; yields
/// `prelude { body }` rules and bare `prelude;` statements. Malformed
/// trailing input is dropped rather than guessed at.
fn split_rules(css: &str) -> Vec<RawRule<'_>> {
    let bytes = css.as_bytes();
    let mut rules = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
            }
            b';' => {
                let prelude = css[start..i].trim();
                if !prelude.is_empty() {
                    rules.push(RawRule {
                        prelude,
                        body: None,
                    });
                }
                i += 1;
                start = i;
            }
            b'{' => {
                let prelude_end = i;
                let body_start = i + 1;
                let mut depth = 1usize;
                i += 1;
                while i < bytes.len() && depth > 0 {
                    match bytes[i] {
                        b'/' if bytes.get(i + 1) == Some(&b'*') => {
                            i = skip_comment(bytes, i);
                            continue;
                        }
                        b'"' | b'\'' => {
                            i = skip_string(bytes, i);
                            continue;
                        }
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    i += 1;
                }
                if depth == 0 {
                    rules.push(RawRule {
                        prelude: css[start..prelude_end].trim(),
                        body: Some(&css[body_start..i - 1]),
                    });
                }
                start = i;
            }
            _ => i += 1,
        }
    }

    rules
}

fn skip_comment(bytes: &[u8], mut i: usize) -> usize {
    i += 2;
    while i < bytes.len() {
        if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            return i + 2;
        }
        i += 1;
    }
    i
}

fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    i
}

// ============================================================================
// Selector matching
// ============================================================================

static PSEUDO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"::?[a-zA-Z-]+(\([^)]*\))?").unwrap());
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([.#]?)([a-zA-Z][a-zA-Z0-9_-]*)").unwrap());

/// Whether any selector in a comma-separated list matches the page tokens.
///
/// A selector matches when every referenced tag, class and id exists in the
/// page. Pseudo-classes/-elements and attribute conditions are ignored
/// (kept if their base matches); selectors with no recognizable tokens
/// (`*`, bare pseudo) are kept conservatively.
fn selector_matches(selector_list: &str, tokens: &PageTokens) -> bool {
    selector_list
        .split(',')
        .any(|selector| single_selector_matches(selector, tokens))
}

fn single_selector_matches(selector: &str, tokens: &PageTokens) -> bool {
    let stripped = ATTRIBUTE.replace_all(selector, "");
    let stripped = PSEUDO.replace_all(&stripped, "");

    for capture in TOKEN.captures_iter(&stripped) {
        let name = &capture[2];
        let present = match &capture[1] {
            "." => tokens.classes.contains(name),
            "#" => tokens.ids.contains(name),
            _ => tokens.tags.contains(&name.to_lowercase()),
        };
        if !present {
            return false;
        }
    }

    // `*`, bare pseudo selectors and the like: keep conservatively
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_for(html: &str) -> PageTokens {
        page_tokens(html).unwrap()
    }

    const PAGE: &str = r#"<html><body>
        <header id="masthead" class="site-header"><h1>Title</h1></header>
        <article class="entry hentry"><p>Text</p></article>
    </body></html>"#;

    #[test]
    fn test_page_tokens() {
        let tokens = tokens_for(PAGE);
        assert!(tokens.tags.contains("article"));
        assert!(tokens.classes.contains("site-header"));
        assert!(tokens.ids.contains("masthead"));
        assert!(!tokens.classes.contains("missing"));
    }

    #[test]
    fn test_split_rules_nested() {
        let rules = split_rules("@media screen{a{color:red}}b{margin:0}");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].prelude, "@media screen");
        assert_eq!(rules[0].body, Some("a{color:red}"));
        assert_eq!(rules[1].prelude, "b");
    }

    #[test]
    fn test_split_rules_braces_in_strings() {
        let rules = split_rules(r#"a::before{content:"{"}p{margin:0}"#);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].body, Some(r#"content:"{""#));
    }

    #[test]
    fn test_filter_keeps_matching_selectors() {
        let tokens = tokens_for(PAGE);
        let css = ".site-header{color:red}.missing{color:blue}p{margin:0}";
        let out = filter_critical(css, &tokens);
        assert!(out.contains(".site-header"));
        assert!(out.contains("p{"));
        assert!(!out.contains(".missing"));
    }

    #[test]
    fn test_filter_drops_font_face_and_urls() {
        let tokens = tokens_for(PAGE);
        let css = "@font-face{font-family:X;src:url(x.woff)}\
                   p{background:url(bg.png)}\
                   h1{font-weight:700}";
        let out = filter_critical(css, &tokens);
        assert!(!out.contains("font-face"));
        assert!(!out.contains("url("));
        assert!(out.contains("h1"));
    }

    #[test]
    fn test_filter_recurses_into_media() {
        let tokens = tokens_for(PAGE);
        let css = "@media (min-width:768px){.entry{width:50%}.missing{width:1px}}";
        let out = filter_critical(css, &tokens);
        assert!(out.contains("@media (min-width:768px)"));
        assert!(out.contains(".entry"));
        assert!(!out.contains(".missing"));
    }

    #[test]
    fn test_filter_drops_empty_media() {
        let tokens = tokens_for(PAGE);
        let out = filter_critical("@media print{.missing{display:none}}", &tokens);
        assert!(out.is_empty());
    }

    #[test]
    fn test_selector_pseudo_and_attribute_ignored() {
        let tokens = tokens_for(PAGE);
        assert!(selector_matches(".entry:hover", &tokens));
        assert!(selector_matches("article[role=main]", &tokens));
        assert!(!selector_matches(".missing:hover", &tokens));
    }

    #[test]
    fn test_selector_list_any_match() {
        let tokens = tokens_for(PAGE);
        assert!(selector_matches(".missing, .entry", &tokens));
        assert!(!selector_matches(".missing, .also-missing", &tokens));
    }

    #[test]
    fn test_descendant_selector_requires_all_parts() {
        let tokens = tokens_for(PAGE);
        assert!(selector_matches(".site-header h1", &tokens));
        assert!(!selector_matches(".site-header nav", &tokens));
    }

    #[test]
    fn test_extract_end_to_end() {
        use std::fs;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        let mut config = crate::config::PipelineConfig::from_str("").unwrap();
        config.paths.site = dir.path().join("_site");
        config.paths.css_out = dir.path().join(".tmp/assets/css");
        config.paths.includes = dir.path().join("_includes");
        config
            .critical
            .pages
            .insert("splash".into(), "index.html".into());

        fs::create_dir_all(&config.paths.site).unwrap();
        fs::create_dir_all(&config.paths.css_out).unwrap();
        fs::write(config.paths.site.join("index.html"), PAGE).unwrap();
        fs::write(
            config.paths.css_out.join("style.css"),
            ".site-header { color: red; }\n\
             .missing { color: blue; }\n\
             .entry { background: url(bg.png); }\n\
             @font-face { font-family: X; src: url(x.woff); }\n",
        )
        .unwrap();

        extract(&config, "splash").unwrap();

        let fragment =
            fs::read_to_string(config.paths.includes.join("critical-splash.css")).unwrap();
        assert!(fragment.contains("site-header"));
        assert!(!fragment.contains("missing"));
        assert!(!fragment.contains("url("));
        assert!(!fragment.contains("font-face"));
    }

    #[test]
    fn test_extract_unknown_page_fails() {
        let config = crate::config::PipelineConfig::from_str("").unwrap();
        assert!(extract(&config, "nope").is_err());
    }
}
