//! SVG optimization for the icon sprite.
//!
//! A usvg parse/serialize round-trip normalizes and minifies each icon
//! (no indentation, resolved defaults). The sprite builder needs the
//! viewBox and the inner markup of each optimized icon.

use anyhow::{Context, Result};

/// An optimized icon ready for sprite assembly.
pub struct OptimizedIcon {
    /// The `viewBox` attribute value.
    pub view_box: String,
    /// Inner markup of the root `<svg>` element.
    pub body: String,
}

/// Optimize an SVG and split it into viewBox + inner markup.
pub fn optimize(content: &[u8]) -> Result<OptimizedIcon> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(content, &options).context("Failed to parse SVG")?;

    let write_options = usvg::WriteOptions {
        indent: usvg::Indent::None,
        ..Default::default()
    };
    let optimized = tree.to_string(&write_options);

    let view_box = extract_attr(&optimized, r#"viewBox=""#)
        .map(str::to_string)
        .unwrap_or_else(|| {
            let size = tree.size();
            format!("0 0 {} {}", size.width(), size.height())
        });

    let body = inner_markup(&optimized)
        .context("optimized SVG has no root element")?
        .to_string();

    Ok(OptimizedIcon { view_box, body })
}

/// Extract attribute value between prefix and closing quote
#[inline]
fn extract_attr<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let start = s.find(prefix)? + prefix.len();
    let end = start + s.as_bytes()[start..].iter().position(|&b| b == b'"')?;
    Some(&s[start..end])
}

/// Slice out the markup between the root `<svg ...>` tag and `</svg>`.
fn inner_markup(svg: &str) -> Option<&str> {
    let open_end = svg.find('>')? + 1;
    let close = svg.rfind("</svg>")?;
    (open_end <= close).then(|| svg[open_end..close].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24" viewBox="0 0 24 24"><path d="M0 0h24v24H0z"/></svg>"#;

    #[test]
    fn test_optimize_extracts_viewbox() {
        let icon = optimize(ICON.as_bytes()).unwrap();
        assert_eq!(icon.view_box, "0 0 24 24");
        assert!(icon.body.contains("<path"));
    }

    #[test]
    fn test_optimize_rejects_invalid() {
        assert!(optimize(b"not svg at all").is_err());
    }

    #[test]
    fn test_extract_attr() {
        let s = r#"<svg width="100" height="50" class="icon">"#;
        assert_eq!(extract_attr(s, r#"width=""#), Some("100"));
        assert_eq!(extract_attr(s, r#"height=""#), Some("50"));
        assert_eq!(extract_attr(s, r#"id=""#), None);
    }

    #[test]
    fn test_inner_markup() {
        assert_eq!(
            inner_markup("<svg a=\"1\"><g/></svg>"),
            Some("<g/>")
        );
        assert_eq!(inner_markup("no svg here"), None);
    }
}
