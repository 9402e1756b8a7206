//! MIME type detection for the development server.

use std::path::Path;

/// Common content-type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const SVG: &str = "image/svg+xml";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const WEBP: &str = "image/webp";
    pub const GIF: &str = "image/gif";
    pub const ICO: &str = "image/x-icon";
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const XML: &str = "application/xml";
    pub const GZIP: &str = "application/gzip";
    pub const OCTET_STREAM: &str = "application/octet-stream";
}

/// Resolve content type from a file path's extension.
pub fn from_path(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => types::HTML,
        Some("css") => types::CSS,
        Some("js" | "mjs") => types::JAVASCRIPT,
        Some("json" | "map") => types::JSON,
        Some("txt") => types::PLAIN,
        Some("svg") => types::SVG,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("webp") => types::WEBP,
        Some("gif") => types::GIF,
        Some("ico") => types::ICO,
        Some("woff") => types::WOFF,
        Some("woff2") => types::WOFF2,
        Some("xml") => types::XML,
        Some("gz") => types::GZIP,
        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(&PathBuf::from("style.css")), types::CSS);
        assert_eq!(from_path(&PathBuf::from("index-9f86d081.js")), types::JAVASCRIPT);
        assert_eq!(from_path(&PathBuf::from("style.css.map")), types::JSON);
        assert_eq!(from_path(&PathBuf::from("index.js.gz")), types::GZIP);
        assert_eq!(from_path(&PathBuf::from("unknown.bin")), types::OCTET_STREAM);
    }
}
