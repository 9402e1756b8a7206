//! Source map (v3) generation for development artifacts.
//!
//! Concatenation keeps every source line intact, so the map is a pure
//! line-identity mapping: output line N points at the source file and line
//! it was copied from, column 0. Original contents are embedded via
//! `sourcesContent` so devtools need no extra fetches.

use serde_json::json;

/// One mapped source: display name plus full content.
pub struct MappedSource<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

/// Build a source-map v3 JSON document for a line-preserving concatenation
/// of `sources` (in order), naming the generated `file`.
pub fn line_identity_map(file: &str, sources: &[MappedSource<'_>]) -> String {
    let mut mappings = String::new();
    let mut prev_source: i64 = 0;
    let mut prev_line: i64 = 0;
    let mut first = true;

    for (source_idx, source) in sources.iter().enumerate() {
        for line in 0..line_count(source.content) {
            if !first {
                mappings.push(';');
            }
            first = false;

            // segment: [generated column, source delta, line delta, column]
            encode_vlq(&mut mappings, 0);
            encode_vlq(&mut mappings, source_idx as i64 - prev_source);
            encode_vlq(&mut mappings, line as i64 - prev_line);
            encode_vlq(&mut mappings, 0);

            prev_source = source_idx as i64;
            prev_line = line as i64;
        }
    }

    json!({
        "version": 3,
        "file": file,
        "sources": sources.iter().map(|s| s.name).collect::<Vec<_>>(),
        "sourcesContent": sources.iter().map(|s| s.content).collect::<Vec<_>>(),
        "names": [],
        "mappings": mappings,
    })
    .to_string()
}

/// Number of lines a source occupies in the concatenated output
/// (a missing trailing newline is added during concatenation).
fn line_count(content: &str) -> usize {
    if content.is_empty() {
        return 0;
    }
    content.strip_suffix('\n').unwrap_or(content).lines().count()
}

const BASE64: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

/// Append the base64 VLQ encoding of `value` (sign bit in the LSB,
/// 5 payload bits per character, continuation in the high bit).
fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq: u64 = if value < 0 {
        (((-value) as u64) << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = (vlq & 0b11111) as usize;
        vlq >>= 5;
        if vlq > 0 {
            digit |= 0b100000; // continuation bit
        }
        out.push(BASE64[digit] as char);
        if vlq == 0 {
            break;
        }
    }
}

/// The `sourceMappingURL` trailer appended to a development artifact.
pub fn map_comment(map_name: &str, css: bool) -> String {
    if css {
        format!("\n/*# sourceMappingURL={map_name} */\n")
    } else {
        format!("\n//# sourceMappingURL={map_name}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vlq(value: i64) -> String {
        let mut out = String::new();
        encode_vlq(&mut out, value);
        out
    }

    #[test]
    fn test_vlq_known_values() {
        assert_eq!(vlq(0), "A");
        assert_eq!(vlq(1), "C");
        assert_eq!(vlq(-1), "D");
        assert_eq!(vlq(16), "gB");
        assert_eq!(vlq(123), "2H");
    }

    #[test]
    fn test_line_count() {
        assert_eq!(line_count(""), 0);
        assert_eq!(line_count("a\n"), 1);
        assert_eq!(line_count("a"), 1);
        assert_eq!(line_count("a\nb\n"), 2);
    }

    #[test]
    fn test_line_identity_map_shape() {
        let sources = [
            MappedSource {
                name: "vendor/jquery.js",
                content: "var a = 1;\nvar b = 2;\n",
            },
            MappedSource {
                name: "main.js",
                content: "var c = 3;\n",
            },
        ];
        let map: serde_json::Value =
            serde_json::from_str(&line_identity_map("index.js", &sources)).unwrap();

        assert_eq!(map["version"], 3);
        assert_eq!(map["file"], "index.js");
        assert_eq!(map["sources"][1], "main.js");
        assert_eq!(map["sourcesContent"][0], "var a = 1;\nvar b = 2;\n");
        // three output lines: two from source 0, one from source 1
        assert_eq!(map["mappings"], "AAAA;AACA;ACDA");
    }
}
