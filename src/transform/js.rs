//! JavaScript transforms: ordered concatenation and minification.
//!
//! Minification uses oxc. License/attribution comments (`/*! ... */`,
//! `@license`, `@preserve`) survive minification; everything else is
//! stripped.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions, LegalComment};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

/// A source file read for concatenation.
pub struct SourceFile {
    /// Display name (path relative to the JS root) used in source maps.
    pub name: String,
    pub content: String,
}

/// Read the ordered source set for concatenation.
///
/// `root` is the JS source root; names in the result are root-relative for
/// source-map attribution.
pub fn read_sources(paths: &[PathBuf], root: &Path) -> Result<Vec<SourceFile>> {
    paths
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let name = path
                .strip_prefix(root)
                .unwrap_or(path)
                .to_string_lossy()
                .into_owned();
            Ok(SourceFile { name, content })
        })
        .collect()
}

/// Concatenate sources in order, newline-joined.
///
/// Every part gets a trailing newline so output lines map one-to-one onto
/// source lines (the contract `sourcemap::line_identity_map` relies on).
pub fn concat(sources: &[SourceFile]) -> String {
    let mut out = String::new();
    for source in sources {
        out.push_str(&source.content);
        if !source.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

/// Minify JavaScript source code, preserving legal comments.
pub fn minify(source: &str) -> Result<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        let details: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        bail!("JS parse failed:\n{}", details.join("\n"));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions {
                legal: LegalComment::Inline,
                ..CommentOptions::disabled()
            },
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}
