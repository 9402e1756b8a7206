//! URL -> filesystem path resolution across the served roots.

use std::path::PathBuf;

/// Resolve a request URL to a file under one of the served roots.
///
/// Roots are tried in order (compiled assets shadow the rendered site).
/// Directory URLs resolve to their `index.html`. Traversal components are
/// rejected outright.
pub fn resolve(url: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    // Strip query and fragment
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let rel = path.trim_start_matches('/');

    if rel.split('/').any(|part| part == "..") {
        return None;
    }

    for root in roots {
        let candidate = if rel.is_empty() {
            root.clone()
        } else {
            root.join(rel)
        };

        if candidate.is_file() {
            return Some(candidate);
        }
        let index = candidate.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Find a custom 404 page in any served root.
pub fn find_404(roots: &[PathBuf]) -> Option<PathBuf> {
    roots
        .iter()
        .map(|root| root.join("404.html"))
        .find(|p| p.is_file())
}
