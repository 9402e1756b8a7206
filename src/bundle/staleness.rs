//! Mtime-based staleness filter for development rebuilds.
//!
//! Production never consults this: a production run is always a full
//! rebuild, since revisioning depends on the final artifact bytes.

use std::path::Path;
use std::time::SystemTime;

/// Check if a derived output is fresh with respect to its sources.
///
/// Returns `true` iff the output exists and is at least as new as every
/// source. An absent output means everything is stale. No error conditions:
/// unreadable mtimes count as stale.
pub fn is_fresh<P: AsRef<Path>>(output: &Path, sources: impl IntoIterator<Item = P>) -> bool {
    let Some(output_time) = mtime(output) else {
        return false;
    };

    sources
        .into_iter()
        .all(|source| mtime(source.as_ref()).is_some_and(|t| t <= output_time))
}

/// Get the modification time of a file
///
/// Returns `None` if the file doesn't exist or mtime cannot be read
fn mtime(path: &Path) -> Option<SystemTime> {
    path.metadata().and_then(|m| m.modified()).ok()
}
