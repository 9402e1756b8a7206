//! Change routing: map changed paths to pipeline tasks.
//!
//! Each changed path belongs to at most one source root, and each root maps
//! to exactly one task, so a batch of changes never re-runs unrelated
//! pipelines.

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use super::debouncer::ChangeKind;
use crate::config::PipelineConfig;
use crate::task::Task;

/// Convert a debounced change batch into the tasks to run, deduplicated,
/// in a stable order (scripts, styles, icons).
pub(super) fn tasks_for(
    changes: &FxHashMap<PathBuf, ChangeKind>,
    config: &PipelineConfig,
) -> Vec<Task> {
    let mut scripts = false;
    let mut styles = false;
    let mut icons = false;

    for path in changes.keys() {
        match categorize(path, config) {
            Some(Task::Scripts) => scripts = true,
            Some(Task::Styles) => styles = true,
            Some(Task::Icons) => icons = true,
            _ => {}
        }
    }

    let mut tasks = Vec::new();
    if scripts {
        tasks.push(Task::Scripts);
    }
    if styles {
        tasks.push(Task::Styles);
    }
    if icons {
        tasks.push(Task::Icons);
    }
    tasks
}

/// Map a changed path to the task owning its source root.
pub(super) fn categorize(path: &Path, config: &PipelineConfig) -> Option<Task> {
    if path.starts_with(&config.paths.js) {
        Some(Task::Scripts)
    } else if path.starts_with(&config.paths.sass) {
        Some(Task::Styles)
    } else if path.starts_with(&config.paths.icons) {
        Some(Task::Icons)
    } else {
        None
    }
}
