//! File watching: notify events -> debounced batches -> task dispatch.
//!
//! ```text
//! Watcher → Debouncer (pure timing) → Router (path -> task) → task::run
//! ```
//!
//! Rebuilds always run in development mode; the watcher notifies reload
//! clients afterwards (style changes inject CSS, everything else reloads).

mod debouncer;
mod router;

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Result;
use crossbeam::channel::{Receiver, select};
use notify::{RecursiveMode, Watcher};

use crate::config::PipelineConfig;
use crate::core::BuildMode;
use crate::logger::{status_error, status_success};
use crate::reload::{Broadcaster, ReloadMessage};
use crate::task::{self, Task};
use debouncer::Debouncer;

/// Spawn the watcher thread.
///
/// Watches the JS, Sass and icon source roots; dispatches matched tasks on
/// debounced changes until `shutdown_rx` fires.
pub fn spawn(
    config: Arc<PipelineConfig>,
    reload: Broadcaster,
    shutdown_rx: Receiver<()>,
) -> Result<JoinHandle<()>> {
    let (notify_tx, notify_rx) = crossbeam::channel::unbounded();

    // Create and configure watcher before handing it to the thread; events
    // buffer in the channel while the initial build runs.
    let mut watcher = notify::recommended_watcher(move |res| {
        let _ = notify_tx.send(res);
    })?;

    let mut watched = Vec::new();
    for root in watch_roots(&config) {
        if root.is_dir() {
            watcher.watch(&root, RecursiveMode::Recursive)?;
            watched.push(root);
        }
    }
    for root in &watched {
        crate::debug!("watch"; "watching {}", root.display());
    }

    let handle = std::thread::spawn(move || {
        // Watcher must live as long as the loop
        let _watcher = watcher;
        run_loop(&config, &reload, &notify_rx, &shutdown_rx);
    });

    Ok(handle)
}

/// The source roots the watcher covers.
fn watch_roots(config: &PipelineConfig) -> Vec<PathBuf> {
    vec![
        config.paths.js.clone(),
        config.paths.sass.clone(),
        config.paths.icons.clone(),
    ]
}

/// Watch loop: collect events, debounce, dispatch.
fn run_loop(
    config: &PipelineConfig,
    reload: &Broadcaster,
    notify_rx: &Receiver<notify::Result<notify::Event>>,
    shutdown_rx: &Receiver<()>,
) {
    let mut debouncer = Debouncer::new();

    loop {
        select! {
            recv(notify_rx) -> result => match result {
                Ok(Ok(event)) => debouncer.add_event(&event),
                Ok(Err(e)) => crate::log!("watch"; "notify error: {}", e),
                Err(_) => break, // watcher dropped
            },
            recv(shutdown_rx) -> _ => break,
            default(debouncer.sleep_duration()) => {
                let Some(changes) = debouncer.take_if_ready() else {
                    continue;
                };
                let tasks = router::tasks_for(&changes, config);
                for task in tasks {
                    dispatch(task, config, reload);
                }
            }
        }
    }
}

/// Run one task in development mode and notify reload clients.
///
/// A failing rebuild is reported and the loop keeps running; the next
/// change simply retries.
fn dispatch(task: Task, config: &PipelineConfig, reload: &Broadcaster) {
    let label = task.label();
    let is_styles = task == Task::Styles;

    match task::run(task, config, BuildMode::DEVELOPMENT) {
        Ok(()) => {
            status_success(&format!("rebuilt {label}"));
            let message = if is_styles {
                // stylesheet swap keeps scroll position and avoids a flash
                ReloadMessage::css(&config.styles.artifact)
            } else {
                ReloadMessage::reload(format!("{label} changed"))
            };
            reload.broadcast(&message);
        }
        Err(e) => {
            status_error(&format!("{label} failed"), &format!("{e:#}"));
        }
    }
}
