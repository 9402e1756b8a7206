//! Development server with live reload support.

mod inject;
mod path;
mod response;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::config::PipelineConfig;
use crate::core::BuildMode;
use crate::task::{self, Task};
use crate::{debug, log};

/// Maximum HTTP port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Start the development server: initial build, watcher, request loop.
///
/// Blocks until Ctrl+C.
pub fn serve(config: &PipelineConfig) -> Result<()> {
    let config = Arc::new(config.clone());

    // Initial development build. Failures are reported but don't prevent
    // serving: the watcher retries on the next change.
    initial_build(&config);

    let (server, addr) = bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = crossbeam::channel::unbounded::<()>();
    crate::core::register_server(Arc::clone(&server), shutdown_tx);

    // Live reload + watcher (disabled with `watch = false`)
    let (ws_port, watch_handle) = if config.serve.watch {
        let (ws_port, broadcaster) = crate::reload::start_ws_server(config.serve.ui_port)?;
        debug!("reload"; "ws://localhost:{}", ws_port);
        let handle = crate::watch::spawn(Arc::clone(&config), broadcaster, shutdown_rx)?;
        (Some(ws_port), Some(handle))
    } else {
        (None, None)
    };

    log!("serve"; "http://{}", addr);
    run_request_loop(&server, &config, ws_port);

    if let Some(handle) = watch_handle {
        let _ = handle.join();
    }
    Ok(())
}

/// Build every asset in development mode before the first request.
fn initial_build(config: &PipelineConfig) {
    for task in [Task::Scripts, Task::Styles, Task::Icons] {
        let label = task.label();
        if let Err(e) = task::run(task, config, BuildMode::DEVELOPMENT) {
            crate::logger::status_error(&format!("{label} failed"), &format!("{e:#}"));
        }
    }
}

/// Bind the HTTP server, retrying successive ports if taken.
fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);
        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} was taken, using {}", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "failed to bind HTTP server after {} attempts: {}",
        MAX_PORT_RETRIES,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
    .context("dev server startup failed")
}

/// Accept requests until the server is unblocked by the shutdown handler.
fn run_request_loop(server: &Server, config: &Arc<PipelineConfig>, ws_port: Option<u16>) {
    // Thread pool keeps a slow response from blocking other requests
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, ws_port) {
                log!("serve"; "request error: {e}");
            }
        });
    }
}

/// Handle a single HTTP request
fn handle_request(
    request: Request,
    config: &PipelineConfig,
    ws_port: Option<u16>,
) -> Result<()> {
    // Early exit if shutdown requested
    if crate::core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    match path::resolve(request.url(), &config.serve.roots) {
        Some(file) => response::respond_file(request, &file, ws_port),
        None => response::respond_not_found(request, config, ws_port),
    }
}
