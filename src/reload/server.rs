//! WebSocket server for live reload.
//!
//! An acceptor thread performs the tungstenite handshake and parks each
//! client in a shared list; [`Broadcaster::broadcast`] fans a message out
//! to every client, dropping the ones that have gone away.

use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tungstenite::{Message, WebSocket};

use super::ReloadMessage;

/// Maximum port retry attempts
const MAX_PORT_RETRIES: u16 = 10;

/// Shared handle for pushing messages to every connected client.
#[derive(Clone, Default)]
pub struct Broadcaster {
    clients: Arc<Mutex<Vec<WebSocket<TcpStream>>>>,
}

impl Broadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send a message to all connected clients, pruning dead connections.
    pub fn broadcast(&self, message: &ReloadMessage) {
        let json = message.to_json();
        let mut clients = self.clients.lock();
        clients.retain_mut(|client| client.send(Message::text(json.clone())).is_ok());
    }

    /// Number of connected clients (for logs and tests).
    #[allow(dead_code)]
    pub fn client_count(&self) -> usize {
        self.clients.lock().len()
    }

    fn add(&self, client: WebSocket<TcpStream>) {
        self.clients.lock().push(client);
    }
}

/// Start the WebSocket server on `base_port` (or the next free port).
///
/// Returns the actually bound port and the broadcast handle.
pub fn start_ws_server(base_port: u16) -> Result<(u16, Broadcaster)> {
    let (listener, actual_port) = try_bind_port(base_port, MAX_PORT_RETRIES)?;
    let broadcaster = Broadcaster::new();

    // Spawn acceptor thread
    let handle = broadcaster.clone();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { continue };
            match tungstenite::accept(stream) {
                Ok(mut client) => {
                    crate::debug!("reload"; "client connected");
                    let greeting = ReloadMessage::connected().to_json();
                    if client.send(Message::text(greeting)).is_ok() {
                        handle.add(client);
                    }
                }
                Err(e) => {
                    crate::debug!("reload"; "handshake failed: {}", e);
                }
            }
        }
    });

    Ok((actual_port, broadcaster))
}

/// Try binding to port, retry with incremented port if in use
fn try_bind_port(base_port: u16, max_retries: u16) -> Result<(TcpListener, u16)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        match TcpListener::bind(format!("127.0.0.1:{}", port)) {
            Ok(listener) => {
                let actual_port = listener.local_addr()?.port();
                return Ok((listener, actual_port));
            }
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    Err(anyhow::anyhow!(
        "Failed to bind WebSocket server after {} attempts: {}",
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_port_retries() {
        let (first, port_a) = try_bind_port(0, 1).unwrap();
        // port 0 asks the OS for a free port; binding again must also work
        let (_second, port_b) = try_bind_port(0, 1).unwrap();
        assert_ne!(port_a, 0);
        assert_ne!(port_b, 0);
        drop(first);
    }

    #[test]
    fn test_broadcast_without_clients() {
        let broadcaster = Broadcaster::new();
        // no clients: broadcast is a no-op, not an error
        broadcaster.broadcast(&ReloadMessage::reload("test"));
        assert_eq!(broadcaster.client_count(), 0);
    }
}
