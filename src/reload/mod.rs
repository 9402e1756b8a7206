//! Live reload over WebSocket.
//!
//! A broadcast-only control channel: the watcher pushes `reload` or `css`
//! messages, every connected browser tab reacts. No per-client state.

mod message;
mod server;

pub use message::ReloadMessage;
pub use server::{Broadcaster, start_ws_server};
