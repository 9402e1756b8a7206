//! Core types shared across the pipeline.

mod mode;
mod shutdown;

pub use mode::BuildMode;
pub use shutdown::{is_shutdown, register_server, setup_shutdown_handler};
