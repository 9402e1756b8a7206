//! Configuration section definitions.

mod critical;
mod paths;
mod scripts;
mod serve;
mod styles;

pub use critical::{CriticalConfig, Viewport};
pub use paths::PathsConfig;
pub use scripts::ScriptsConfig;
pub use serve::ServeConfig;
pub use styles::StylesConfig;
