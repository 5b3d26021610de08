//! # Application Container
//!
//! Configuration and the application context every service is built from.
//! The context is constructed once at startup and passed down; nothing is
//! looked up by type at runtime.

pub mod config;
pub mod context;

pub use config::{load_config, load_config_from, ConfigError, NodeConfig, ServerConfig};
pub use context::AppContext;
