//! Storage adapters.

pub mod filesystem;
pub mod lock;
