//! Domain layer for the outbox scheduler.

pub mod config;
pub mod entities;
pub mod errors;
pub mod registry;
