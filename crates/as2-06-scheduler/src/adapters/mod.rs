//! Adapters for the outbox scheduler.

pub mod observer;
