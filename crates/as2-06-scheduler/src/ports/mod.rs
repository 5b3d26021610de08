//! Port definitions for the outbox scheduler.

pub mod inbound;
pub mod outbound;
