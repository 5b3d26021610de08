//! Port definitions for message storage.

pub mod inbound;
