//! Domain layer for message storage.

pub mod errors;
pub mod layout;
