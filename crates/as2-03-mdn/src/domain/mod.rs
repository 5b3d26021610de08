//! MDN domain: reply construction, report encoding, disposition checks.

pub mod errors;
pub mod reply;
pub mod report;
pub mod validation;
