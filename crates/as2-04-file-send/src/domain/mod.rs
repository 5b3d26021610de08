//! Send domain: per-run context, errors and the request header set.

pub mod context;
pub mod errors;
pub mod headers;
