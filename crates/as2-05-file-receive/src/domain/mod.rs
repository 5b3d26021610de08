pub mod context;
pub mod errors;
