//! MDN services wired to storage, crypto and transport ports.

pub mod processor;
pub mod receiver;
pub mod renderer;
pub mod sender;
