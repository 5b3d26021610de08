//! # Node Runtime Library
//!
//! Wires the AS2 subsystems into a running node. The main entry point is
//! the `main.rs` binary; the library is what the end-to-end tests start.
//!
//! ## Modular Structure
//!
//! - `container/` - configuration and the application context
//! - `adapters/` - reqwest transport, axum listeners, scheduler → sender bridge
//! - `runtime.rs` - startup and graceful shutdown
//!
//! ## Data Flow
//!
//! ```text
//! outbox/<partner>/file ─→ as2-06 scheduler ─→ as2-04 send pipeline ─→ POST partner
//!                                                        │
//!                                       sync MDN checked │ async: pending record
//!                                                        ↓
//! file port ─→ as2-05 receive pipeline ─→ inbox/<partner>/file, MDN reply
//! MDN port  ─→ as2-03 async MDN receiver ─→ pending record matched and removed
//! ```

pub mod adapters;
pub mod container;
pub mod runtime;

pub use container::context::Collaborators;
pub use container::{load_config, AppContext, ConfigError, NodeConfig};
pub use runtime::{BoundAddresses, NodeRuntime};

#[cfg(test)]
pub(crate) mod test_utils;
