//! # Adapters
//!
//! Implementations of the subsystem ports on top of real I/O.
//!
//! | Adapter | Port | Backed by |
//! |---------|------|-----------|
//! | `ReqwestTransport` | `HttpTransport` (shared-types) | reqwest client |
//! | `FileSenderAdapter` | `FileSender` (as2-06) | `FileSenderService` (as2-04) |
//! | `http_listener` | inbound HTTP | axum routers for the file and MDN ports |

pub mod file_sender;
pub mod http_listener;
pub mod http_transport;

pub use file_sender::FileSenderAdapter;
pub use http_listener::{file_router, mdn_router, serve};
pub use http_transport::ReqwestTransport;
