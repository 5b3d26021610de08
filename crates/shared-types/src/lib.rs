//! # Shared Types Crate
//!
//! This crate contains the AS2 vocabulary shared by every subsystem of the
//! node: disposition parsing, MDN attributes, partner agreements, message
//! types, the MIME part model and the outbound HTTP transport port.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Permissive parsing, strict validation**: `DispositionType::parse` never
//!   fails; malformed input yields a value whose `is_format_valid()` is false.
//! - **Key is identity**: A `PendingMdnInfo` carries no message id. The storage
//!   key it is saved under is the message id.
//!
//! ## Module Map
//!
//! | Module | Contents |
//! |--------|----------|
//! | `constants` | Protocol versions, agent names, header names |
//! | `disposition` | `DispositionType`, `DispositionOptions` |
//! | `mdn` | `MdnMode`, `MdnAttributes`, `MdnReceiveStatus`, `MdnDocument` |
//! | `entities` | Partner and company records, connection info, pending info |
//! | `messages` | Outgoing/incoming message types, `HttpReply` |
//! | `headers` | Case-insensitive, order-preserving header list |
//! | `mime` | `MimePart`, `ContentType`, `Multipart` |
//! | `naming` | File-name sanitizing and unique file names |
//! | `transport` | `HttpTransport` port used for every outbound POST |
//! | `errors` | `DispositionError`, `As2Error`, `MimeError` |

pub mod constants;
pub mod disposition;
pub mod entities;
pub mod errors;
pub mod headers;
pub mod mdn;
pub mod messages;
pub mod mime;
pub mod naming;
pub mod transport;

pub use disposition::{DispositionOptions, DispositionType};
pub use entities::*;
pub use errors::*;
pub use headers::Headers;
pub use mdn::*;
pub use messages::*;
pub use mime::{ContentType, MimePart, Multipart};
pub use transport::{HttpTransport, OutboundRequest, TransportError, TransportResponse};
