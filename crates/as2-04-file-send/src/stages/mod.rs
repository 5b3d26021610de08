//! Stages of the send pipeline, in run order.

pub mod finish;
pub mod mime_body;
pub mod receive_mdn;
pub mod transmit;

pub use finish::{CloseResponse, RecordSendError};
pub use mime_body::{CreateMimeBody, EnvelopeMimeBody, ValidateMessage};
pub use receive_mdn::ReceiveMdn;
pub use transmit::TransmitFile;
