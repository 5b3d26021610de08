//! Stages of the receive pipeline, in run order.

pub mod async_mdn;
pub mod extract;
pub mod file;
pub mod response;
pub mod send_mdn;
pub mod validate;

pub use async_mdn::HandleAsyncMdn;
pub use extract::ExtractMimeData;
pub use file::HandleFile;
pub use response::SetResponseError;
pub use send_mdn::SendMdn;
pub use validate::ValidateRequest;
