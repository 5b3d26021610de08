//! # Inbound Ports (Driving Ports)
//!
//! The storage API the send, receive and MDN pipelines call.

use std::path::{Path, PathBuf};

use shared_types::{MdnDocument, PendingMdnInfo};

use crate::domain::errors::StorageError;

/// Persistence for received files, MDNs and pending MDN correlation.
///
/// All operations of one implementation are serialized, so a pending
/// record and the data file it points at appear together.
pub trait MessageStore: Send + Sync {
    /// Writes a received file to `inbox/<sender>/<name>`, never overwriting.
    fn save_incoming_file(
        &self,
        sender_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<PathBuf, StorageError>;

    /// Writes an MDN record keyed by message id.
    fn save_mdn(&self, key: &str, mdn: &MdnDocument) -> Result<PathBuf, StorageError>;

    /// Moves `original_file` aside and records what the async MDN must match.
    ///
    /// ## Errors
    ///
    /// - `InvalidKey`: message id sanitizes to nothing
    /// - `Io`: the move or the record write failed (the move is undone)
    fn save_pending_info(
        &self,
        message_id: &str,
        original_file: &Path,
        outgoing_mic: &str,
    ) -> Result<PendingMdnInfo, StorageError>;

    /// ## Errors
    ///
    /// - `PendingInfoNotFound`: no record for this message id
    /// - `Corrupt`: the record does not parse
    fn load_pending_info(&self, message_id: &str) -> Result<PendingMdnInfo, StorageError>;

    /// Removes the record and its moved data file. `Ok(false)` when there was
    /// no record.
    fn delete_pending_info(&self, message_id: &str) -> Result<bool, StorageError>;

    /// Moves a fully acknowledged file out of the outbox into `sent/`.
    fn archive_sent_file(&self, path: &Path) -> Result<PathBuf, StorageError>;
}
