//! # Core Domain Entities
//!
//! Trading partner agreements, the local company identity, inbound
//! connection metadata and the durable async-MDN correlation record.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::mdn::MdnMode;

/// Default options requested from partners when none are configured.
pub const DEFAULT_MDN_OPTIONS: &str =
    "signed-receipt-protocol=optional, pkcs7-signature; signed-receipt-micalg=optional, sha1";

// =============================================================================
// PARTNERS
// =============================================================================

/// A trading partner, as read from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerRecord {
    /// AS2 id of the partner. Required.
    pub as2id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Sent as the `From` header. Left over from AS1.
    #[serde(default)]
    pub email: String,
    /// Certificate file for this partner (DER or PEM).
    #[serde(default)]
    pub certificate: String,
    #[serde(default)]
    pub send_settings: SendSettings,
}

impl PartnerRecord {
    pub fn new(as2id: impl Into<String>) -> Self {
        Self {
            as2id: as2id.into(),
            name: String::new(),
            description: String::new(),
            email: String::new(),
            certificate: String::new(),
            send_settings: SendSettings::default(),
        }
    }

    pub fn should_sign(&self) -> bool {
        !self.send_settings.sign_algorithm.is_empty()
    }

    pub fn should_encrypt(&self) -> bool {
        !self.send_settings.encrypt_algorithm.is_empty()
    }
}

/// How files are sent to a partner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SendSettings {
    /// Partner endpoint receiving our POSTs.
    pub url: String,
    /// Empty for no encryption.
    pub encrypt_algorithm: String,
    /// Digest used for signing. Empty for no signature.
    pub sign_algorithm: String,
    /// Always `binary`.
    pub transfer_encoding: String,
    pub content_type: String,
    /// Sent as `Disposition-Notification-Options`; also names the MIC algorithm.
    pub mdn_options: String,
    pub mdn_mode: MdnMode,
}

impl Default for SendSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            encrypt_algorithm: String::new(),
            sign_algorithm: String::new(),
            transfer_encoding: "binary".to_string(),
            content_type: "application/EDIFACT".to_string(),
            mdn_options: DEFAULT_MDN_OPTIONS.to_string(),
            mdn_mode: MdnMode::Standard,
        }
    }
}

/// Lookup of configured partners.
pub trait PartnerDirectory: Send + Sync {
    /// Case-insensitive lookup by AS2 id.
    fn partner(&self, as2id: &str) -> Option<PartnerRecord>;

    fn partners(&self) -> Vec<PartnerRecord>;
}

/// Fixed partner list loaded at startup.
#[derive(Debug, Clone, Default)]
pub struct PartnerRegistry {
    partners: Vec<PartnerRecord>,
}

impl PartnerRegistry {
    pub fn new(partners: Vec<PartnerRecord>) -> Self {
        Self { partners }
    }
}

impl PartnerDirectory for PartnerRegistry {
    fn partner(&self, as2id: &str) -> Option<PartnerRecord> {
        self.partners
            .iter()
            .find(|p| p.as2id.eq_ignore_ascii_case(as2id))
            .cloned()
    }

    fn partners(&self) -> Vec<PartnerRecord> {
        self.partners.clone()
    }
}

// =============================================================================
// COMPANY
// =============================================================================

/// The local AS2 identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub as2id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Certificate (and private key) file for the company.
    #[serde(default)]
    pub certificate: String,
}

// =============================================================================
// CONNECTIONS & CORRELATION
// =============================================================================

/// Endpoints and request line of one inbound HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub source_ip: String,
    pub source_port: u16,
    pub destination_ip: String,
    pub destination_port: u16,
    pub request_method: String,
    pub request_uri: String,
}

/// Durable record of an outstanding async MDN.
///
/// The key this record is stored under IS the message id; the record itself
/// never carries one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMdnInfo {
    /// Where the file was picked up from.
    pub original_file: PathBuf,
    /// Where the file was moved while the MDN is outstanding.
    pub pending_file: PathBuf,
    /// MIC we computed when sending.
    pub outgoing_mic: String,
}
