//! # Disposition Type & Options
//!
//! The `Disposition` header of an MDN and the `Disposition-Notification-Options`
//! request header.
//!
//! ```text
//! disposition        = action-mode "/" sending-mode ";" type [ "/" modifier ":" description ]
//! action-mode        = "manual-action" | "automatic-action"
//! sending-mode       = "MDN-sent-manually" | "MDN-sent-automatically"
//! type               = "processed" | "failed"
//! modifier           = "error" | "warning" | "failure"
//! ```
//!
//! ## Parsing Strictness
//!
//! | Input | Parser | Malformed input |
//! |-------|--------|-----------------|
//! | `Disposition` | `DispositionType::parse` | Never fails; `is_format_valid()` is false |
//! | `Disposition-Notification-Options` | `DispositionOptions::parse` | Hard error (`As2Error`) |
//!
//! The options header is stricter because it decides whether the receipt is
//! signed at all.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::As2Error;

pub const ERR_AUTHENTICATION: &str = "authentication-failed";
pub const ERR_DECOMPRESSION: &str = "decompression-failed";
pub const ERR_DECRYPTION: &str = "decryption-failed";
pub const ERR_INTEGRITY_CHECK: &str = "integrity-check-failed";
pub const ERR_INSUFFICIENT_SECURITY: &str = "insufficient-message-security";
pub const ERR_UNEXPECTED: &str = "unexpected-processing-error";

/// The only descriptions allowed after an `error` modifier.
pub const ERROR_DESCRIPTIONS: [&str; 6] = [
    ERR_AUTHENTICATION,
    ERR_DECOMPRESSION,
    ERR_DECRYPTION,
    ERR_INTEGRITY_CHECK,
    ERR_UNEXPECTED,
    ERR_INSUFFICIENT_SECURITY,
];

pub const AUTOMATIC_ACTION: &str = "automatic-action";
pub const MDN_SENT_AUTOMATICALLY: &str = "mdn-sent-automatically";

pub const TYPE_PROCESSED: &str = "processed";
pub const TYPE_FAILED: &str = "failed";

pub const MOD_ERROR: &str = "error";
pub const MOD_WARNING: &str = "warning";
pub const MOD_FAILURE: &str = "failure";

const TYPES: [&str; 2] = [TYPE_PROCESSED, TYPE_FAILED];
const MODIFIERS: [&str; 3] = [MOD_ERROR, MOD_WARNING, MOD_FAILURE];

// =============================================================================
// DISPOSITION TYPE
// =============================================================================

/// Parsed form of the `Disposition` header.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispositionType {
    pub action_mode: String,
    pub sending_mode: String,
    pub disposition_type: String,
    pub modifier: String,
    pub description: String,
}

impl DispositionType {
    pub fn new(
        action_mode: &str,
        sending_mode: &str,
        disposition_type: &str,
        modifier: &str,
        description: &str,
    ) -> Self {
        Self {
            action_mode: action_mode.to_string(),
            sending_mode: sending_mode.to_string(),
            disposition_type: disposition_type.to_string(),
            modifier: modifier.to_string(),
            description: description.to_string(),
        }
    }

    /// `automatic-action/mdn-sent-automatically; processed`
    pub fn success() -> Self {
        Self::new(AUTOMATIC_ACTION, MDN_SENT_AUTOMATICALLY, TYPE_PROCESSED, "", "")
    }

    /// `processed/error:<description>`. The description should be one of
    /// `ERROR_DESCRIPTIONS`, otherwise the result is not format-valid.
    pub fn error(description: &str) -> Self {
        Self::new(
            AUTOMATIC_ACTION,
            MDN_SENT_AUTOMATICALLY,
            TYPE_PROCESSED,
            MOD_ERROR,
            description,
        )
    }

    /// `failed/failure:<description>`
    pub fn failure(description: &str) -> Self {
        Self::new(
            AUTOMATIC_ACTION,
            MDN_SENT_AUTOMATICALLY,
            TYPE_FAILED,
            MOD_FAILURE,
            description,
        )
    }

    /// Splits on `/`, `;` and `:` into five positional fields, trimmed and
    /// lower-cased. Missing trailing fields are empty. Never fails.
    pub fn parse(value: &str) -> Self {
        let mut items: [String; 5] = Default::default();
        let tokens = value
            .split(['/', ';', ':'])
            .filter(|t| !t.is_empty())
            .take(5);
        for (slot, token) in items.iter_mut().zip(tokens) {
            *slot = token.trim().to_lowercase();
        }
        let [action_mode, sending_mode, disposition_type, modifier, description] = items;
        Self {
            action_mode,
            sending_mode,
            disposition_type,
            modifier,
            description,
        }
    }

    /// Processing succeeded: type `processed` with no modifier.
    pub fn is_success(&self) -> bool {
        self.disposition_type == TYPE_PROCESSED && self.modifier.trim().is_empty()
    }

    pub fn is_warning(&self) -> bool {
        self.modifier.eq_ignore_ascii_case(MOD_WARNING)
    }

    pub fn is_format_valid(&self) -> bool {
        if !self.action_mode.eq_ignore_ascii_case(AUTOMATIC_ACTION) {
            return false;
        }
        if !TYPES.contains(&self.disposition_type.as_str()) {
            return false;
        }
        if self.disposition_type == TYPE_PROCESSED {
            if self.modifier.trim().is_empty() {
                return true;
            }
            if !MODIFIERS.contains(&self.modifier.as_str()) {
                return false;
            }
            if self.modifier == MOD_ERROR {
                return ERROR_DESCRIPTIONS.contains(&self.description.as_str());
            }
            return !self.description.trim().is_empty();
        }
        true
    }
}

impl fmt::Display for DispositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}; {}",
            self.action_mode, self.sending_mode, self.disposition_type
        )?;
        if !self.modifier.is_empty() {
            write!(f, "/{}:{}", self.modifier, self.description)?;
        }
        Ok(())
    }
}

// =============================================================================
// DISPOSITION OPTIONS
// =============================================================================

/// Parsed `Disposition-Notification-Options`:
///
/// `signed-receipt-protocol=optional, pkcs7-signature; signed-receipt-micalg=optional, sha1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispositionOptions {
    pub protocol_importance: String,
    pub protocol: String,
    pub mic_algorithm_importance: String,
    pub mic_algorithm: String,
}

impl DispositionOptions {
    /// Tokenizes on `=`, `,` and `;`. Strictly more than five tokens are
    /// required; when the requester lists several MIC algorithms the first one
    /// is taken.
    pub fn parse(options: &str) -> Result<Self, As2Error> {
        let tokens: Vec<&str> = options
            .split(['=', ',', ';'])
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() <= 5 {
            return Err(As2Error::new(format!(
                "Invalid disposition options format: {}",
                options
            )));
        }
        Ok(Self {
            protocol_importance: tokens[1].trim().to_string(),
            protocol: tokens[2].trim().to_string(),
            mic_algorithm_importance: tokens[4].trim().to_string(),
            mic_algorithm: tokens[5].trim().to_string(),
        })
    }
}

impl fmt::Display for DispositionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "signed-receipt-protocol={}, {}; signed-receipt-micalg={}, {}",
            self.protocol_importance,
            self.protocol,
            self.mic_algorithm_importance,
            self.mic_algorithm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_disposition() {
        let d = DispositionType::parse("automatic-action/MDN-sent-automatically; processed");
        assert_eq!(d.action_mode, "automatic-action");
        assert_eq!(d.sending_mode, "mdn-sent-automatically");
        assert_eq!(d.disposition_type, "processed");
        assert_eq!(d.modifier, "");
        assert!(d.is_format_valid());
        assert!(d.is_success());
    }

    #[test]
    fn test_error_modifier_requires_known_description() {
        let valid = DispositionType::parse(
            "automatic-action/MDN-sent-automatically; processed/error: integrity-check-failed",
        );
        assert!(valid.is_format_valid());
        assert!(!valid.is_success());

        let invalid = DispositionType::parse(
            "automatic-action/MDN-sent-automatically; processed/error: bogus-reason",
        );
        assert!(!invalid.is_format_valid());
    }

    #[test]
    fn test_warning_needs_description() {
        let with_text = DispositionType::parse(
            "automatic-action/MDN-sent-automatically; processed/warning: duplicate-document",
        );
        assert!(with_text.is_format_valid());
        assert!(with_text.is_warning());

        let without = DispositionType::parse(
            "automatic-action/MDN-sent-automatically; processed/warning",
        );
        assert!(!without.is_format_valid());
    }

    #[test]
    fn test_manual_action_is_invalid() {
        let d = DispositionType::parse("manual-action/MDN-sent-manually; processed");
        assert!(!d.is_format_valid());
    }

    #[test]
    fn test_unknown_type_is_invalid() {
        let d = DispositionType::parse("automatic-action/MDN-sent-automatically; deleted");
        assert!(!d.is_format_valid());
    }

    #[test]
    fn test_failed_type_is_valid() {
        let d = DispositionType::failure("sender-not-authorized");
        assert!(d.is_format_valid());
        assert!(!d.is_success());
    }

    #[test]
    fn test_permissive_parse_of_garbage() {
        let d = DispositionType::parse("garbage");
        assert_eq!(d.action_mode, "garbage");
        assert_eq!(d.sending_mode, "");
        assert!(!d.is_format_valid());

        let empty = DispositionType::parse("");
        assert_eq!(empty, DispositionType::default());
    }

    #[test]
    fn test_display_and_reparse() {
        let cases = [
            DispositionType::success(),
            DispositionType::error(ERR_DECRYPTION),
            DispositionType::failure("unsupported-format"),
            DispositionType::parse("Automatic-Action/MDN-Sent-Automatically; Processed"),
        ];
        for original in cases {
            let reparsed = DispositionType::parse(&original.to_string());
            assert_eq!(reparsed, original);
        }
        assert_eq!(
            DispositionType::success().to_string(),
            "automatic-action/mdn-sent-automatically; processed"
        );
        assert_eq!(
            DispositionType::error(ERR_UNEXPECTED).to_string(),
            "automatic-action/mdn-sent-automatically; processed/error:unexpected-processing-error"
        );
    }

    #[test]
    fn test_options_parse() {
        let options = DispositionOptions::parse(
            "signed-receipt-protocol=optional, pkcs7-signature; signed-receipt-micalg=optional, sha1, md5",
        )
        .unwrap();
        assert_eq!(options.protocol_importance, "optional");
        assert_eq!(options.protocol, "pkcs7-signature");
        assert_eq!(options.mic_algorithm_importance, "optional");
        assert_eq!(options.mic_algorithm, "sha1");
        assert_eq!(
            options.to_string(),
            "signed-receipt-protocol=optional, pkcs7-signature; signed-receipt-micalg=optional, sha1"
        );
    }

    #[test]
    fn test_options_require_more_than_five_tokens() {
        assert!(DispositionOptions::parse("signed-receipt-protocol=optional, pkcs7-signature").is_err());
        assert!(DispositionOptions::parse("").is_err());
        assert!(DispositionOptions::parse("a=b,c;d=e").is_err());
        assert!(DispositionOptions::parse("a=b,c;d=e,f").is_ok());
    }
}
