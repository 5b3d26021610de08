//! Checks applied to a receipt returned for one of our files.

use shared_crypto::validate_returned_mic;
use shared_types::disposition::ERR_INTEGRITY_CHECK;
use shared_types::{DispositionError, DispositionType, IncomingMdn};

/// Fails unless the partner reports `processed` with no modifier.
///
/// The error carries the partner's disposition and its MDN text.
pub fn validate_mdn_disposition(mdn: &IncomingMdn) -> Result<DispositionType, DispositionError> {
    let disposition = DispositionType::parse(&mdn.attributes.content_disposition);
    if !disposition.is_success() {
        return Err(DispositionError::new(disposition, mdn.body_text.clone()));
    }
    Ok(disposition)
}

/// Fails with `integrity-check-failed` when the returned MIC differs from
/// the one recorded at send time.
pub fn validate_mdn_mic(outgoing_mic: &str, mdn: &IncomingMdn) -> Result<(), DispositionError> {
    let returned = &mdn.attributes.received_content_mic;
    if !validate_returned_mic(outgoing_mic, returned) {
        return Err(DispositionError::error(
            ERR_INTEGRITY_CHECK,
            format!(
                "MIC does not match. Expected: {}, got: {}",
                outgoing_mic, returned
            ),
        ));
    }
    Ok(())
}
