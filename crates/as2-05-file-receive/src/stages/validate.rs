//! Rejects requests that cannot be an AS2 message.

use as2_01_pipeline::Stage;
use async_trait::async_trait;
use shared_types::constants::header;

use crate::domain::context::ReceiveContext;
use crate::domain::errors::ReceiveError;

pub struct ValidateRequest;

#[async_trait]
impl Stage<ReceiveContext> for ValidateRequest {
    fn name(&self) -> &'static str {
        "validate-request"
    }

    async fn process(&self, ctx: &mut ReceiveContext) -> Result<(), ReceiveError> {
        let method = &ctx.message.connection.request_method;
        if !method.eq_ignore_ascii_case("POST") {
            return Err(ReceiveError::Protocol(format!(
                "{} method not supported",
                method
            )));
        }
        for name in [header::AS2_FROM, header::AS2_TO, header::CONTENT_TYPE] {
            if ctx.message.headers.get_non_blank(name).is_none() {
                return Err(ReceiveError::Protocol(format!(
                    "The required '{}' header was not present",
                    name
                )));
            }
        }
        if ctx.body.is_empty() {
            return Err(ReceiveError::Protocol(
                "Request did not contain a recognizable HTTP Entity".to_string(),
            ));
        }
        Ok(())
    }
}
