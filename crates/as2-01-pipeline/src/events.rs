//! Server events: structured log lines marking where a message is in its
//! lifecycle, emitted from inside a pipeline so they share its ordering.

use std::fmt;

use async_trait::async_trait;
use tracing::{error, info};

use crate::stage::{FailureStage, PipelineContext, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FileSend,
    FileReceive,
    MdnReceive,
    AsyncMdnSend,
    AsyncMdnReceive,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::FileSend => "file-send",
            Phase::FileReceive => "file-receive",
            Phase::MdnReceive => "mdn-receive",
            Phase::AsyncMdnSend => "async-mdn-send",
            Phase::AsyncMdnReceive => "async-mdn-receive",
        };
        f.write_str(s)
    }
}

/// Logs `message` with the phase and the context's message id.
///
/// Register with `step`/`done` for info events and with `fail` for error
/// events (the error is attached to the log line).
pub struct ServerEventStage<C> {
    phase: Phase,
    message: &'static str,
    message_id: fn(&C) -> String,
}

impl<C> ServerEventStage<C> {
    pub fn new(phase: Phase, message: &'static str, message_id: fn(&C) -> String) -> Self {
        Self {
            phase,
            message,
            message_id,
        }
    }
}

#[async_trait]
impl<C: PipelineContext> Stage<C> for ServerEventStage<C> {
    fn name(&self) -> &'static str {
        "server-event"
    }

    async fn process(&self, ctx: &mut C) -> Result<(), C::Error> {
        info!(
            phase = %self.phase,
            message_id = %(self.message_id)(ctx),
            "{}",
            self.message
        );
        Ok(())
    }
}

#[async_trait]
impl<C: PipelineContext> FailureStage<C> for ServerEventStage<C> {
    fn name(&self) -> &'static str {
        "server-event"
    }

    async fn process(&self, ctx: &mut C, err: &C::Error) -> Result<(), C::Error> {
        error!(
            phase = %self.phase,
            message_id = %(self.message_id)(ctx),
            error = %err,
            "{}",
            self.message
        );
        Ok(())
    }
}
