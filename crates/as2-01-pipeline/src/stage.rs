//! Stage traits.

use async_trait::async_trait;

/// Per-run mutable state carried through a pipeline.
pub trait PipelineContext: Send {
    /// Error type raised by stages of this pipeline.
    type Error: std::error::Error + Send + Sync + 'static;

    fn is_terminated(&self) -> bool;

    /// Stop after the current stage without treating it as a failure.
    fn terminate(&mut self);
}

/// A main or on-done stage.
#[async_trait]
pub trait Stage<C: PipelineContext>: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    async fn process(&self, ctx: &mut C) -> Result<(), C::Error>;
}

/// An on-failure stage, invoked with the error that stopped the run.
#[async_trait]
pub trait FailureStage<C: PipelineContext>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn process(&self, ctx: &mut C, error: &C::Error) -> Result<(), C::Error>;
}
