//! # Pipeline Execution Engine
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Runs an ordered list of stages over one mutable context. Both the send and
//! the receive path of the node are pipelines built from this engine.
//!
//! ## Run Semantics
//!
//! ```text
//! stage 1 ─→ stage 2 ─→ ... ─→ stage N
//!    │ Err        │ terminated
//!    ↓            ↓
//! on_failure(ctx, &err) ... (all)     (skipped)
//!    ↓            ↓
//! on_done(ctx) ... (all, always)
//! ```
//!
//! | Event | Remaining stages | Failure handlers | Done handlers |
//! |-------|------------------|------------------|---------------|
//! | All stages succeed | - | skipped | run |
//! | A stage sets `terminated` | skipped | skipped | run |
//! | A stage returns `Err` | skipped | all run with the error | run |
//!
//! Errors raised by failure or done handlers are logged and never re-raised.
//! Side effects of stages that already ran are kept; there is no rollback.
//!
//! ## Concurrency
//!
//! A run is sequential: each stage is awaited to completion before the next
//! one starts. One pipeline instance can serve many runs concurrently since
//! stages only borrow it immutably.

pub mod engine;
pub mod events;
pub mod stage;

pub use engine::{Pipeline, RunOutcome};
pub use events::{Phase, ServerEventStage};
pub use stage::{FailureStage, PipelineContext, Stage};
