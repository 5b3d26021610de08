//! The pipeline runner.

use tracing::{debug, error, warn};

use crate::stage::{FailureStage, PipelineContext, Stage};

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome<E> {
    /// Every stage ran.
    Completed,
    /// A stage set the terminated flag.
    Terminated { stage: &'static str },
    /// A stage returned an error; failure handlers have run.
    Failed { stage: &'static str, error: E },
}

impl<E> RunOutcome<E> {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed)
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, RunOutcome::Terminated { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RunOutcome::Failed { .. })
    }

    /// `Err` only for `Failed`; termination counts as success.
    pub fn into_result(self) -> Result<(), E> {
        match self {
            RunOutcome::Failed { error, .. } => Err(error),
            _ => Ok(()),
        }
    }
}

/// Ordered stages plus on-done and on-failure handlers.
pub struct Pipeline<C: PipelineContext> {
    name: &'static str,
    stages: Vec<Box<dyn Stage<C>>>,
    on_done: Vec<Box<dyn Stage<C>>>,
    on_failure: Vec<Box<dyn FailureStage<C>>>,
}

impl<C: PipelineContext> Pipeline<C> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            stages: Vec::new(),
            on_done: Vec::new(),
            on_failure: Vec::new(),
        }
    }

    /// Appends a main stage.
    pub fn step(mut self, stage: impl Stage<C> + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Appends a handler that runs after every run.
    pub fn done(mut self, stage: impl Stage<C> + 'static) -> Self {
        self.on_done.push(Box::new(stage));
        self
    }

    /// Appends a handler that runs when a main stage fails.
    pub fn fail(mut self, stage: impl FailureStage<C> + 'static) -> Self {
        self.on_failure.push(Box::new(stage));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub async fn run(&self, ctx: &mut C) -> RunOutcome<C::Error> {
        let mut outcome = RunOutcome::Completed;

        for stage in &self.stages {
            debug!(pipeline = self.name, stage = stage.name(), "Running stage");
            if let Err(err) = stage.process(ctx).await {
                warn!(
                    pipeline = self.name,
                    stage = stage.name(),
                    error = %err,
                    "Stage failed"
                );
                self.run_failure_handlers(ctx, &err).await;
                outcome = RunOutcome::Failed {
                    stage: stage.name(),
                    error: err,
                };
                break;
            }
            if ctx.is_terminated() {
                debug!(
                    pipeline = self.name,
                    stage = stage.name(),
                    "Processing terminated by stage"
                );
                outcome = RunOutcome::Terminated {
                    stage: stage.name(),
                };
                break;
            }
        }

        for handler in &self.on_done {
            debug!(pipeline = self.name, stage = handler.name(), "Running done handler");
            if let Err(err) = handler.process(ctx).await {
                error!(
                    pipeline = self.name,
                    stage = handler.name(),
                    error = %err,
                    "Done handler failed"
                );
            }
        }

        outcome
    }

    async fn run_failure_handlers(&self, ctx: &mut C, err: &C::Error) {
        for handler in &self.on_failure {
            debug!(pipeline = self.name, stage = handler.name(), "Running failure handler");
            if let Err(handler_err) = handler.process(ctx, err).await {
                error!(
                    pipeline = self.name,
                    stage = handler.name(),
                    error = %handler_err,
                    "Failure handler failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use thiserror::Error;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("stage error: {0}")]
    struct TestError(String);

    #[derive(Default)]
    struct TestContext {
        log: Vec<String>,
        terminated: bool,
    }

    impl PipelineContext for TestContext {
        type Error = TestError;

        fn is_terminated(&self) -> bool {
            self.terminated
        }

        fn terminate(&mut self) {
            self.terminated = true;
        }
    }

    enum Behaviour {
        Record,
        Fail,
        Terminate,
    }

    struct TestStage {
        name: &'static str,
        behaviour: Behaviour,
    }

    fn record(name: &'static str) -> TestStage {
        TestStage {
            name,
            behaviour: Behaviour::Record,
        }
    }

    fn fail(name: &'static str) -> TestStage {
        TestStage {
            name,
            behaviour: Behaviour::Fail,
        }
    }

    fn terminate(name: &'static str) -> TestStage {
        TestStage {
            name,
            behaviour: Behaviour::Terminate,
        }
    }

    #[async_trait]
    impl Stage<TestContext> for TestStage {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn process(&self, ctx: &mut TestContext) -> Result<(), TestError> {
            ctx.log.push(self.name.to_string());
            match self.behaviour {
                Behaviour::Record => Ok(()),
                Behaviour::Fail => Err(TestError(self.name.to_string())),
                Behaviour::Terminate => {
                    ctx.terminate();
                    Ok(())
                }
            }
        }
    }

    struct OnFailure {
        name: &'static str,
        fails: bool,
    }

    #[async_trait]
    impl FailureStage<TestContext> for OnFailure {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn process(&self, ctx: &mut TestContext, error: &TestError) -> Result<(), TestError> {
            ctx.log.push(format!("{}({})", self.name, error.0));
            if self.fails {
                Err(TestError("handler".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn on_failure(name: &'static str) -> OnFailure {
        OnFailure { name, fails: false }
    }

    #[tokio::test]
    async fn test_all_stages_run_in_order() {
        let pipeline = Pipeline::new("test")
            .step(record("a"))
            .step(record("b"))
            .step(record("c"))
            .done(record("done"))
            .fail(on_failure("fail"));
        let mut ctx = TestContext::default();

        let outcome = pipeline.run(&mut ctx).await;

        assert!(outcome.is_completed());
        assert_eq!(ctx.log, vec!["a", "b", "c", "done"]);
        assert_eq!(pipeline.stage_names(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_terminate_skips_rest_and_failure_handlers() {
        let pipeline = Pipeline::new("test")
            .step(record("a"))
            .step(terminate("stop"))
            .step(record("never"))
            .done(record("done"))
            .fail(on_failure("fail"));
        let mut ctx = TestContext::default();

        let outcome = pipeline.run(&mut ctx).await;

        assert!(matches!(outcome, RunOutcome::Terminated { stage: "stop" }));
        assert_eq!(ctx.log, vec!["a", "stop", "done"]);
        assert!(outcome.into_result().is_ok());
    }

    #[tokio::test]
    async fn test_error_runs_every_failure_handler_then_done() {
        let pipeline = Pipeline::new("test")
            .step(record("a"))
            .step(fail("boom"))
            .step(record("never"))
            .fail(on_failure("f1"))
            .fail(on_failure("f2"))
            .done(record("d1"))
            .done(record("d2"));
        let mut ctx = TestContext::default();

        let outcome = pipeline.run(&mut ctx).await;

        assert_eq!(ctx.log, vec!["a", "boom", "f1(boom)", "f2(boom)", "d1", "d2"]);
        match outcome {
            RunOutcome::Failed { stage, error } => {
                assert_eq!(stage, "boom");
                assert_eq!(error, TestError("boom".to_string()));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failing_handlers_do_not_stop_others() {
        let pipeline = Pipeline::new("test")
            .step(fail("boom"))
            .fail(OnFailure {
                name: "f1",
                fails: true,
            })
            .fail(on_failure("f2"))
            .done(fail("d1"))
            .done(record("d2"));
        let mut ctx = TestContext::default();

        let outcome = pipeline.run(&mut ctx).await;

        assert!(outcome.is_failed());
        assert_eq!(ctx.log, vec!["boom", "f1(boom)", "f2(boom)", "d1", "d2"]);
    }

    #[tokio::test]
    async fn test_side_effects_before_failure_are_kept() {
        let pipeline = Pipeline::new("test").step(record("a")).step(fail("b"));
        let mut ctx = TestContext::default();

        let result = pipeline.run(&mut ctx).await.into_result();

        assert!(result.is_err());
        assert_eq!(ctx.log, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_pipeline_runs_done_handlers() {
        let pipeline = Pipeline::new("empty").done(record("done"));
        let mut ctx = TestContext::default();
        assert!(pipeline.run(&mut ctx).await.is_completed());
        assert_eq!(ctx.log, vec!["done"]);
    }
}
