use std::sync::Arc;

use taskvisor::TaskRef;
use tracing::{debug, instrument, trace};

use crate::{
    error::CoreError,
    runner::{BuildContext, Job, Runner},
};

/// Maps a parsed job to the first registered runner that supports its kind.
///
/// Runners are keyed by name: registering a second runner under an existing name replaces the first in place.
#[derive(Default)]
pub struct RunnerRouter {
    runners: Vec<Arc<dyn Runner>>,
    ctx: BuildContext,
}

impl RunnerRouter {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Context handed to every runner at build time (shutdown file lookup).
    #[inline]
    pub fn with_context(mut self, ctx: BuildContext) -> Self {
        self.ctx = ctx;
        self
    }

    pub fn register(&mut self, runner: Arc<dyn Runner>) {
        match self.runners.iter_mut().find(|r| r.name() == runner.name()) {
            Some(slot) => {
                debug!(target: "qload.core.router", runner = runner.name(), "replacing registered runner");
                *slot = runner;
            }
            None => self.runners.push(runner),
        }
    }

    pub fn pick(&self, job: &Job) -> Option<&dyn Runner> {
        self.runners
            .iter()
            .find(|r| r.supports(job))
            .map(|r| r.as_ref())
    }

    #[instrument(
        level = "trace",
        skip(self, job),
        fields(seq = job.message.sequence_number, kind = job.directive.kind.kind())
    )]
    pub fn build(&self, job: &Job) -> Result<TaskRef, CoreError> {
        let Some(runner) = self.pick(job) else {
            debug!(target: "qload.core.router", seq = job.message.sequence_number, "no runner for job kind");
            return Err(CoreError::NoRunner(job.directive.kind.kind().to_string()));
        };

        let task = runner.build_task(job, &self.ctx)?;
        trace!(target: "qload.core.router", seq = job.message.sequence_number, runner = runner.name(), "task built");
        Ok(task)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use qload_model::{CpuPercent, JobDirective, JobKind, Message};
    use taskvisor::{TaskFn, TaskRef};
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::runner::RunnerError;

    struct ComputeOnly;

    impl Runner for ComputeOnly {
        fn name(&self) -> &'static str {
            "compute-only"
        }

        fn supports(&self, job: &Job) -> bool {
            matches!(job.directive.kind, JobKind::ComputeLoad { .. })
        }

        fn build_task(&self, _job: &Job, _ctx: &BuildContext) -> Result<TaskRef, RunnerError> {
            Ok(TaskFn::arc("compute-only", |_ctx: CancellationToken| async move { Ok(()) }))
        }
    }

    fn job(directive: JobDirective) -> Job {
        Job::new(Message::new(1, "test"), directive)
    }

    #[test]
    fn picks_supporting_runner() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(ComputeOnly));

        let compute = job(JobDirective::compute(
            Duration::from_secs(1),
            CpuPercent::new(10).unwrap(),
        ));
        assert_eq!(router.pick(&compute).map(|r| r.name()), Some("compute-only"));
        assert!(router.build(&compute).is_ok());
    }

    #[test]
    fn missing_runner_is_an_error() {
        let router = RunnerRouter::new();
        let inert = job(JobDirective::inert("x", Duration::from_secs(1)));
        assert!(matches!(router.build(&inert), Err(CoreError::NoRunner(k)) if k == "inert"));
    }

    struct Replacement(&'static str);

    impl Runner for Replacement {
        fn name(&self) -> &'static str {
            "compute-only"
        }

        fn supports(&self, _job: &Job) -> bool {
            true
        }

        fn build_task(&self, _job: &Job, _ctx: &BuildContext) -> Result<TaskRef, RunnerError> {
            Err(RunnerError::InvalidJob(self.0.to_string()))
        }
    }

    #[test]
    fn same_name_replaces_runner() {
        let mut router = RunnerRouter::new();
        router.register(Arc::new(ComputeOnly));
        router.register(Arc::new(Replacement("replaced")));

        let inert = job(JobDirective::inert("x", Duration::from_secs(1)));
        assert_eq!(router.runners.len(), 1);
        assert!(matches!(
            router.build(&inert),
            Err(CoreError::Runner(RunnerError::InvalidJob(m))) if m == "replaced"
        ));
    }
}
