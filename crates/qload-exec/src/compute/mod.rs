use std::sync::Arc;

use qload_core::{BuildContext, Job, Runner, RunnerError, RunnerRouter};
use qload_model::JobKind;
use taskvisor::{TaskError, TaskFn, TaskRef};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::duty::{ComputeConfig, ComputeJob, run_duty_cycle};

/// Runner for [`JobKind::ComputeLoad`] directives.
pub struct ComputeRunner {
    name: &'static str,
    cfg: Arc<ComputeConfig>,
}

impl ComputeRunner {
    pub fn new(cfg: ComputeConfig) -> Self {
        Self {
            name: "compute",
            cfg: Arc::new(cfg),
        }
    }
}

impl Default for ComputeRunner {
    fn default() -> Self {
        Self::new(ComputeConfig::default())
    }
}

impl Runner for ComputeRunner {
    fn name(&self) -> &'static str {
        self.name
    }

    fn supports(&self, job: &Job) -> bool {
        matches!(job.directive.kind, JobKind::ComputeLoad { .. })
    }

    fn build_task(&self, job: &Job, ctx: &BuildContext) -> Result<TaskRef, RunnerError> {
        let job = ComputeJob::try_from(job).map_err(|e| RunnerError::InvalidJob(e.to_string()))?;
        let job = Arc::new(job);
        let cfg = Arc::clone(&self.cfg);
        let probe = Arc::clone(&ctx.probe);

        trace!(target: "qload.exec.compute", seq = job.seq, runner = self.name, "building task");

        let task: TaskRef = TaskFn::arc(self.name, move |ctx: CancellationToken| {
            let job = Arc::clone(&job);
            let cfg = Arc::clone(&cfg);
            let probe = Arc::clone(&probe);

            async move {
                let report = run_duty_cycle(&job, &cfg, probe.as_ref(), &ctx).await;
                if report.halted {
                    debug!(target: "qload.exec.compute", seq = job.seq, "halted on cancellation");
                    return Err(TaskError::Canceled);
                }
                Ok(())
            }
        });

        Ok(task)
    }
}

/// Register a [`ComputeRunner`] built from `cfg` on `router`.
pub fn register_compute_runner(router: &mut RunnerRouter, cfg: ComputeConfig) {
    router.register(Arc::new(ComputeRunner::new(cfg)));
}
