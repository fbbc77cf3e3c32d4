use qload_model::{JobKind, Message, parse};
use taskvisor::TaskError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::{error::CoreError, router::RunnerRouter, runner::Job};

/// Result of handling one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// Nothing to run: too few fields or an inert kind.
    Skipped,
    /// The workload ran for its full duration.
    Completed,
    /// The workload stopped early on cancellation.
    Cancelled,
}

impl JobOutcome {
    /// Whether the transport may settle the message.
    ///
    /// Cancelled jobs are abandoned so the message gets redelivered.
    pub fn is_handled(&self) -> bool {
        !matches!(self, JobOutcome::Cancelled)
    }
}

/// Parses messages and runs the resulting jobs.
pub struct JobHandler {
    router: RunnerRouter,
}

impl JobHandler {
    pub fn new(router: RunnerRouter) -> Self {
        Self { router }
    }

    #[instrument(level = "debug", skip(self, message, token), fields(seq = message.sequence_number))]
    pub async fn handle(
        &self,
        message: &Message,
        token: CancellationToken,
    ) -> Result<JobOutcome, CoreError> {
        info!(target: "qload.core.handler", "Message received: {}", message.body);

        let Some(directive) = parse(&message.body)? else {
            debug!(target: "qload.core.handler", "too few fields; nothing to run");
            return Ok(JobOutcome::Skipped);
        };
        if let JobKind::Inert { tag } = &directive.kind {
            debug!(target: "qload.core.handler", %tag, "inert directive; nothing to run");
            return Ok(JobOutcome::Skipped);
        }

        let job = Job::new(message.clone(), directive);
        let task = self.router.build(&job)?;

        match task.spawn(token).await {
            Ok(()) => Ok(JobOutcome::Completed),
            Err(TaskError::Canceled) => Ok(JobOutcome::Cancelled),
            Err(e) => Err(CoreError::Task(format!("{e:?}"))),
        }
    }
}
