//! Pulls messages from a source and runs each one as its own job.

use std::sync::Arc;

use qload_model::SequenceNumber;
use tokio::{sync::Semaphore, task::JoinError, task::JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    error::CoreError,
    handler::{JobHandler, JobOutcome},
    source::MessageSource,
};

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Upper bound on jobs running at the same time.
    pub max_concurrent_calls: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_calls: 1,
        }
    }
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub received: u64,
    /// Settled messages, including no-ops.
    pub handled: u64,
    /// Jobs cancelled before finishing; left for redelivery.
    pub abandoned: u64,
    /// Malformed messages and crashed jobs; left for redelivery.
    pub failed: u64,
}

type JobResult = (SequenceNumber, Result<JobOutcome, CoreError>);

impl DispatchSummary {
    fn record(&mut self, joined: Result<JobResult, JoinError>) {
        match joined {
            Ok((seq, Ok(outcome))) if outcome.is_handled() => {
                self.handled += 1;
                debug!(target: "qload.core.dispatch", seq, ?outcome, "message handled");
            }
            Ok((seq, Ok(_))) => {
                self.abandoned += 1;
                warn!(target: "qload.core.dispatch", seq, "job cancelled; message left for redelivery");
            }
            Ok((seq, Err(e))) => {
                self.failed += 1;
                error!(target: "qload.core.dispatch", seq, error = %e, "message failed; left for redelivery");
            }
            Err(e) => {
                self.failed += 1;
                error!(target: "qload.core.dispatch", error = %e, "job task aborted");
            }
        }
    }
}

pub struct Dispatcher {
    handler: Arc<JobHandler>,
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(handler: JobHandler, cfg: DispatchConfig) -> Self {
        Self {
            handler: Arc::new(handler),
            permits: Arc::new(Semaphore::new(cfg.max_concurrent_calls.max(1))),
        }
    }

    /// Run until `source` is exhausted or `shutdown` fires.
    ///
    /// Every job gets a child of `shutdown` as its cancellation token. In-flight jobs are drained before returning.
    pub async fn run<S>(&self, mut source: S, shutdown: CancellationToken) -> DispatchSummary
    where
        S: MessageSource,
    {
        let mut summary = DispatchSummary::default();
        let mut jobs: JoinSet<JobResult> = JoinSet::new();

        loop {
            // Shutdown wins over a ready slot or message. Do not pull a message until a job slot is free.
            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                permit = Arc::clone(&self.permits).acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => break,
                },
            };
            let message = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                message = source.receive() => match message {
                    Some(m) => m,
                    None => break,
                },
            };
            summary.received += 1;

            let handler = Arc::clone(&self.handler);
            let token = shutdown.child_token();
            jobs.spawn(async move {
                let _permit = permit;
                let seq = message.sequence_number;
                (seq, handler.handle(&message, token).await)
            });

            while let Some(joined) = jobs.try_join_next() {
                summary.record(joined);
            }
        }

        if !jobs.is_empty() {
            info!(target: "qload.core.dispatch", in_flight = jobs.len(), "waiting for in-flight jobs");
        }
        while let Some(joined) = jobs.join_next().await {
            summary.record(joined);
        }

        info!(
            target: "qload.core.dispatch",
            received = summary.received,
            handled = summary.handled,
            abandoned = summary.abandoned,
            failed = summary.failed,
            "dispatcher stopped"
        );
        summary
    }
}
