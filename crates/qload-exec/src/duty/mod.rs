//! Duty-cycle workload loop.
//!
//! Each iteration burns one [`BurnUnit`], measures how long it took and owes
//! `t_compute * (100 - p) / p` of idle time, which is paid back with non-blocking sleeps.
//! The loop runs until the job's wall-clock duration has elapsed.

mod idle;
mod state;

pub use state::ExecutionState;

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant as CpuInstant},
};

use qload_core::{Job, ShutdownProbe};
use qload_model::{CancelMode, CpuPercent, JobKind, SequenceNumber};
use tokio::time::Instant;
use tokio_util::{sync::CancellationToken, task::AbortOnDropHandle};
use tracing::{debug, info, warn};

use crate::{burn::BurnUnit, error::ExecError};
use idle::IdleBudget;

/// Tuning for compute jobs.
#[derive(Debug, Clone)]
pub struct ComputeConfig {
    /// Emit a progress line every this many iterations; `0` disables progress lines.
    pub progress_every: u64,
    /// Shortest sleep worth scheduling; smaller idle debts are batched.
    pub idle_floor: Duration,
    pub cancel_mode: CancelMode,
    pub burn: BurnUnit,
}

impl Default for ComputeConfig {
    fn default() -> Self {
        Self {
            progress_every: 100_000,
            idle_floor: Duration::from_millis(1),
            cancel_mode: CancelMode::default(),
            burn: BurnUnit::default(),
        }
    }
}

/// A compute directive together with the message it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeJob {
    pub seq: SequenceNumber,
    pub text: String,
    pub duration: Duration,
    pub cpu_percent: CpuPercent,
}

impl TryFrom<&Job> for ComputeJob {
    type Error = ExecError;

    fn try_from(job: &Job) -> Result<Self, Self::Error> {
        match job.directive.kind {
            JobKind::ComputeLoad { cpu_percent } => Ok(Self {
                seq: job.message.sequence_number,
                text: job.message.body.clone(),
                duration: job.directive.duration,
                cpu_percent,
            }),
            ref other => Err(ExecError::UnsupportedKind(other.kind())),
        }
    }
}

/// Measurements from one run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunReport {
    pub iterations: u64,
    /// Total time spent outside idle sleeps: burn units plus loop bookkeeping.
    pub compute: Duration,
    /// Total time spent sleeping.
    pub idle: Duration,
    pub elapsed: Duration,
    pub cancellation_observed: bool,
    /// The loop stopped before `duration` because cancellation was requested in halting mode.
    pub halted: bool,
}

impl RunReport {
    /// Measured share of compute in `compute + idle`, in percent.
    pub fn duty_percent(&self) -> f64 {
        let busy = self.compute.as_secs_f64();
        let total = busy + self.idle.as_secs_f64();
        if total == 0.0 { 0.0 } else { busy * 100.0 / total }
    }
}

/// Run `job` until its duration elapses, or until cancellation in [`CancelMode::Halt`].
pub async fn run_duty_cycle(
    job: &ComputeJob,
    cfg: &ComputeConfig,
    probe: &dyn ShutdownProbe,
    token: &CancellationToken,
) -> RunReport {
    let seq = job.seq;
    info!(
        target: "qload.exec.compute",
        seq,
        duration = ?job.duration,
        cpu = %job.cpu_percent,
        cancel_mode = %cfg.cancel_mode,
        "Export start: {}", job.text
    );

    // Single cancellation callback for this job.
    let callback_fired = Arc::new(AtomicBool::new(false));
    let _watcher = {
        let fired = Arc::clone(&callback_fired);
        let token = token.clone();
        AbortOnDropHandle::new(tokio::spawn(async move {
            token.cancelled().await;
            debug!(target: "qload.exec.compute", seq, "cancellation callback fired");
            fired.store(true, Ordering::Release);
        }))
    };

    let idle_ratio = job.cpu_percent.idle_ratio();
    let interrupt = cfg.cancel_mode.halts().then_some(token);
    let mut budget = IdleBudget::new(cfg.idle_floor);
    let mut state = ExecutionState::new();
    let mut report = RunReport::default();
    let started = Instant::now();
    // Start of the current busy segment: everything since the last sleep counts as compute.
    let mut busy_since = CpuInstant::now();

    while started.elapsed() < job.duration {
        cfg.burn.run();
        let t_compute = busy_since.elapsed();
        report.compute += t_compute;

        let remaining = job.duration.saturating_sub(started.elapsed());
        let slept = budget
            .settle(t_compute.mul_f64(idle_ratio), remaining, interrupt)
            .await;
        busy_since = CpuInstant::now();
        if slept.is_zero() {
            tokio::task::yield_now().await;
        }
        report.idle += slept;

        let iterations = state.tick();

        let fired = callback_fired.load(Ordering::Acquire);
        let requested = fired || token.is_cancelled();
        if state.observe_cancellation(requested) {
            warn!(
                target: "qload.exec.compute",
                seq,
                callback_called = fired,
                "Cancellation requested for {}", job.text
            );
        }

        if state.progress_due(cfg.progress_every) {
            info!(
                target: "qload.exec.progress",
                seq,
                iterations,
                shutdown = %probe.probe(),
                "Proc progress {}", job.text
            );
        }

        if requested && cfg.cancel_mode.halts() {
            report.halted = true;
            break;
        }
    }

    report.iterations = state.iterations();
    report.cancellation_observed = state.cancellation_observed();
    report.elapsed = started.elapsed();

    info!(
        target: "qload.exec.compute",
        seq,
        duration = ?job.duration,
        iterations = report.iterations,
        elapsed = ?report.elapsed,
        duty = format_args!("{:.1}%", report.duty_percent()),
        halted = report.halted,
        "Export end: {}", job.text
    );
    report
}
