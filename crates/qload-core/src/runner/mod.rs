use std::sync::Arc;

use qload_model::{JobDirective, Message};
use taskvisor::TaskRef;
use thiserror::Error;

use crate::probe::{EnvShutdownProbe, ShutdownProbe};

/// One parsed message ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub message: Message,
    pub directive: JobDirective,
}

impl Job {
    pub fn new(message: Message, directive: JobDirective) -> Self {
        Self { message, directive }
    }
}

/// Capabilities shared by every task a router builds.
#[derive(Clone)]
pub struct BuildContext {
    pub probe: Arc<dyn ShutdownProbe>,
}

impl BuildContext {
    pub fn with_probe(probe: Arc<dyn ShutdownProbe>) -> Self {
        Self { probe }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self {
            probe: Arc::new(EnvShutdownProbe::default()),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("invalid job: {0}")]
    InvalidJob(String),
}

/// Turns a job into a cancellable taskvisor task.
pub trait Runner: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn supports(&self, job: &Job) -> bool;

    fn build_task(&self, job: &Job, ctx: &BuildContext) -> Result<TaskRef, RunnerError>;
}
