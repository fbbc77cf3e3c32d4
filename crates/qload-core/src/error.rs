use qload_model::DirectiveError;
use thiserror::Error;

use crate::runner::RunnerError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed directive: {0}")]
    Directive(#[from] DirectiveError),
    #[error("no runner registered for kind: {0}")]
    NoRunner(String),
    #[error("runner error: {0}")]
    Runner(#[from] RunnerError),
    #[error("task failed: {0}")]
    Task(String),
}
