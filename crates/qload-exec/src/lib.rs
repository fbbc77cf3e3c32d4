mod error;
pub use error::ExecError;

pub mod burn;
pub use burn::BurnUnit;

pub mod duty;
pub use duty::{ComputeConfig, ComputeJob, ExecutionState, RunReport, run_duty_cycle};

pub mod compute;
pub use compute::{ComputeRunner, register_compute_runner};
