pub mod error;
pub use error::CoreError;
pub mod runner;
pub use runner::{BuildContext, Job, Runner, RunnerError};
pub mod router;
pub use router::RunnerRouter;
pub mod probe;
pub use probe::{EnvShutdownProbe, FixedProbe, ShutdownFileInfo, ShutdownProbe};
pub mod handler;
pub use handler::{JobHandler, JobOutcome};
pub mod source;
pub use source::{LineSource, MessageSource};
pub mod dispatch;
pub use dispatch::{DispatchConfig, DispatchSummary, Dispatcher};
