mod job;
pub use job::{COMPUTE_TAG, JobDirective, JobKind};
