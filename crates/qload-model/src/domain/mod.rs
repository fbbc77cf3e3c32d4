mod message;
pub use message::Message;

mod cpu_percent;
pub use cpu_percent::CpuPercent;

mod cancel_mode;
pub use cancel_mode::CancelMode;

/// Transport-assigned position of a message in its queue.
pub type SequenceNumber = i64;
