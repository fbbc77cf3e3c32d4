use thiserror::Error;

/// Reasons a message body is rejected as a malformed directive.
///
/// Every variant is fatal for the message it came from; redelivery is left to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("invalid duration '{0}' (expected [d.]h:mm:ss[.fffffff])")]
    InvalidDuration(String),
    #[error("compute directive requires a cpu percentage")]
    MissingCpuPercent,
    #[error("invalid cpu percentage '{0}' (expected integer in 1..=100)")]
    InvalidCpuPercent(String),
}

/// A cancel mode name that is neither `observe` nor `halt` (or their aliases).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cancel mode: {0} (expected: observe|halt)")]
pub struct InvalidCancelMode(pub String);
