use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::InvalidCancelMode;

/// What a running compute job does once cancellation is requested.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CancelMode {
    /// Log the request once and keep running until the full duration elapses.
    #[default]
    Observe,
    /// Stop at the end of the iteration in which the request is first seen.
    Halt,
}

impl CancelMode {
    #[inline]
    pub fn halts(self) -> bool {
        matches!(self, CancelMode::Halt)
    }
}

impl FromStr for CancelMode {
    type Err = InvalidCancelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_ascii_lowercase();
        match norm.as_str() {
            "observe" | "log" => Ok(CancelMode::Observe),
            "halt" | "stop" => Ok(CancelMode::Halt),
            _ => Err(InvalidCancelMode(s.to_string())),
        }
    }
}

impl fmt::Display for CancelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancelMode::Observe => f.write_str("observe"),
            CancelMode::Halt => f.write_str("halt"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_modes() {
        assert_eq!("observe".parse::<CancelMode>().unwrap(), CancelMode::Observe);
        assert_eq!(" HALT ".parse::<CancelMode>().unwrap(), CancelMode::Halt);
        assert_eq!(
            "abort".parse::<CancelMode>(),
            Err(InvalidCancelMode("abort".to_string()))
        );
    }

    #[test]
    fn default_only_observes() {
        assert!(!CancelMode::default().halts());
        assert!(CancelMode::Halt.halts());
    }
}
