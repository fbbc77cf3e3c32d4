use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::DirectiveError;

/// Target share of wall-clock time spent computing, in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct CpuPercent(u8);

impl CpuPercent {
    pub const FULL: CpuPercent = CpuPercent(100);

    /// Returns `None` unless `value` is within `1..=100`.
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= 100 {
            Some(Self(value))
        } else {
            None
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Idle time owed per unit of compute time: `(100 - p) / p`.
    ///
    /// `0.0` at 100%, `1.0` at 50%, `99.0` at 1%.
    #[inline]
    pub fn idle_ratio(self) -> f64 {
        let p = f64::from(self.0);
        (100.0 - p) / p
    }
}

impl TryFrom<u8> for CpuPercent {
    type Error = DirectiveError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        CpuPercent::new(value).ok_or_else(|| DirectiveError::InvalidCpuPercent(value.to_string()))
    }
}

impl From<CpuPercent> for u8 {
    fn from(value: CpuPercent) -> Self {
        value.0
    }
}

impl FromStr for CpuPercent {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(CpuPercent::new)
            .ok_or_else(|| DirectiveError::InvalidCpuPercent(trimmed.to_string()))
    }
}

impl fmt::Display for CpuPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bounds() {
        assert_eq!(CpuPercent::new(1).map(CpuPercent::get), Some(1));
        assert_eq!(CpuPercent::new(100).map(CpuPercent::get), Some(100));
        assert!(CpuPercent::new(0).is_none());
        assert!(CpuPercent::new(101).is_none());
    }

    #[test]
    fn idle_ratio_follows_duty_cycle() {
        assert_eq!(CpuPercent::FULL.idle_ratio(), 0.0);
        assert_eq!("50".parse::<CpuPercent>().unwrap().idle_ratio(), 1.0);
        assert_eq!("1".parse::<CpuPercent>().unwrap().idle_ratio(), 99.0);
    }

    #[test]
    fn from_str_rejects_garbage() {
        assert_eq!(" 75 ".parse::<CpuPercent>().unwrap().get(), 75);
        for bad in ["", "0", "101", "-5", "fifty", "50.5", "300"] {
            assert!(
                matches!(bad.parse::<CpuPercent>(), Err(DirectiveError::InvalidCpuPercent(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn serde_rejects_out_of_range() {
        let ok: CpuPercent = serde_json::from_str("40").unwrap();
        assert_eq!(ok.get(), 40);
        assert!(serde_json::from_str::<CpuPercent>("0").is_err());
        assert_eq!(serde_json::to_string(&ok).unwrap(), "40");
    }
}
