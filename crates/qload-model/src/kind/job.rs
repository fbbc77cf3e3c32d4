use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::CpuPercent;

/// Leading token that selects the compute workload.
pub const COMPUTE_TAG: &str = "c";

/// Workload requested by a directive.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum JobKind {
    /// Burn CPU at the given duty cycle.
    ComputeLoad {
        /// Target share of wall-clock time spent computing.
        cpu_percent: CpuPercent,
    },
    /// Well-formed directive with an unrecognised leading token.
    ///
    /// The message counts as handled but nothing runs.
    Inert {
        /// The leading token as received.
        tag: String,
    },
}

impl JobKind {
    /// Returns a short symbolic identifier for logging and routing:
    /// - `"compute"`
    /// - `"inert"`
    pub fn kind(&self) -> &'static str {
        match self {
            JobKind::ComputeLoad { .. } => "compute",
            JobKind::Inert { .. } => "inert",
        }
    }

    #[inline]
    pub fn is_inert(&self) -> bool {
        matches!(self, JobKind::Inert { .. })
    }
}

/// Parsed job request extracted from one queue message.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDirective {
    pub kind: JobKind,
    /// Total wall-clock time the job should occupy.
    pub duration: Duration,
}

impl JobDirective {
    pub fn compute(duration: Duration, cpu_percent: CpuPercent) -> Self {
        Self {
            kind: JobKind::ComputeLoad { cpu_percent },
            duration,
        }
    }

    pub fn inert(tag: impl Into<String>, duration: Duration) -> Self {
        Self {
            kind: JobKind::Inert { tag: tag.into() },
            duration,
        }
    }

    /// Cpu percentage for compute directives, `None` otherwise.
    pub fn cpu_percent(&self) -> Option<CpuPercent> {
        match self.kind {
            JobKind::ComputeLoad { cpu_percent } => Some(cpu_percent),
            JobKind::Inert { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        let pct = CpuPercent::new(10).unwrap();
        assert_eq!(JobKind::ComputeLoad { cpu_percent: pct }.kind(), "compute");
        assert_eq!(JobKind::Inert { tag: "x".into() }.kind(), "inert");
    }

    #[test]
    fn cpu_percent_only_for_compute() {
        let pct = CpuPercent::new(25).unwrap();
        let d = Duration::from_secs(3);
        assert_eq!(JobDirective::compute(d, pct).cpu_percent(), Some(pct));
        assert_eq!(JobDirective::inert("x", d).cpu_percent(), None);
    }

    #[test]
    fn serde_shape() {
        let directive = JobDirective::compute(Duration::from_secs(90), CpuPercent::new(50).unwrap());
        let json = serde_json::to_value(&directive).unwrap();
        assert_eq!(json["kind"]["computeLoad"]["cpuPercent"], 50);
        assert_eq!(json["duration"]["secs"], 90);

        let back: JobDirective = serde_json::from_value(json).unwrap();
        assert_eq!(back, directive);
    }
}
