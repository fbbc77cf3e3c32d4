use std::time::Duration;

use tokio::time::{Instant, sleep};
use tokio_util::sync::CancellationToken;

/// Accumulates owed idle time and pays it back in sleeps no shorter than `floor`.
///
/// Timer resolution is far coarser than one burn unit, so owed time is batched. Oversleeping
/// leaves a negative balance that later iterations work off, keeping the long-run ratio on target.
#[derive(Debug)]
pub(crate) struct IdleBudget {
    debt: f64,
    floor: f64,
}

impl IdleBudget {
    pub(crate) fn new(floor: Duration) -> Self {
        Self {
            debt: 0.0,
            floor: floor.as_secs_f64(),
        }
    }

    /// Add `owed` and sleep if the balance reached the floor.
    ///
    /// Sleeps at most `cap`. With `interrupt` set, cancellation cuts the sleep short.
    /// Returns the time actually slept.
    pub(crate) async fn settle(
        &mut self,
        owed: Duration,
        cap: Duration,
        interrupt: Option<&CancellationToken>,
    ) -> Duration {
        self.debt += owed.as_secs_f64();
        if self.debt <= 0.0 || self.debt < self.floor || cap.is_zero() {
            return Duration::ZERO;
        }

        let want = Duration::from_secs_f64(self.debt).min(cap);
        let started = Instant::now();
        match interrupt {
            Some(token) => {
                tokio::select! {
                    _ = sleep(want) => {}
                    _ = token.cancelled() => {}
                }
            }
            None => sleep(want).await,
        }
        let slept = started.elapsed();
        self.debt -= slept.as_secs_f64();
        slept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn batches_below_floor() {
        let mut budget = IdleBudget::new(Duration::from_millis(1));
        let cap = Duration::from_secs(10);

        for _ in 0..6 {
            let slept = budget.settle(Duration::from_micros(150), cap, None).await;
            assert_eq!(slept, Duration::ZERO);
        }
        let slept = budget.settle(Duration::from_micros(150), cap, None).await;
        assert!(slept >= Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn respects_cap() {
        let mut budget = IdleBudget::new(Duration::from_millis(1));
        let slept = budget
            .settle(Duration::from_secs(5), Duration::from_millis(20), None)
            .await;
        assert!(slept >= Duration::from_millis(20));
        assert!(slept < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn interrupted_by_cancellation() {
        let mut budget = IdleBudget::new(Duration::from_millis(1));
        let token = CancellationToken::new();
        token.cancel();
        let slept = budget
            .settle(Duration::from_secs(60), Duration::from_secs(60), Some(&token))
            .await;
        assert!(slept < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_owed_never_sleeps() {
        let mut budget = IdleBudget::new(Duration::ZERO);
        let slept = budget
            .settle(Duration::ZERO, Duration::from_secs(1), None)
            .await;
        assert_eq!(slept, Duration::ZERO);
    }
}
