/// Per-job loop state, owned by the task running that job.
#[derive(Debug, Default)]
pub struct ExecutionState {
    iterations: u64,
    cancellation_observed: bool,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    #[inline]
    pub fn cancellation_observed(&self) -> bool {
        self.cancellation_observed
    }

    /// Count one finished iteration and return the new total.
    #[inline]
    pub fn tick(&mut self) -> u64 {
        self.iterations += 1;
        self.iterations
    }

    /// Record whether cancellation is currently requested.
    ///
    /// Returns `true` only for the first call that sees a request; the flag never resets.
    pub fn observe_cancellation(&mut self, requested: bool) -> bool {
        if requested && !self.cancellation_observed {
            self.cancellation_observed = true;
            return true;
        }
        false
    }

    /// Whether `every` divides the iteration count; `every == 0` disables progress.
    #[inline]
    pub fn progress_due(&self, every: u64) -> bool {
        every != 0 && self.iterations % every == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_reported_once() {
        let mut state = ExecutionState::new();
        assert!(!state.observe_cancellation(false));
        assert!(!state.cancellation_observed());

        assert!(state.observe_cancellation(true));
        for _ in 0..10 {
            assert!(!state.observe_cancellation(true));
        }
        assert!(!state.observe_cancellation(false));
        assert!(state.cancellation_observed());
    }

    #[test]
    fn progress_cadence() {
        let mut state = ExecutionState::new();
        let due: Vec<u64> = (0..25)
            .filter_map(|_| {
                let n = state.tick();
                state.progress_due(10).then_some(n)
            })
            .collect();
        assert_eq!(due, vec![10, 20]);
        assert_eq!(state.iterations(), 25);
        assert!(!state.progress_due(0));
    }
}
