//! Synthetic CPU work.

use std::hint::black_box;

/// One fixed-cost unit of CPU work: `rounds` iterative factorials of `depth`.
///
/// The numeric result is discarded; only the time spent matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnUnit {
    pub depth: u32,
    pub rounds: u32,
}

impl Default for BurnUnit {
    fn default() -> Self {
        Self {
            depth: 50,
            rounds: 1,
        }
    }
}

impl BurnUnit {
    #[inline(never)]
    pub fn run(&self) {
        for _ in 0..self.rounds {
            black_box(factorial(black_box(self.depth)));
        }
    }
}

fn factorial(n: u32) -> u128 {
    (1..=u128::from(n)).fold(1u128, |acc, k| acc.wrapping_mul(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factorial_small_values() {
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(1), 1);
        assert_eq!(factorial(5), 120);
        assert_eq!(factorial(20), 2_432_902_008_176_640_000);
    }

    #[test]
    fn deep_factorial_wraps_instead_of_panicking() {
        let _ = factorial(200);
        BurnUnit { depth: 500, rounds: 3 }.run();
    }

    #[test]
    fn zero_rounds_is_a_noop() {
        BurnUnit { depth: 50, rounds: 0 }.run();
    }
}
