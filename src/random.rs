//! Injectable randomness
//!
//! Lifeline outcomes are drawn through the [`RandomSource`] trait so that
//! games can be replayed from a seed, or scripted outright in tests.
//! Production games use [`fastrand::Rng`].

use std::ops::RangeInclusive;

/// A source of uniform random draws
pub trait RandomSource {
    /// Returns an integer uniformly distributed in `0..bound`
    ///
    /// `bound` is always greater than zero.
    fn below(&mut self, bound: usize) -> usize;

    /// Returns a float uniformly distributed in `[0, 1)`
    fn unit(&mut self) -> f64;

    /// Returns `true` with the given probability
    fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Returns an integer uniformly distributed in the inclusive range
    fn between(&mut self, range: RangeInclusive<u8>) -> u8 {
        let (low, high) = range.into_inner();
        if high <= low {
            return low;
        }
        let offset = self.below(usize::from(high - low) + 1);
        low + offset as u8
    }

    /// Shuffles a slice in place (Fisher-Yates)
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.below(i + 1);
            items.swap(i, j);
        }
    }
}

impl RandomSource for fastrand::Rng {
    fn below(&mut self, bound: usize) -> usize {
        self.usize(..bound)
    }

    fn unit(&mut self) -> f64 {
        self.f64()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;

    use super::RandomSource;

    /// Replays fixed draws; falls back to zero once a script runs out
    #[derive(Debug, Default)]
    pub(crate) struct Scripted {
        integers: VecDeque<usize>,
        units: VecDeque<f64>,
    }

    impl Scripted {
        pub(crate) fn new(integers: &[usize], units: &[f64]) -> Self {
            Self {
                integers: integers.iter().copied().collect(),
                units: units.iter().copied().collect(),
            }
        }
    }

    impl RandomSource for Scripted {
        fn below(&mut self, bound: usize) -> usize {
            self.integers.pop_front().unwrap_or(0) % bound
        }

        fn unit(&mut self) -> f64 {
            self.units.pop_front().unwrap_or(0.0)
        }
    }
}
