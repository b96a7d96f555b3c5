//! Injected randomness
//!
//! Generation and search both draw from a single `RandomSource` that the
//! caller seeds once and lends out in a fixed order. Nothing in the crate
//! touches a global generator.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Anything that can hand out uniform draws in `[0, 1)`.
///
/// Every other helper is derived from `next_uniform`, so a scripted source
/// only has to implement that one method.
pub trait RandomSource {
    fn next_uniform(&mut self) -> f64;

    /// Uniform integer in `lo..=hi`.
    fn int_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        debug_assert!(lo <= hi);
        let span = hi - lo + 1;
        let offset = (self.next_uniform() * span as f64) as i64;
        lo + offset.clamp(0, span - 1)
    }

    /// Uniform index in `0..n`. `n` must be positive.
    fn index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        let i = (self.next_uniform() * n as f64) as usize;
        i.min(n - 1)
    }

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.next_uniform() < p
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.index(items.len())])
        }
    }
}

impl RandomSource for ChaCha8Rng {
    fn next_uniform(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandomSource;

    /// Replays a fixed list of draws, cycling when exhausted.
    pub struct ScriptedSource {
        draws: Vec<f64>,
        pos: usize,
    }

    impl ScriptedSource {
        pub fn new(draws: Vec<f64>) -> Self {
            assert!(!draws.is_empty());
            Self { draws, pos: 0 }
        }

        /// The draw that makes `index(n)` return `i`.
        pub fn pick(i: usize, n: usize) -> f64 {
            (i as f64 + 0.5) / n as f64
        }

        pub fn consumed(&self) -> usize {
            self.pos
        }
    }

    impl RandomSource for ScriptedSource {
        fn next_uniform(&mut self) -> f64 {
            let v = self.draws[self.pos % self.draws.len()];
            self.pos += 1;
            v
        }
    }
}
