use std::sync::Mutex;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Picks reviewers out of a candidate pool.
///
/// `select` returns `min(pool.len(), want)` distinct ids, all taken from
/// `pool`. Callers treat the result as an unordered set unless they asked
/// for the whole pool, in which case the order is the draw order.
pub trait ReviewerSelector: Send + Sync {
    fn select(&self, pool: Vec<String>, want: usize) -> Vec<String>;
}

/// Uniform selection backed by a fresh thread-local generator per call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSelector;

impl ReviewerSelector for RandomSelector {
    fn select(&self, pool: Vec<String>, want: usize) -> Vec<String> {
        shuffle_and_truncate(pool, want, &mut rand::rng())
    }
}

/// Deterministic selection from an injected seed.
#[derive(Debug)]
pub struct SeededSelector {
    rng: Mutex<StdRng>,
}

impl SeededSelector {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl ReviewerSelector for SeededSelector {
    fn select(&self, pool: Vec<String>, want: usize) -> Vec<String> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        shuffle_and_truncate(pool, want, &mut *rng)
    }
}

/// Fisher-Yates shuffle, then keep the first `want` ids.
///
/// A pool no larger than `want` is shuffled too; with `want == pool.len()`
/// the result is a full random permutation, which the deactivation cascade
/// uses as its draw order.
pub fn shuffle_and_truncate<R: Rng + ?Sized>(
    mut pool: Vec<String>,
    want: usize,
    rng: &mut R,
) -> Vec<String> {
    pool.shuffle(rng);
    pool.truncate(want);
    pool
}
