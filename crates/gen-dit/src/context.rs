//! Per-run generation state: the seeded RNG, named counters and the clock.
//!
//! A single [`GenerationContext`] is built for each run and passed to every
//! generator call, so two runs (or two tests) never share counters or RNG
//! state.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::GenerationError;

const SECONDS_PER_DAY: u64 = 86_400;

/// Mutable state threaded through generation.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    seed: u64,
    rng: ChaCha8Rng,
    counters: HashMap<String, u64>,
    days_since_epoch: u64,
}

impl GenerationContext {
    /// Creates a context whose RNG is seeded with `seed`.
    ///
    /// The clock value is taken from the system time at construction.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let days_since_epoch = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs().div_euclid(SECONDS_PER_DAY));
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
            counters: HashMap::new(),
            days_since_epoch,
        }
    }

    /// Creates a context with a fresh random seed.
    #[must_use]
    pub fn from_random_seed() -> Self {
        Self::new(rand::rng().random())
    }

    /// Overrides the clock value, mainly for reproducible tests.
    #[must_use]
    pub const fn with_days_since_epoch(mut self, days: u64) -> Self {
        self.days_since_epoch = days;
        self
    }

    /// Returns the seed the RNG was initialised with.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the run's RNG.
    pub const fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Returns the number of whole days between the Unix epoch and run start.
    #[must_use]
    pub const fn days_since_epoch(&self) -> u64 {
        self.days_since_epoch
    }

    /// Registers a named counter starting at `initial`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::DuplicateCounter`] if a counter with the
    /// same name already exists.
    pub fn register_counter(&mut self, name: &str, initial: u64) -> Result<(), GenerationError> {
        if self.counters.contains_key(name) {
            return Err(GenerationError::DuplicateCounter {
                name: name.to_owned(),
            });
        }
        self.counters.insert(name.to_owned(), initial);
        Ok(())
    }

    /// Returns the counter's current value and advances it by one.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::UnknownCounter`] if the counter was never
    /// registered.
    pub fn next_counter(&mut self, name: &str) -> Result<u64, GenerationError> {
        let counter = self
            .counters
            .get_mut(name)
            .ok_or_else(|| GenerationError::UnknownCounter {
                name: name.to_owned(),
            })?;
        let value = *counter;
        *counter = value.saturating_add(1);
        Ok(value)
    }
}
