//! Random pacing intervals for accounts.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use accounthub_core::config::AccountConfig;
use accounthub_core::error::AppError;
use accounthub_core::result::AppResult;

/// Draws intervals uniformly from an inclusive range.
///
/// One generator is meant to live for the whole process: it is seeded once
/// and shared behind a mutex, never reseeded per call.
#[derive(Debug)]
pub struct IntervalGenerator {
    rng: Mutex<StdRng>,
    min: u8,
    max: u8,
}

impl IntervalGenerator {
    /// Creates a generator seeded from the operating system.
    pub fn from_config(config: &AccountConfig) -> AppResult<Self> {
        Self::build(config, StdRng::from_os_rng())
    }

    /// Creates a generator with a fixed seed.
    pub fn with_seed(config: &AccountConfig, seed: u64) -> AppResult<Self> {
        Self::build(config, StdRng::seed_from_u64(seed))
    }

    fn build(config: &AccountConfig, rng: StdRng) -> AppResult<Self> {
        if config.interval_min == 0 || config.interval_min > config.interval_max {
            return Err(AppError::configuration(format!(
                "Invalid interval range {}..={}",
                config.interval_min, config.interval_max
            )));
        }
        Ok(Self {
            rng: Mutex::new(rng),
            min: config.interval_min,
            max: config.interval_max,
        })
    }

    /// The inclusive range intervals are drawn from.
    pub fn range(&self) -> (u8, u8) {
        (self.min, self.max)
    }

    /// Draws the next interval.
    pub fn draw(&self) -> u8 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(self.min..=self.max)
    }
}
