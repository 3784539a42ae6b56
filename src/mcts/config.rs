//! Search configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Safety margin applied to the per-task slice of the time budget.
const BUDGET_MARGIN: f64 = 0.75;

/// Configuration for one recommendation search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Total wall-clock budget for the whole search. Advisory: tasks finish
    /// their current cycle and fully expand their root regardless.
    pub time_budget: Duration,

    /// Number of hidden-information determinizations to sample.
    pub determinizations: usize,

    /// Worker threads for the search pool (0 = the global pool's full
    /// hardware concurrency).
    pub workers: usize,

    /// UCB1 exploration constant.
    pub exploration: f64,

    /// Seed for the deterministic per-task RNG streams.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_secs(30),
            determinizations: 50,
            workers: 0,
            exploration: 1.4,
            seed: 42,
        }
    }
}

impl SearchConfig {
    /// Set the total time budget.
    #[must_use]
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = budget;
        self
    }

    /// Set the number of determinizations.
    #[must_use]
    pub fn with_determinizations(mut self, n: usize) -> Self {
        self.determinizations = n;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the worker thread count (0 = all available).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Per-task deadline: the total budget scaled down by the
    /// determinization-to-worker ratio and a 25% safety margin.
    #[must_use]
    pub fn task_budget(&self, workers: usize) -> Duration {
        if self.determinizations == 0 {
            return Duration::ZERO;
        }
        self.time_budget
            .mul_f64(BUDGET_MARGIN * workers as f64 / self.determinizations as f64)
    }
}
