//! Search diagnostics.
//!
//! Counters are a profiling aid for tuning budgets, never a correctness
//! dependency.

use serde::{Deserialize, Serialize};

/// Statistics accumulated across a recommendation search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Determinization tasks that contributed samples.
    pub determinizations: u32,

    /// Select/expand/rollout/backpropagate cycles across all tasks.
    pub iterations: u64,

    /// Nodes added to any task's tree.
    pub nodes_expanded: u64,

    /// Rollouts simulated to a stop.
    pub rollouts: u64,

    /// Total wall-clock time of the search (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create empty statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold another task's counters into this one.
    pub fn merge(&mut self, other: &SearchStats) {
        self.iterations += other.iterations;
        self.nodes_expanded += other.nodes_expanded;
        self.rollouts += other.rollouts;
    }

    /// Iterations per second over the whole search.
    #[must_use]
    pub fn iterations_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.iterations as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
