//! Worker-pool fan-out over determinizations and final action selection.
//!
//! Every determinization is an independent task: its own RNG stream, its own
//! cloned state, its own tree. Tasks share only the read-only precomputed
//! tables, so no locks are needed during the search loop. Task results are
//! folded in task order, which keeps the whole search reproducible for a
//! fixed seed and zero time budget.

use std::time::Instant;

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use super::config::SearchConfig;
use super::search::{search_determinization, ActionAggregate};
use super::stats::SearchStats;
use crate::cache::{ActionSpace, ComboTables};
use crate::game::{Action, GameState};
use crate::rng::GameRng;

/// The outcome of a search: the chosen action and its estimated value.
#[derive(Clone, Debug)]
pub struct Recommendation {
    /// Best action by mean value across determinizations.
    pub action: Action,

    /// Mean of the per-determinization values for that action.
    pub expected_value: f64,

    /// Diagnostic counters for the whole search.
    pub stats: SearchStats,
}

/// Recommend the statistically best action for `state`.
///
/// Runs `config.determinizations` independent searches in parallel, merges
/// their per-action aggregates, and picks the highest mean value. Exact ties
/// prefer a discard over an attack. Returns `None` when the state is already
/// terminal or offers no legal action.
#[must_use]
pub fn recommend(
    state: &GameState,
    tables: &ComboTables,
    actions: &ActionSpace,
    config: &SearchConfig,
) -> Option<Recommendation> {
    if state.is_terminal() || state.hand.is_empty() || config.determinizations == 0 {
        return None;
    }

    let start = Instant::now();
    let workers = if config.workers == 0 {
        rayon::current_num_threads()
    } else {
        config.workers
    };
    let budget = config.task_budget(workers);
    let base_rng = GameRng::new(config.seed);

    let run_tasks = || -> Vec<(FxHashMap<Action, ActionAggregate>, SearchStats)> {
        (0..config.determinizations)
            .into_par_iter()
            .map(|task| {
                let mut rng = base_rng.fork(task as u64);
                let mut stats = SearchStats::new();
                let aggregates = search_determinization(
                    state.clone(),
                    tables,
                    actions,
                    config.exploration,
                    budget,
                    &mut rng,
                    &mut stats,
                );
                (aggregates, stats)
            })
            .collect()
    };

    // A nonzero worker count gets its own sized pool; the task fan-out and
    // the per-task budget then agree on the same concurrency.
    let results = if config.workers == 0 {
        run_tasks()
    } else {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
        {
            Ok(pool) => pool.install(run_tasks),
            Err(e) => {
                warn!(error = %e, "could not size the worker pool, using the global pool");
                run_tasks()
            }
        }
    };

    let mut merged: FxHashMap<Action, ActionAggregate> = FxHashMap::default();
    let mut stats = SearchStats::new();
    stats.determinizations = config.determinizations as u32;
    for (aggregates, task_stats) in results {
        stats.merge(&task_stats);
        for (action, aggregate) in aggregates {
            let entry = merged.entry(action).or_default();
            entry.total_value += aggregate.total_value;
            entry.samples += aggregate.samples;
        }
    }
    stats.time_us = start.elapsed().as_micros() as u64;

    let (action, expected_value) = select_best(&merged)?;
    debug!(
        action = %action,
        expected_value,
        iterations = stats.iterations,
        elapsed_us = stats.time_us,
        "search complete"
    );
    Some(Recommendation {
        action,
        expected_value,
        stats,
    })
}

/// Highest mean value wins; exact ties prefer a discard over an attack.
fn select_best(merged: &FxHashMap<Action, ActionAggregate>) -> Option<(Action, f64)> {
    let mut best: Option<(&Action, f64)> = None;
    for (action, aggregate) in merged {
        if aggregate.samples == 0 {
            continue;
        }
        let mean = aggregate.total_value / f64::from(aggregate.samples);
        match best {
            None => best = Some((action, mean)),
            Some((incumbent, incumbent_mean)) => {
                if mean > incumbent_mean
                    || (mean == incumbent_mean && action.is_discard() && !incumbent.is_discard())
                {
                    best = Some((action, mean));
                }
            }
        }
    }
    best.map(|(action, mean)| (action.clone(), mean))
}
