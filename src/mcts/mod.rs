//! Parallel determinized Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! Each determinization resolves the hidden information once (a private
//! reshuffle of the unseen deck) and runs an independent single-threaded
//! search over its own tree. Tasks fan out over a rayon pool with zero
//! shared mutable state; the precomputed tables are shared read-only.
//!
//! Two deliberate departures from textbook MCTS, preserved from the game
//! this engine models:
//!
//! - **Running-maximum backpropagation**: a node's value is the best reward
//!   ever observed through it, not the average. Search is optimistic toward
//!   any line that has ever produced a good outcome.
//! - **Advisory deadlines**: a task never interrupts a
//!   select/expand/rollout/backpropagate cycle and never returns before its
//!   root is fully expanded, so every task contributes at least one sample
//!   per root action.
//!
//! Cross-task aggregation keys on the action itself: the mean over
//! per-determinization maxima decides the final recommendation, with exact
//! ties preferring a discard.

pub mod config;
pub mod parallel;
pub mod stats;

mod node;
mod search;

pub use config::SearchConfig;
pub use parallel::{recommend, Recommendation};
pub use stats::SearchStats;
