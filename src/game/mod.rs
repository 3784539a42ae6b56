//! One turn of combat: actions, counters, and state transitions.

pub mod action;
pub mod state;

pub use action::{Action, CardIndices};
pub use state::GameState;
