//! # demonhand
//!
//! Decision engine for a turn-based card-combat minigame. Given the current
//! hand, deck state, and combat counters, it recommends a near-optimal
//! action: attack with a chosen card subset, or discard one.
//!
//! ## Design Principles
//!
//! 1. **Everything precomputed**: combo damage for all ~2.89M small subsets
//!    of the 52-card universe lives in read-only tables, built once per
//!    process or loaded from durable artifacts. Hot-loop lookups are O(1).
//!
//! 2. **Determinized search**: the unseen deck is hidden information. The
//!    engine samples many independent reshuffles and runs one MCTS per
//!    sample, then votes across samples.
//!
//! 3. **No shared mutable state**: each search task owns its cloned state
//!    and tree; tasks share only the tables, read-only.
//!
//! ## Modules
//!
//! - `cards`: suits, ranks, identities, subset masks, the draw pile
//! - `combo`: classification of 1-5 cards into a named, scored combo
//! - `cache`: precomputed action lists and damage tables, with persistence
//! - `game`: combat state, actions, and turn transitions
//! - `mcts`: parallel determinized search and final action selection
//! - `rng`: deterministic seeded randomness with indexed forking
//!
//! ## Usage
//!
//! ```no_run
//! use demonhand::cache::{ActionSpace, ComboTables};
//! use demonhand::game::GameState;
//! use demonhand::mcts::{recommend, SearchConfig};
//! use demonhand::rng::GameRng;
//!
//! let tables = ComboTables::load_or_build(std::path::Path::new("data"));
//! let actions = ActionSpace::new();
//! let mut rng = GameRng::new(42);
//!
//! let state = GameState::new(&mut rng);
//! if let Some(rec) = recommend(&state, &tables, &actions, &SearchConfig::default()) {
//!     println!("{} (expected value {:.1})", rec.action, rec.expected_value);
//! }
//! ```

pub mod cache;
pub mod cards;
pub mod combo;
pub mod game;
pub mod mcts;
pub mod rng;

// Re-export commonly used types
pub use crate::cache::{ActionSpace, ComboTables, StoreError, TableStore};
pub use crate::cards::{Card, CardId, Deck, Hand, Rank, Suit};
pub use crate::combo::{classify, Combo, ComboKind};
pub use crate::game::{Action, GameState};
pub use crate::mcts::{recommend, Recommendation, SearchConfig, SearchStats};
pub use crate::rng::GameRng;
