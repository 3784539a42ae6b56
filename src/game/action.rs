//! Player actions over hand positions.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Distinct hand-position indices for one action, stored in descending order
/// so removal never shifts a later index. At most 5 cards per play.
pub type CardIndices = SmallVec<[u8; 5]>;

/// A playable action: attack with a card subset, or discard one.
///
/// Structural equality doubles as the canonical cross-worker key: the same
/// index subset selected in two different determinizations merges into one
/// aggregate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Attack(CardIndices),
    Discard(CardIndices),
}

impl Action {
    /// The hand positions this action plays or discards.
    #[must_use]
    pub fn indices(&self) -> &[u8] {
        match self {
            Action::Attack(indices) | Action::Discard(indices) => indices,
        }
    }

    /// Whether this is a discard action.
    #[must_use]
    pub fn is_discard(&self) -> bool {
        matches!(self, Action::Discard(_))
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Attack(indices) => write!(f, "Attack using indices {indices:?}"),
            Action::Discard(indices) => write!(f, "Discard using indices {indices:?}"),
        }
    }
}
