//! Per-hand-size action lists.
//!
//! Attack and discard actions over a hand are index subsets of size 1..=5.
//! The same subset list serves both action types, so only one list per hand
//! size is materialized. Subset indices are stored in descending order so
//! that removing them from a hand never shifts a later index.

use crate::game::action::CardIndices;

/// Maximum hand size supported by the action lists. Hands start at 8; manual
/// editing contexts may grow them to 10.
pub const MAX_HAND_SIZE: usize = 10;

/// Most cards playable in a single action.
const MAX_PLAY: usize = 5;

/// Precomputed index subsets for every hand size, built once and shared.
#[derive(Clone, Debug)]
pub struct ActionSpace {
    // per_hand[n] holds the subsets for a hand of n cards; [0] stays empty.
    per_hand: Vec<Vec<CardIndices>>,
}

impl Default for ActionSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionSpace {
    /// Build subset lists for every hand size up to [`MAX_HAND_SIZE`].
    #[must_use]
    pub fn new() -> Self {
        let per_hand = (0..=MAX_HAND_SIZE).map(index_subsets).collect();
        Self { per_hand }
    }

    /// All nonempty index subsets (size <= 5) for a hand of `hand_len` cards,
    /// ordered by subset size then lexicographically.
    #[must_use]
    pub fn subsets(&self, hand_len: usize) -> &[CardIndices] {
        self.per_hand
            .get(hand_len)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of attack actions for a hand of `hand_len` cards.
    #[must_use]
    pub fn attack_count(&self, hand_len: usize) -> usize {
        self.subsets(hand_len).len()
    }

    /// Total legal actions: attacks, plus the discard mirror of the same
    /// list while discards remain.
    #[must_use]
    pub fn legal_action_count(&self, hand_len: usize, discards_left: u32) -> usize {
        let attacks = self.attack_count(hand_len);
        if discards_left > 0 {
            attacks * 2
        } else {
            attacks
        }
    }
}

/// All subsets of `0..n` with 1..=min(5, n) elements, sizes ascending,
/// lexicographic within a size, each subset's indices descending.
fn index_subsets(n: usize) -> Vec<CardIndices> {
    let mut out = Vec::new();
    for r in 1..=MAX_PLAY.min(n) {
        for_each_combination(n, r, |combo| {
            out.push(combo.iter().rev().copied().collect());
        });
    }
    out
}

/// Visit every r-combination of `0..n` in lexicographic order.
pub(crate) fn for_each_combination(n: usize, r: usize, mut visit: impl FnMut(&[u8])) {
    debug_assert!(r >= 1 && r <= n);
    let mut combo: Vec<u8> = (0..r as u8).collect();
    loop {
        visit(&combo);
        // Advance the rightmost index that still has room.
        let mut i = r;
        loop {
            if i == 0 {
                return;
            }
            i -= 1;
            if (combo[i] as usize) < n - (r - i) {
                combo[i] += 1;
                for j in i + 1..r {
                    combo[j] = combo[j - 1] + 1;
                }
                break;
            }
        }
    }
}
