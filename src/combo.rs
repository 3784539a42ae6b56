//! Combo classification for 1-5 played cards.
//!
//! `classify` is a pure function of the card multiset: predicates are tested
//! in strict priority order and the first match wins, so a hand that is both
//! sequential and single-suited still scores as the higher combo.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, NUM_RANKS};

/// Named combo classifications, highest priority first within each size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComboKind {
    /// 10, command-1..3, prime-0, all one suit.
    DemonsHand,
    /// Five consecutive ranks, one suit.
    MarchingHorde,
    /// Five cards of one suit.
    Horde,
    /// Five consecutive ranks.
    March,
    /// A triple and a pair.
    GrandWarhost,
    /// Two distinct pairs.
    DyadSet,
    /// Four of a rank.
    Tetrad,
    /// Three of a rank.
    Triad,
    /// Two of a rank.
    Dyad,
    /// Fallback: the single best card carries the play.
    Solo,
}

impl ComboKind {
    /// Display name of the combo.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ComboKind::DemonsHand => "The Demon's Hand",
            ComboKind::MarchingHorde => "Marching Horde",
            ComboKind::Horde => "Horde",
            ComboKind::March => "March",
            ComboKind::GrandWarhost => "Grand Warhost",
            ComboKind::DyadSet => "Dyad Set",
            ComboKind::Tetrad => "Tetrad",
            ComboKind::Triad => "Triad",
            ComboKind::Dyad => "Dyad",
            ComboKind::Solo => "Solo",
        }
    }

    /// Base score of the combo before card-value bonuses.
    #[must_use]
    pub fn base(self) -> u32 {
        match self {
            ComboKind::DemonsHand => 2000,
            ComboKind::MarchingHorde => 600,
            ComboKind::Horde => 125,
            ComboKind::March => 100,
            ComboKind::GrandWarhost => 175,
            ComboKind::DyadSet => 40,
            ComboKind::Tetrad => 400,
            ComboKind::Triad => 80,
            ComboKind::Dyad => 20,
            ComboKind::Solo => 10,
        }
    }
}

/// A classified play: kind plus base and bonus scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    pub kind: ComboKind,
    pub base: u32,
    pub bonus: u32,
}

impl Combo {
    /// Total damage contribution before critical multipliers.
    #[must_use]
    pub fn total(self) -> u32 {
        self.base + self.bonus
    }
}

/// Classify 1-5 cards into a combo. Order-independent in its input.
///
/// Every combo except `Solo` takes the sum of card values as its bonus;
/// `Solo` takes only the highest single card value.
#[must_use]
pub fn classify(cards: &[Card]) -> Combo {
    debug_assert!(!cards.is_empty() && cards.len() <= 5);

    let kind = match cards.len() {
        5 if is_demons_hand(cards) => ComboKind::DemonsHand,
        5 if is_sequential(cards) && all_same_suit(cards) => ComboKind::MarchingHorde,
        5 if all_same_suit(cards) => ComboKind::Horde,
        5 if is_sequential(cards) => ComboKind::March,
        5 if rank_count_profile(cards) == [2, 3] => ComboKind::GrandWarhost,
        4 if rank_count_profile(cards) == [2, 2] => ComboKind::DyadSet,
        4 if all_same_rank(cards) => ComboKind::Tetrad,
        3 if all_same_rank(cards) => ComboKind::Triad,
        2 if all_same_rank(cards) => ComboKind::Dyad,
        _ => ComboKind::Solo,
    };

    let bonus = if kind == ComboKind::Solo {
        cards.iter().map(|c| c.value()).max().unwrap_or(0)
    } else {
        cards.iter().map(|c| c.value()).sum()
    };

    Combo {
        kind,
        base: kind.base(),
        bonus,
    }
}

fn all_same_rank(cards: &[Card]) -> bool {
    cards.iter().all(|c| c.rank == cards[0].rank)
}

fn all_same_suit(cards: &[Card]) -> bool {
    cards.iter().all(|c| c.suit == cards[0].suit)
}

/// Sorted rank indices form a contiguous run with no repeats.
fn is_sequential(cards: &[Card]) -> bool {
    let mut indices: Vec<usize> = cards.iter().map(|c| c.rank.index()).collect();
    indices.sort_unstable();
    indices.windows(2).all(|w| w[0] + 1 == w[1])
}

fn is_demons_hand(cards: &[Card]) -> bool {
    const REQUIRED: [Rank; 5] = [
        Rank::Ten,
        Rank::CommandOne,
        Rank::CommandTwo,
        Rank::CommandThree,
        Rank::PrimeZero,
    ];
    let mut ranks: Vec<Rank> = cards.iter().map(|c| c.rank).collect();
    ranks.sort_unstable();
    ranks == REQUIRED && all_same_suit(cards)
}

/// Sorted multiset of per-rank counts, e.g. [2, 3] for a full-house shape.
fn rank_count_profile(cards: &[Card]) -> Vec<usize> {
    let mut counts = [0usize; NUM_RANKS];
    for card in cards {
        counts[card.rank.index()] += 1;
    }
    let mut profile: Vec<usize> = counts.iter().copied().filter(|&c| c > 0).collect();
    profile.sort_unstable();
    profile
}
