//! Card identities and the draw pile.
//!
//! Cards live in a fixed 52-symbol universe (4 suits x 13 ranks). A card's
//! identity is `suit_index * 13 + rank_index`; the critical flag is sampled
//! at draw time and is never part of identity. Subsets of the universe are
//! represented as 52-bit masks for O(1) damage lookups.

pub mod card;
pub mod deck;

pub use card::{subset_mask, Card, CardId, Rank, Suit, DECK_SIZE, NUM_RANKS, NUM_SUITS};
pub use deck::Deck;

/// An ordered hand of cards.
///
/// `im::Vector` gives O(1) structural-sharing clones, which matters because
/// every MCTS expansion and rollout clones the full game state.
pub type Hand = im::Vector<Card>;
