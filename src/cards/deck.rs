//! Draw pile over card identities with automatic reshuffle.
//!
//! The pile owns no `Card` objects, only identities; critical flags are
//! sampled when a card is drawn. Underflow is never an error: the pile is
//! rebuilt from the full universe minus the cards known to be in play.

use serde::{Deserialize, Serialize};

use super::card::{Card, CardId, DECK_SIZE};
use super::Hand;
use crate::rng::GameRng;

/// Probability that a freshly drawn card is critical.
const CRITICAL_CHANCE: f64 = 0.03;

/// The engine's model of the unseen draw pile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Deck {
    pile: im::Vector<CardId>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::full()
    }
}

impl Deck {
    /// Full 52-identity pile in identity order (unshuffled).
    #[must_use]
    pub fn full() -> Self {
        Self {
            pile: (0..DECK_SIZE as CardId).collect(),
        }
    }

    /// Full pile, shuffled.
    #[must_use]
    pub fn shuffled(rng: &mut GameRng) -> Self {
        let mut deck = Self::full();
        deck.shuffle(rng);
        deck
    }

    /// Pile built from an explicit identity list (top of pile is the back).
    #[must_use]
    pub fn from_ids(ids: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            pile: ids.into_iter().collect(),
        }
    }

    /// Number of identities remaining in the pile.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pile.len()
    }

    /// Whether the pile is exhausted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }

    /// Whether the pile still contains the given identity.
    #[must_use]
    pub fn contains(&self, id: CardId) -> bool {
        self.pile.contains(&id)
    }

    /// Uniformly permute the pile.
    pub fn shuffle(&mut self, rng: &mut GameRng) {
        let mut ids: Vec<CardId> = self.pile.iter().copied().collect();
        rng.shuffle(&mut ids);
        self.pile = ids.into_iter().collect();
    }

    /// Rebuild the pile as the full universe minus `hand`, then shuffle.
    pub fn reset(&mut self, hand: &Hand, rng: &mut GameRng) {
        let excluded = hand_mask(hand);
        self.pile = (0..DECK_SIZE as CardId)
            .filter(|id| excluded & (1 << id) == 0)
            .collect();
        self.shuffle(rng);
    }

    /// Draw `n` cards, sampling each critical flag at 3%.
    ///
    /// If the pile underflows mid-draw it is rebuilt from the universe minus
    /// `hand` and the cards already drawn by this call, reshuffled, and the
    /// draw continues.
    pub fn draw(&mut self, n: usize, hand: &Hand, rng: &mut GameRng) -> Vec<Card> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            if self.pile.is_empty() {
                self.rebuild_excluding(hand, &drawn, rng);
            }
            // Rebuild always leaves at least one identity: hand + drawn < 52.
            let id = self.pile.pop_back().unwrap_or_default();
            drawn.push(Card::from_id(id, rng.gen_bool(CRITICAL_CHANCE)));
        }
        drawn
    }

    /// Synchronize with an externally observed hand by removing its
    /// identities from the pile. Rebuilds and reshuffles if that empties it.
    pub fn remove_observed(&mut self, hand: &Hand, rng: &mut GameRng) {
        let observed = hand_mask(hand);
        self.pile.retain(|id| observed & (1 << id) == 0);
        if self.pile.is_empty() {
            self.reset(hand, rng);
        }
    }

    fn rebuild_excluding(&mut self, hand: &Hand, drawn: &[Card], rng: &mut GameRng) {
        let excluded = hand_mask(hand) | crate::cards::subset_mask(drawn);
        self.pile = (0..DECK_SIZE as CardId)
            .filter(|id| excluded & (1 << id) == 0)
            .collect();
        self.shuffle(rng);
    }
}

fn hand_mask(hand: &Hand) -> u64 {
    hand.iter().fold(0u64, |mask, card| mask | (1 << card.id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn hand_of(ids: &[CardId]) -> Hand {
        ids.iter().map(|&id| Card::from_id(id, false)).collect()
    }

    #[test]
    fn test_full_deck() {
        let deck = Deck::full();
        assert_eq!(deck.len(), DECK_SIZE);
        for id in 0..DECK_SIZE as CardId {
            assert!(deck.contains(id));
        }
    }

    #[test]
    fn test_draw_excludes_nothing_twice() {
        let mut rng = GameRng::new(7);
        let mut deck = Deck::shuffled(&mut rng);

        let drawn = deck.draw(8, &Hand::new(), &mut rng);
        assert_eq!(drawn.len(), 8);
        assert_eq!(deck.len(), DECK_SIZE - 8);

        let mut ids: Vec<CardId> = drawn.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8, "no duplicate identities in one draw");

        for card in &drawn {
            assert!(!deck.contains(card.id()));
        }
    }

    #[test]
    fn test_draw_underflow_reshuffles() {
        let mut rng = GameRng::new(7);
        let hand = hand_of(&[0, 1, 2]);
        // Pile with a single identity; drawing 4 must trigger a rebuild that
        // excludes the hand and the already-drawn card.
        let mut deck = Deck::from_ids([51]);

        let drawn = deck.draw(4, &hand, &mut rng);
        assert_eq!(drawn.len(), 4);

        for card in &drawn {
            assert!(
                !hand.iter().any(|h| h.id() == card.id()),
                "drew {card} already held in hand"
            );
        }
        let mut ids: Vec<CardId> = drawn.iter().map(|c| c.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_remove_observed() {
        let mut rng = GameRng::new(7);
        let mut deck = Deck::full();
        let hand = hand_of(&[0, 13, 26, 39]);

        deck.remove_observed(&hand, &mut rng);

        assert_eq!(deck.len(), DECK_SIZE - 4);
        for card in &hand {
            assert!(!deck.contains(card.id()));
        }
    }

    #[test]
    fn test_remove_observed_reshuffles_when_emptied() {
        let mut rng = GameRng::new(7);
        let mut deck = Deck::from_ids([5, 6]);
        let hand = hand_of(&[5, 6]);

        deck.remove_observed(&hand, &mut rng);

        // Rebuilt from the universe minus the observed hand.
        assert_eq!(deck.len(), DECK_SIZE - 2);
        assert!(!deck.contains(5));
        assert!(!deck.contains(6));
    }

    #[test]
    fn test_reset_excludes_hand() {
        let mut rng = GameRng::new(7);
        let mut deck = Deck::full();
        let hand: Hand = [
            Card::new(Suit::Moon, Rank::Two, false),
            Card::new(Suit::Stone, Rank::PrimeZero, true),
        ]
        .into_iter()
        .collect();

        deck.reset(&hand, &mut rng);

        assert_eq!(deck.len(), DECK_SIZE - 2);
        for card in &hand {
            assert!(!deck.contains(card.id()));
        }
    }

    #[test]
    fn test_shuffle_is_seed_deterministic() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);
        let mut deck1 = Deck::full();
        let mut deck2 = Deck::full();

        deck1.shuffle(&mut rng1);
        deck2.shuffle(&mut rng2);

        let ids1: Vec<CardId> = deck1.draw(52, &Hand::new(), &mut rng1).iter().map(|c| c.id()).collect();
        let ids2: Vec<CardId> = deck2.draw(52, &Hand::new(), &mut rng2).iter().map(|c| c.id()).collect();
        assert_eq!(ids1, ids2);
    }
}
