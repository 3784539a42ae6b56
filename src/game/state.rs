//! Combat state and transitions.
//!
//! A `GameState` is exclusively owned by one simulation branch. `Clone` is a
//! deep copy as far as mutation is concerned: hand and deck use persistent
//! vectors, so a clone shares structure but never observes the source's
//! later mutations.

use serde::{Deserialize, Serialize};

use super::action::Action;
use crate::cache::ComboTables;
use crate::cards::{Card, Deck, Hand};
use crate::rng::GameRng;

/// Cards dealt to a fresh hand.
pub const STARTING_HAND_SIZE: usize = 8;

/// Reward when the player is defeated.
const DEFEAT_REWARD: f64 = -1000.0;

/// Mutable per-simulation snapshot of one combat.
///
/// Fields are public: the presentation layer constructs states directly from
/// observed counters, and the engine trusts them as preconditions (no
/// re-validation of hand contents or counter signs).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub player_health: f64,
    pub enemy_health: f64,
    pub enemy_attack_power: f64,
    pub enemy_attack_counter: i32,
    pub enemy_base_counter: i32,
    pub discard_count: u32,
    pub deck: Deck,
    pub hand: Hand,
}

impl GameState {
    /// Fresh combat with default counters and a shuffled deal of 8.
    #[must_use]
    pub fn new(rng: &mut GameRng) -> Self {
        let mut deck = Deck::shuffled(rng);
        let hand: Hand = deck.draw(STARTING_HAND_SIZE, &Hand::new(), rng).into_iter().collect();
        Self {
            player_health: 100.0,
            enemy_health: 100.0,
            enemy_attack_power: 10.0,
            enemy_attack_counter: 3,
            enemy_base_counter: 3,
            discard_count: 3,
            deck,
            hand,
        }
    }

    /// Fresh combat seeded from an externally observed hand.
    ///
    /// The deck is rebuilt as the universe minus the observed identities.
    #[must_use]
    pub fn with_observed_hand(hand: Hand, rng: &mut GameRng) -> Self {
        let mut state = Self::new(rng);
        state.observe_hand(hand, rng);
        state
    }

    /// Replace the hand with an externally observed one at combat start.
    ///
    /// Discards all prior deck knowledge: the pile becomes the shuffled
    /// universe minus the observed hand. For a resync mid-combat use
    /// [`Self::sync_observed_hand`], which keeps tracking cards that have
    /// already left play.
    pub fn observe_hand(&mut self, hand: Hand, rng: &mut GameRng) {
        self.deck.reset(&hand, rng);
        self.hand = hand;
    }

    /// Adopt an externally observed hand mid-combat.
    ///
    /// Only the observed identities are pulled from the pile, so cards that
    /// departed in earlier turns stay excluded from future draws.
    pub fn sync_observed_hand(&mut self, hand: Hand, rng: &mut GameRng) {
        self.deck.remove_observed(&hand, rng);
        self.hand = hand;
    }

    /// Terminal iff either side is at or below zero health.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.enemy_health <= 0.0 || self.player_health <= 0.0
    }

    /// Terminal reward: remaining player health on a win, -1000 on a loss,
    /// 0 while the combat is still active. Enemy defeat is checked first.
    #[must_use]
    pub fn reward(&self) -> f64 {
        if self.enemy_health <= 0.0 {
            self.player_health
        } else if self.player_health <= 0.0 {
            DEFEAT_REWARD
        } else {
            0.0
        }
    }

    /// Cards at the given hand positions.
    #[must_use]
    pub fn cards_at(&self, indices: &[u8]) -> Vec<Card> {
        indices.iter().map(|&i| self.hand[i as usize]).collect()
    }

    /// Attack with the cards at `indices`. Returns the damage dealt.
    ///
    /// Damage is the best-attack table value for the played subset, scaled by
    /// critical cards. The played cards are replaced 1:1 from the deck, the
    /// enemy counter ticks down, and the turn ends.
    pub fn apply_attack(&mut self, indices: &[u8], tables: &ComboTables, rng: &mut GameRng) -> f64 {
        let damage = tables.best_attack_damage(&self.cards_at(indices));
        self.enemy_health -= damage;
        self.remove_and_refill(indices, rng);
        self.enemy_attack_counter -= 1;
        self.end_turn(rng);
        damage
    }

    /// Discard the cards at `indices`, drawing replacements.
    ///
    /// Returns `false` without touching the state when no discards remain;
    /// callers must check the status.
    #[must_use]
    pub fn apply_discard(&mut self, indices: &[u8], rng: &mut GameRng) -> bool {
        if self.discard_count == 0 {
            return false;
        }
        self.remove_and_refill(indices, rng);
        self.discard_count -= 1;
        self.end_turn(rng);
        true
    }

    /// Dispatch an [`Action`] to the matching transition.
    pub fn apply(&mut self, action: &Action, tables: &ComboTables, rng: &mut GameRng) {
        match action {
            Action::Attack(indices) => {
                self.apply_attack(indices, tables, rng);
            }
            Action::Discard(indices) => {
                let _ = self.apply_discard(indices, rng);
            }
        }
    }

    /// Close out the turn: reshuffle an exhausted deck, then let the enemy
    /// retaliate if it is still alive and its counter has run out.
    pub fn end_turn(&mut self, rng: &mut GameRng) {
        if self.deck.is_empty() {
            self.deck.reset(&self.hand, rng);
        }
        if self.enemy_health <= 0.0 {
            return;
        }
        if self.enemy_attack_counter <= 0 {
            self.player_health -= self.enemy_attack_power;
            self.enemy_attack_counter = self.enemy_base_counter;
        }
    }

    /// Remove hand positions in descending order and draw replacements,
    /// preserving hand length exactly.
    fn remove_and_refill(&mut self, indices: &[u8], rng: &mut GameRng) {
        let mut order: Vec<u8> = indices.to_vec();
        order.sort_unstable_by(|a, b| b.cmp(a));
        for idx in order {
            self.hand.remove(idx as usize);
        }
        let drawn = self.deck.draw(indices.len(), &self.hand, rng);
        self.hand.extend(drawn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::tables;
    use crate::cards::{Rank, Suit};

    fn fixed_state(rng: &mut GameRng) -> GameState {
        GameState::new(rng)
    }

    fn hand_of(cards: &[(Suit, Rank)]) -> Hand {
        cards.iter().map(|&(s, r)| Card::new(s, r, false)).collect()
    }

    #[test]
    fn test_attack_preserves_hand_length() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        let before = state.hand.len();

        state.apply_attack(&[4, 2, 0], tables(), &mut rng);

        assert_eq!(state.hand.len(), before);
    }

    #[test]
    fn test_discard_preserves_hand_length() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        let before = state.hand.len();

        assert!(state.apply_discard(&[7, 3], &mut rng));

        assert_eq!(state.hand.len(), before);
        assert_eq!(state.discard_count, 2);
    }

    #[test]
    fn test_discard_exhausted_is_reported_noop() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        state.discard_count = 0;
        let hand_before = state.hand.clone();

        assert!(!state.apply_discard(&[0], &mut rng));

        assert_eq!(state.hand, hand_before);
        assert_eq!(state.discard_count, 0);
    }

    #[test]
    fn test_attack_ticks_enemy_counter_and_retaliation() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        state.enemy_attack_counter = 1;
        state.enemy_base_counter = 3;
        state.enemy_attack_power = 10.0;
        let health_before = state.player_health;

        state.apply_attack(&[0], tables(), &mut rng);

        // Counter hit zero during the attack, so the enemy struck back and
        // the counter reset.
        assert_eq!(state.player_health, health_before - 10.0);
        assert_eq!(state.enemy_attack_counter, 3);
    }

    #[test]
    fn test_no_retaliation_after_enemy_defeat() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        state.enemy_health = 1.0;
        state.enemy_attack_counter = 1;
        let health_before = state.player_health;

        state.apply_attack(&[0], tables(), &mut rng);

        assert!(state.enemy_health <= 0.0);
        assert_eq!(state.player_health, health_before);
        assert!(state.is_terminal());
        assert_eq!(state.reward(), state.player_health);
    }

    #[test]
    fn test_dyad_lethal_end_to_end() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        state.enemy_health = 10.0;
        state.observe_hand(
            hand_of(&[
                (Suit::Moon, Rank::Two),
                (Suit::Fire, Rank::Two),
                (Suit::Sun, Rank::Five),
                (Suit::Stone, Rank::Seven),
                (Suit::Moon, Rank::Nine),
                (Suit::Fire, Rank::CommandOne),
                (Suit::Sun, Rank::CommandThree),
                (Suit::Stone, Rank::Four),
            ]),
            &mut rng,
        );

        // Two 2s classify as a Dyad: base 20 + values 4 = 24 damage.
        let damage = state.apply_attack(&[1, 0], tables(), &mut rng);

        assert_eq!(damage, 24.0);
        assert!(state.enemy_health <= 0.0);
        assert!(state.is_terminal());
        assert_eq!(state.reward(), state.player_health);
    }

    #[test]
    fn test_sync_observed_hand_keeps_departed_cards_out() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        // A pile that already lost identities 0..=2 to earlier turns.
        state.deck = Deck::from_ids(3u8..10);

        // Moon 5 and Moon 6 are identities 3 and 4.
        state.sync_observed_hand(
            hand_of(&[(Suit::Moon, Rank::Five), (Suit::Moon, Rank::Six)]),
            &mut rng,
        );

        assert_eq!(state.hand.len(), 2);
        assert_eq!(state.deck.len(), 5);
        assert!(!state.deck.contains(3));
        assert!(!state.deck.contains(4));
        // Earlier departures are still excluded, unlike a full reset.
        assert!(!state.deck.contains(0));
    }

    #[test]
    fn test_loss_reward() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        state.player_health = -5.0;

        assert!(state.is_terminal());
        assert_eq!(state.reward(), -1000.0);
    }

    #[test]
    fn test_clone_is_isolated() {
        let mut rng = GameRng::new(11);
        let original = fixed_state(&mut rng);
        let snapshot_hand = original.hand.clone();
        let snapshot_deck_len = original.deck.len();

        let mut cloned = original.clone();
        cloned.apply_attack(&[3, 1], tables(), &mut rng);
        let _ = cloned.apply_discard(&[0], &mut rng);

        assert_eq!(original.hand, snapshot_hand);
        assert_eq!(original.deck.len(), snapshot_deck_len);
    }

    #[test]
    fn test_end_turn_reshuffles_empty_deck() {
        let mut rng = GameRng::new(11);
        let mut state = fixed_state(&mut rng);
        state.deck = Deck::from_ids([]);

        state.end_turn(&mut rng);

        assert_eq!(state.deck.len(), crate::cards::DECK_SIZE - state.hand.len());
    }
}
