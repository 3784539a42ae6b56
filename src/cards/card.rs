//! Card types: suits, ranks, identities, values, subset masks.

use serde::{Deserialize, Serialize};

/// Number of suits in the universe.
pub const NUM_SUITS: usize = 4;

/// Number of ranks per suit.
pub const NUM_RANKS: usize = 13;

/// Total card identities (4 suits x 13 ranks).
pub const DECK_SIZE: usize = NUM_SUITS * NUM_RANKS;

/// A card identity in `[0, 52)`: `suit_index * 13 + rank_index`.
pub type CardId = u8;

/// One of the four suit symbols.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Moon,
    Fire,
    Sun,
    Stone,
}

impl Suit {
    /// All suits in identity order.
    pub const ALL: [Suit; NUM_SUITS] = [Suit::Moon, Suit::Fire, Suit::Sun, Suit::Stone];

    /// Index of this suit in `[0, 4)`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name of the suit.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Suit::Moon => "Moon",
            Suit::Fire => "Fire",
            Suit::Sun => "Sun",
            Suit::Stone => "Stone",
        }
    }
}

/// One of the thirteen ordered ranks.
///
/// `Two` through `Ten` are the numeric ranks; the three command ranks and the
/// single prime rank sit above them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    CommandOne,
    CommandTwo,
    CommandThree,
    PrimeZero,
}

impl Rank {
    /// All ranks in ascending order.
    pub const ALL: [Rank; NUM_RANKS] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::CommandOne,
        Rank::CommandTwo,
        Rank::CommandThree,
        Rank::PrimeZero,
    ];

    /// Index of this rank in `[0, 13)`.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Display name of the rank.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::CommandOne => "command-1",
            Rank::CommandTwo => "command-2",
            Rank::CommandThree => "command-3",
            Rank::PrimeZero => "prime-0",
        }
    }
}

/// A single card: suit, rank, and a critical flag.
///
/// Two cards with the same suit and rank are interchangeable for combo and
/// damage-table purposes; the critical flag only scales damage at play time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    pub critical: bool,
}

impl Card {
    /// Create a card from its suit, rank, and critical flag.
    #[must_use]
    pub fn new(suit: Suit, rank: Rank, critical: bool) -> Self {
        Self { suit, rank, critical }
    }

    /// Reconstruct a card from its identity.
    ///
    /// # Panics
    ///
    /// Panics if `id >= 52`.
    #[must_use]
    pub fn from_id(id: CardId, critical: bool) -> Self {
        assert!((id as usize) < DECK_SIZE, "card id out of range: {id}");
        Self {
            suit: Suit::ALL[id as usize / NUM_RANKS],
            rank: Rank::ALL[id as usize % NUM_RANKS],
            critical,
        }
    }

    /// Identity of this card in `[0, 52)`. Ignores the critical flag.
    #[must_use]
    pub fn id(self) -> CardId {
        (self.suit.index() * NUM_RANKS + self.rank.index()) as CardId
    }

    /// Combat value of this card: 11 for the prime rank, otherwise
    /// `min(rank_index + 2, 10)`.
    #[must_use]
    pub fn value(self) -> u32 {
        let r = self.rank.index() as u32;
        if r == NUM_RANKS as u32 - 1 {
            11
        } else {
            (r + 2).min(10)
        }
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {}", self.rank.name(), self.suit.name())?;
        if self.critical {
            write!(f, " (Critical)")?;
        }
        Ok(())
    }
}

/// 52-bit mask identifying a subset of card identities.
///
/// Critical flags do not participate; a play of critical cards keys into the
/// same mask as the non-critical play.
#[must_use]
pub fn subset_mask(cards: &[Card]) -> u64 {
    cards.iter().fold(0u64, |mask, card| mask | (1 << card.id()))
}
