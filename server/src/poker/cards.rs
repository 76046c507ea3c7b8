//! Deck construction, shuffling and dealing.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use holdem_shared::{Card, GameError, Rank, Suit};

/// An ordered deck of cards; dealing pops from the front.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: VecDeque<Card>,
}

impl Deck {
    /// The 52 cards in canonical order (suit-major, ranks ascending).
    pub fn standard() -> Self {
        let mut cards = VecDeque::with_capacity(52);
        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                cards.push_back(Card::new(rank, suit));
            }
        }
        Deck { cards }
    }

    /// A fresh deck shuffled with the provided RNG. Production callers pass
    /// `rand::rng()` (a CSPRNG); tests inject a seeded generator.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = Self::standard().cards.into();
        cards.shuffle(rng);
        Deck {
            cards: cards.into(),
        }
    }

    /// Deterministic deck for tests.
    pub fn shuffled_with_seed(seed: u64) -> Self {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        Self::shuffled(&mut rng)
    }

    /// Build a deck with an explicit card order (dealt front-first).
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Deck {
            cards: cards.into(),
        }
    }

    /// Deal one card from the top.
    pub fn deal(&mut self) -> Result<Card, GameError> {
        self.cards.pop_front().ok_or(GameError::InsufficientCards)
    }

    /// Discard one card from the top.
    pub fn burn(&mut self) -> Result<(), GameError> {
        self.deal().map(|_| ())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
