//! Ordered card collection shared by hands, the deck, and the discard pile.
//!
//! Order is insertion-significant only for top-of-pile draw/peek: the "top"
//! is the end of the backing vector. Cards move between piles by value, so a
//! card id can never live in two places at once.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::cards::{Card, CardId, CardKind};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Clone, Default)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Add a card on top.
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Remove and return the top `n` cards, most-recently-added first.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, DomainError> {
        if n > self.cards.len() {
            return Err(DomainError::validation(
                ValidationKind::InsufficientCards,
                format!("cannot draw {n} cards from a pile of {}", self.cards.len()),
            ));
        }
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            // len checked above
            if let Some(card) = self.cards.pop() {
                drawn.push(card);
            }
        }
        Ok(drawn)
    }

    pub fn draw_one(&mut self) -> Result<Card, DomainError> {
        self.cards.pop().ok_or_else(|| {
            DomainError::validation(
                ValidationKind::InsufficientCards,
                "cannot draw from an empty pile",
            )
        })
    }

    /// Top `min(n, len)` cards without removal, most-recently-added first.
    pub fn peek(&self, n: usize) -> Vec<Card> {
        self.cards.iter().rev().take(n).copied().collect()
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn contains_id(&self, id: CardId) -> bool {
        self.cards.iter().any(|c| c.id == id)
    }

    /// Remove a specific card by identity.
    pub fn remove_by_id(&mut self, id: CardId) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.id == id)?;
        Some(self.cards.remove(pos))
    }

    /// Remove the first card of the given kind, bottom-up.
    pub fn remove_first_of_kind(&mut self, kind: CardKind) -> Option<Card> {
        let pos = self.cards.iter().position(|c| c.kind == kind)?;
        Some(self.cards.remove(pos))
    }

    /// Remove one uniformly-random card.
    pub fn remove_random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Card> {
        if self.cards.is_empty() {
            return None;
        }
        let pos = rng.random_range(0..self.cards.len());
        Some(self.cards.remove(pos))
    }

    pub fn count_of_kind(&self, kind: CardKind) -> usize {
        self.cards.iter().filter(|c| c.kind == kind).count()
    }

    pub fn has_kind(&self, kind: CardKind) -> bool {
        self.cards.iter().any(|c| c.kind == kind)
    }
}

impl FromIterator<Card> for Pile {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}
