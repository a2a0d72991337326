//! The minting deck: card identity generation, standard composition, bomb
//! injection, and defused-bomb return.

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::cards::{Card, CardId, CardKind};
use crate::domain::pile::Pile;
use crate::errors::domain::{ConflictKind, DomainError};

/// Seats a session may hold.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone)]
pub struct Deck {
    pile: Pile,
    next_id: CardId,
    minted: u64,
}

impl Deck {
    fn empty() -> Self {
        Self {
            pile: Pile::new(),
            next_id: 0,
            minted: 0,
        }
    }

    fn mint(&mut self, kind: CardKind) -> Card {
        let card = Card {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;
        self.minted += 1;
        card
    }

    /// Build a standard deck and deal the initial hands.
    ///
    /// Setup order matters and mirrors the table ritual: mint the non-bomb
    /// cards and shuffle, deal `hand_size` to each seat, put one fresh
    /// Deactivate on top of every dealt hand, then inject `players - 1`
    /// bombs and reshuffle.
    pub fn standard<R: Rng + ?Sized>(
        config: &GameConfig,
        players: usize,
        rng: &mut R,
    ) -> Result<(Self, Vec<Pile>), DomainError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(DomainError::conflict(
                ConflictKind::TooFewPlayers,
                format!("a session seats {MIN_PLAYERS}-{MAX_PLAYERS} players, got {players}"),
            ));
        }

        let mut deck = Self::empty();
        for &(kind, count) in &config.deck_counts {
            for _ in 0..count {
                let card = deck.mint(kind);
                deck.pile.push(card);
            }
        }
        for _ in 0..config.spare_deactivates {
            let card = deck.mint(CardKind::Deactivate);
            deck.pile.push(card);
        }
        deck.pile.shuffle(rng);

        let needed = players * config.hand_size;
        if needed > deck.pile.len() {
            return Err(DomainError::infra(format!(
                "deck composition too small: need {needed} cards for initial hands, have {}",
                deck.pile.len()
            )));
        }

        let mut hands = Vec::with_capacity(players);
        for _ in 0..players {
            let dealt = deck.pile.draw(config.hand_size)?;
            let mut hand: Pile = dealt.into_iter().collect();
            let deactivate = deck.mint(CardKind::Deactivate);
            hand.push(deactivate);
            hands.push(hand);
        }

        deck.add_bombs(players - 1, rng);

        Ok((deck, hands))
    }

    /// Mint `k` Bomb cards into the deck and reshuffle.
    pub fn add_bombs<R: Rng + ?Sized>(&mut self, k: usize, rng: &mut R) {
        for _ in 0..k {
            let bomb = self.mint(CardKind::Bomb);
            self.pile.push(bomb);
        }
        self.pile.shuffle(rng);
    }

    /// Return a defused bomb to the deck and reshuffle.
    pub fn add_back_and_shuffle<R: Rng + ?Sized>(&mut self, card: Card, rng: &mut R) {
        self.pile.push(card);
        self.pile.shuffle(rng);
    }

    pub fn draw_one(&mut self) -> Result<Card, DomainError> {
        self.pile.draw_one()
    }

    /// Top `min(n, len)` cards, most-recent-first, without removal.
    pub fn peek(&self, n: usize) -> Vec<Card> {
        self.pile.peek(n)
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.pile.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.pile.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pile.is_empty()
    }

    /// Total cards this deck has ever created.
    pub fn minted(&self) -> u64 {
        self.minted
    }
}
