//! Session state container: seats, deck, discard, and turn math.
//!
//! Everything here is pure; the session task in `services::game_flow` owns
//! one `GameState` and is the only writer, which is what serializes
//! mutation per session.

use rand::Rng;

use crate::config::GameConfig;
use crate::domain::cards::{Card, CardKind};
use crate::domain::deck::Deck;
use crate::domain::pile::Pile;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};

/// Fixed turn-order slot, 0..N-1 for the session's lifetime.
pub type SeatId = u8;

#[derive(Debug, Clone)]
pub struct SeatState {
    pub seat: SeatId,
    pub username: String,
    pub hand: Pile,
    /// False once eliminated (exploded without a Deactivate); never reset.
    pub active: bool,
    /// Independent of `active`: a disconnected seat stays in rotation
    /// while still active.
    pub disconnected: bool,
    /// Cards this seat has led plays with (winner history).
    pub cards_played: u32,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub lobby_id: String,
    pub seats: Vec<SeatState>,
    pub deck: Deck,
    pub discard: Pile,
    pub turn_index: SeatId,
    /// Attack stacking counter; the turn pointer only moves once this
    /// reaches 1.
    pub turns_remaining: u32,
    pub leader_seat: SeatId,
    pub winner: Option<SeatId>,
    pub last_card_played: Option<CardKind>,
}

impl GameState {
    /// Deal a fresh session for the given usernames, seat order preserved.
    pub fn deal<R: Rng + ?Sized>(
        lobby_id: impl Into<String>,
        usernames: &[String],
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<Self, DomainError> {
        let (deck, hands) = Deck::standard(config, usernames.len(), rng)?;

        let seats = usernames
            .iter()
            .zip(hands)
            .enumerate()
            .map(|(i, (username, hand))| SeatState {
                seat: i as SeatId,
                username: username.clone(),
                hand,
                active: true,
                disconnected: false,
                cards_played: 0,
            })
            .collect();

        Ok(Self {
            lobby_id: lobby_id.into(),
            seats,
            deck,
            discard: Pile::new(),
            turn_index: 0,
            turns_remaining: 1,
            leader_seat: 0,
            winner: None,
            last_card_played: None,
        })
    }

    pub fn seat(&self, seat: SeatId) -> Result<&SeatState, DomainError> {
        self.seats.get(seat as usize).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::SeatOutOfRange,
                format!("seat {seat} out of range"),
            )
        })
    }

    pub fn seat_mut(&mut self, seat: SeatId) -> Result<&mut SeatState, DomainError> {
        self.seats.get_mut(seat as usize).ok_or_else(|| {
            DomainError::validation(
                ValidationKind::SeatOutOfRange,
                format!("seat {seat} out of range"),
            )
        })
    }

    pub fn seat_of_username(&self, username: &str) -> Result<SeatId, DomainError> {
        self.seats
            .iter()
            .find(|s| s.username == username)
            .map(|s| s.seat)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Seat, format!("{username} is not seated"))
            })
    }

    pub fn active_count(&self) -> usize {
        self.seats.iter().filter(|s| s.active).count()
    }

    /// Next seat after `from` with `active=true`, wrapping. `None` only when
    /// no other active seat exists.
    pub fn next_active_seat(&self, from: SeatId) -> Option<SeatId> {
        let n = self.seats.len() as SeatId;
        (1..=n)
            .map(|offset| (from + offset) % n)
            .find(|&seat| self.seats[seat as usize].active)
    }

    /// Advance the turn pointer. Attack stacks decrement before the pointer
    /// rotates; the pointer only ever lands on an active seat. A seat
    /// eliminated mid-stack forfeits the turns it still owed.
    pub fn advance_turn(&mut self) {
        let current_active = self
            .seats
            .get(self.turn_index as usize)
            .is_some_and(|s| s.active);
        if current_active && self.turns_remaining > 1 {
            self.turns_remaining -= 1;
            return;
        }
        if let Some(next) = self.next_active_seat(self.turn_index) {
            self.turn_index = next;
        }
        self.turns_remaining = 1;
    }

    /// Recompute the terminal condition. Exactly one active seat ends the
    /// session; the winner sticks once set.
    pub fn check_winner(&mut self) -> Option<SeatId> {
        if self.winner.is_none() && self.active_count() == 1 {
            self.winner = self.seats.iter().find(|s| s.active).map(|s| s.seat);
        }
        self.winner
    }

    /// Move a set of already-validated cards from a hand to the discard
    /// pile. Played cards are spent even when the effect is later noped.
    pub fn discard_from_hand(
        &mut self,
        seat: SeatId,
        cards: &[Card],
    ) -> Result<(), DomainError> {
        let hand = &mut self.seat_mut(seat)?.hand;
        let mut moved = Vec::with_capacity(cards.len());
        for card in cards {
            match hand.remove_by_id(card.id) {
                Some(c) => moved.push(c),
                None => {
                    return Err(DomainError::validation(
                        ValidationKind::CardNotOwned,
                        format!("card {} not in seat {seat}'s hand", card.id),
                    ))
                }
            }
        }
        for card in moved {
            self.discard.push(card);
        }
        Ok(())
    }

    /// Conservation invariant: every card ever minted is in exactly one of
    /// deck, a hand, or the discard pile.
    pub fn cards_conserved(&self) -> bool {
        let in_hands: usize = self.seats.iter().map(|s| s.hand.len()).sum();
        self.deck.len() + in_hands + self.discard.len() == self.deck.minted() as usize
    }
}
