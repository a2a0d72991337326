//! Per-seat redacted view of a session, pushed after every mutation.
//!
//! A snapshot only ever contains the viewer's own cards; other seats are
//! reduced to a count, so hidden information never crosses the wire.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, CardKind};
use crate::domain::state::{GameState, SeatId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub username: String,
    pub num_cards: usize,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub lobby_id: String,
    pub player_cards: Vec<Card>,
    pub players: Vec<SeatSummary>,
    pub turn_username: String,
    /// Seconds the current seat has to act before a forced draw.
    pub time_out: u64,
    pub cards_left_in_deck: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_card_played: Option<CardKind>,
    pub turns_left: u32,
}

/// Build the view for one seat.
pub fn snapshot_for(state: &GameState, viewer: SeatId, turn_timeout_secs: u64) -> GameSnapshot {
    let player_cards = state
        .seats
        .get(viewer as usize)
        .map(|s| s.hand.cards().to_vec())
        .unwrap_or_default();

    let players = state
        .seats
        .iter()
        .map(|s| SeatSummary {
            username: s.username.clone(),
            num_cards: s.hand.len(),
            active: s.active,
        })
        .collect();

    let turn_username = state
        .seats
        .get(state.turn_index as usize)
        .map(|s| s.username.clone())
        .unwrap_or_default();

    GameSnapshot {
        lobby_id: state.lobby_id.clone(),
        player_cards,
        players,
        turn_username,
        time_out: turn_timeout_secs,
        cards_left_in_deck: state.deck.len(),
        last_card_played: state.last_card_played,
        turns_left: state.turns_remaining,
    }
}
