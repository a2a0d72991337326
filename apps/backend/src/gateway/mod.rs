//! Request/response gateway between the rule engine and the transport.
//!
//! The engine never touches sockets. It pushes `GameEvent`s (fire and
//! forget) and issues `SeatQuery` requests that resolve to `Some(reply)` or,
//! after the configured timeout or a disconnect, to `None`. A `None` answer
//! is a valid "declined / no selection" outcome and must never be treated
//! as a session-fatal error by callers.

pub mod stub;
pub mod ws;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, CardId, CardKind};
use crate::domain::snapshot::GameSnapshot;
use crate::domain::state::SeatId;

/// Server-initiated request channels. At most one request may be
/// outstanding per (seat, kind) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    SelectPlayer,
    SelectCard,
    SelectCardType,
    SelectNope,
}

/// Payload of a server-initiated query to one seat.
#[derive(Debug, Clone)]
pub enum SeatQuery {
    /// Name a target seat among `candidates`.
    SelectPlayer { candidates: Vec<String> },
    /// Pick one of your own cards (Favor hand-over fallback).
    SelectCard { cards: Vec<Card> },
    /// Name a card kind to request or steal.
    SelectCardType,
    /// Counter-play prompt inside the nope chain.
    SelectNope {
        action: ActionKind,
        trigger_user: String,
    },
}

impl SeatQuery {
    pub fn kind(&self) -> RequestKind {
        match self {
            SeatQuery::SelectPlayer { .. } => RequestKind::SelectPlayer,
            SeatQuery::SelectCard { .. } => RequestKind::SelectCard,
            SeatQuery::SelectCardType => RequestKind::SelectCardType,
            SeatQuery::SelectNope { .. } => RequestKind::SelectNope,
        }
    }
}

/// A seat's answer to a `SeatQuery`.
#[derive(Debug, Clone, PartialEq)]
pub enum SeatReply {
    Player { username: String },
    Card { card_id: CardId },
    CardType { card_type: CardKind },
    Nope { use_nope: bool },
}

/// Broadcast action tags for `notify-action` pushes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Skip,
    Attack,
    Favor,
    RandomSteal,
    TypedSteal,
    NopeUsed,
    BombDefused,
    BombExploded,
    StealFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionNotice {
    pub trigger_user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_user: Option<String>,
    pub action: ActionKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerHistory {
    pub username: String,
    pub cards_played: u32,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WinnerNotice {
    pub winner_username: String,
    pub coins_earned: u32,
    pub lobby_id: String,
    pub per_player: Vec<PlayerHistory>,
}

/// Engine-side pushes.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// Per-seat redacted state (only meaningful for `notify_seat`).
    State(GameSnapshot),
    Action(ActionNotice),
    Winner(WinnerNotice),
}

/// Transport seam between one session's engine and its participants.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Fire-and-forget push to one seat. Silently dropped for
    /// disconnected seats.
    fn notify_seat(&self, seat: SeatId, event: GameEvent);

    /// Fire-and-forget push to every seat in the session.
    fn notify_all(&self, event: GameEvent);

    /// Ask one seat and wait up to the configured timeout. `None` means
    /// "no answer" (timeout, disconnect, or duplicate outstanding request)
    /// and is a normal outcome. The gateway never retries.
    async fn request(&self, seat: SeatId, query: SeatQuery) -> Option<SeatReply>;
}
