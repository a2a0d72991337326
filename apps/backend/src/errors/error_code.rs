//! Stable machine-readable error codes exposed at the API edge.

use serde::Serialize;

/// Error codes carried by `AppError` and surfaced in wire payloads.
///
/// These are part of the client contract: renaming a variant is a breaking
/// protocol change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    LobbyNotFound,
    LobbyFull,
    LobbyAlreadyActive,
    NotLobbyLeader,
    TooFewPlayers,
    NotYourTurn,
    SeatInactive,
    SeatOutOfRange,
    CardNotOwned,
    UnplayableCards,
    InsufficientCards,
    GameNotFound,
    Conflict,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::LobbyNotFound => "LOBBY_NOT_FOUND",
            ErrorCode::LobbyFull => "LOBBY_FULL",
            ErrorCode::LobbyAlreadyActive => "LOBBY_ALREADY_ACTIVE",
            ErrorCode::NotLobbyLeader => "NOT_LOBBY_LEADER",
            ErrorCode::TooFewPlayers => "TOO_FEW_PLAYERS",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::SeatInactive => "SEAT_INACTIVE",
            ErrorCode::SeatOutOfRange => "SEAT_OUT_OF_RANGE",
            ErrorCode::CardNotOwned => "CARD_NOT_OWNED",
            ErrorCode::UnplayableCards => "UNPLAYABLE_CARDS",
            ErrorCode::InsufficientCards => "INSUFFICIENT_CARDS",
            ErrorCode::GameNotFound => "GAME_NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
