//! Domain-level error type used across services and adapters.
//!
//! This error type is transport-agnostic. The WebSocket layer converts it
//! into wire payloads (`error=true`, `errorMsg`) via `ws::protocol::Status`,
//! the HTTP edge via `From<DomainError> for AppError`; nothing in the domain
//! knows about HTTP status codes or socket frames.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::errors::ErrorCode;

/// Rule violations and input problems raised by play validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    SeatOutOfRange,
    NotYourTurn,
    SeatInactive,
    CardNotOwned,
    UnplayableCards,
    InsufficientCards,
    Other,
}

/// Domain-level not found entities
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Lobby,
    Game,
    Seat,
    Other(String),
}

/// Domain-level conflict kinds
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    LobbyFull,
    LobbyAlreadyActive,
    NotLobbyLeader,
    TooFewPlayers,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Input/user validation or game rule violation
    Validation(ValidationKind, String),
    /// Semantic conflict (lobby lifecycle, seating)
    Conflict(ConflictKind, String),
    /// Missing resource in domain terms
    NotFound(NotFoundKind, String),
    /// Infrastructure/operational failures
    Infra(String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Infra(d) => write!(f, "infra error: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn infra(detail: impl Into<String>) -> Self {
        Self::Infra(detail.into())
    }

    /// Stable code for the wire payload.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::SeatOutOfRange => ErrorCode::SeatOutOfRange,
                ValidationKind::NotYourTurn => ErrorCode::NotYourTurn,
                ValidationKind::SeatInactive => ErrorCode::SeatInactive,
                ValidationKind::CardNotOwned => ErrorCode::CardNotOwned,
                ValidationKind::UnplayableCards => ErrorCode::UnplayableCards,
                ValidationKind::InsufficientCards => ErrorCode::InsufficientCards,
                ValidationKind::Other => ErrorCode::ValidationError,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::LobbyFull => ErrorCode::LobbyFull,
                ConflictKind::LobbyAlreadyActive => ErrorCode::LobbyAlreadyActive,
                ConflictKind::NotLobbyLeader => ErrorCode::NotLobbyLeader,
                ConflictKind::TooFewPlayers => ErrorCode::TooFewPlayers,
                ConflictKind::Other(_) => ErrorCode::Conflict,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Lobby => ErrorCode::LobbyNotFound,
                NotFoundKind::Game => ErrorCode::GameNotFound,
                _ => ErrorCode::ValidationError,
            },
            DomainError::Infra(_) => ErrorCode::InternalError,
        }
    }

    /// Human-readable detail for the `errorMsg` field.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d)
            | DomainError::Infra(d) => d,
        }
    }
}
