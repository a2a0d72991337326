//! Lobby bookkeeping contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::state::SeatId;
use crate::errors::domain::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LobbyPhase {
    Forming,
    Active,
    Disbanded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyMember {
    pub username: String,
    pub is_leader: bool,
    /// Assigned at start, in membership order.
    pub seat: Option<SeatId>,
}

/// Lobby domain model as the store sees it. Lifecycle rules (who may
/// start, when joins are rejected) are enforced by `LobbyService`, not
/// here.
#[derive(Debug, Clone)]
pub struct Lobby {
    pub lobby_id: String,
    pub leader: String,
    pub max_players: u8,
    pub members: Vec<LobbyMember>,
    pub phase: LobbyPhase,
}

#[async_trait]
pub trait LobbyStore: Send + Sync {
    /// Create a lobby with an opaque unique join code; the leader is
    /// auto-seated as the first member.
    async fn create_lobby(&self, leader: &str, max_players: u8) -> Result<Lobby, DomainError>;

    async fn remove_lobby(&self, lobby_id: &str) -> Result<(), DomainError>;

    async fn get(&self, lobby_id: &str) -> Result<Option<Lobby>, DomainError>;

    async fn add_member(&self, lobby_id: &str, username: &str) -> Result<(), DomainError>;

    async fn remove_member(&self, lobby_id: &str, username: &str) -> Result<(), DomainError>;

    /// Members in join order, leader flag included.
    async fn members(&self, lobby_id: &str) -> Result<Vec<LobbyMember>, DomainError>;

    async fn set_max_players(&self, lobby_id: &str, max_players: u8) -> Result<(), DomainError>;

    async fn max_players(&self, lobby_id: &str) -> Result<u8, DomainError>;

    /// Forming -> Active, exactly once.
    async fn mark_active(&self, lobby_id: &str) -> Result<(), DomainError>;

    async fn set_seat_index(
        &self,
        lobby_id: &str,
        username: &str,
        seat: SeatId,
    ) -> Result<(), DomainError>;

    /// The lobby a username is currently a member of, if any.
    async fn lobby_of(&self, username: &str) -> Result<Option<Lobby>, DomainError>;
}
