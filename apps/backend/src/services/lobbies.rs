//! Lobby lifecycle rules on top of the `LobbyStore` contract.
//!
//! The store only persists; every who-may-do-what decision lives here so
//! the same rules hold no matter which store backs the service.

use std::sync::Arc;

use tracing::info;

use crate::domain::deck::{MAX_PLAYERS, MIN_PLAYERS};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::repos::lobbies::{Lobby, LobbyPhase, LobbyStore};
use crate::utils::join_code::is_valid_code;

/// What `leave` did, so the caller knows which side effects to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// Member removed from a forming lobby.
    Left,
    /// The leader left a forming lobby; the whole lobby is gone.
    Disbanded,
    /// The lobby is mid-game: membership is untouched and the session
    /// should mark the seat disconnected instead.
    WasActive,
}

#[derive(Clone)]
pub struct LobbyService {
    store: Arc<dyn LobbyStore>,
}

impl LobbyService {
    pub fn new(store: Arc<dyn LobbyStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, username: &str, max_players: u8) -> Result<Lobby, DomainError> {
        if !(MIN_PLAYERS as u8..=MAX_PLAYERS as u8).contains(&max_players) {
            return Err(DomainError::validation(
                ValidationKind::Other,
                format!("lobby size must be {MIN_PLAYERS}-{MAX_PLAYERS}, got {max_players}"),
            ));
        }
        if self.store.lobby_of(username).await?.is_some() {
            return Err(DomainError::conflict(
                ConflictKind::Other("AlreadyInLobby".to_string()),
                format!("{username} is already in a lobby"),
            ));
        }

        let lobby = self.store.create_lobby(username, max_players).await?;
        info!(lobby_id = %lobby.lobby_id, leader = username, max_players, "lobby created");
        Ok(lobby)
    }

    pub async fn join(&self, lobby_id: &str, username: &str) -> Result<Lobby, DomainError> {
        if !is_valid_code(lobby_id) {
            return Err(DomainError::validation(
                ValidationKind::Other,
                format!("{lobby_id} is not a join code"),
            ));
        }

        let lobby = self.require(lobby_id).await?;
        if lobby.phase != LobbyPhase::Forming {
            return Err(DomainError::conflict(
                ConflictKind::LobbyAlreadyActive,
                format!("lobby {lobby_id} already started"),
            ));
        }
        if lobby.members.len() >= lobby.max_players as usize {
            return Err(DomainError::conflict(
                ConflictKind::LobbyFull,
                format!("lobby {lobby_id} is full"),
            ));
        }
        if lobby.members.iter().any(|m| m.username == username) {
            return Err(DomainError::conflict(
                ConflictKind::Other("AlreadyInLobby".to_string()),
                format!("{username} already joined {lobby_id}"),
            ));
        }

        self.store.add_member(lobby_id, username).await?;
        info!(lobby_id, username, "member joined");
        self.require(lobby_id).await
    }

    pub async fn leave(&self, lobby_id: &str, username: &str) -> Result<LeaveOutcome, DomainError> {
        let lobby = self.require(lobby_id).await?;
        if !lobby.members.iter().any(|m| m.username == username) {
            return Err(DomainError::not_found(
                NotFoundKind::Seat,
                format!("{username} is not a member of {lobby_id}"),
            ));
        }

        if lobby.phase == LobbyPhase::Active {
            // Mid-game departures are a session concern, not a membership
            // change.
            return Ok(LeaveOutcome::WasActive);
        }

        if lobby.leader == username {
            self.store.remove_lobby(lobby_id).await?;
            info!(lobby_id, username, "leader left, lobby disbanded");
            return Ok(LeaveOutcome::Disbanded);
        }

        self.store.remove_member(lobby_id, username).await?;
        info!(lobby_id, username, "member left");
        Ok(LeaveOutcome::Left)
    }

    /// Start the game: assign seats in join order and flip the lobby to
    /// Active. Returns the usernames in seat order.
    pub async fn start(&self, lobby_id: &str, username: &str) -> Result<Vec<String>, DomainError> {
        let lobby = self.require(lobby_id).await?;
        if lobby.leader != username {
            return Err(DomainError::conflict(
                ConflictKind::NotLobbyLeader,
                format!("{username} is not the leader of {lobby_id}"),
            ));
        }
        if lobby.phase != LobbyPhase::Forming {
            return Err(DomainError::conflict(
                ConflictKind::LobbyAlreadyActive,
                format!("lobby {lobby_id} already started"),
            ));
        }
        if lobby.members.len() < MIN_PLAYERS {
            return Err(DomainError::conflict(
                ConflictKind::TooFewPlayers,
                format!(
                    "lobby {lobby_id} has {} member(s), needs {MIN_PLAYERS}",
                    lobby.members.len()
                ),
            ));
        }

        let mut seated = Vec::with_capacity(lobby.members.len());
        for (i, member) in lobby.members.iter().enumerate() {
            self.store
                .set_seat_index(lobby_id, &member.username, i as u8)
                .await?;
            seated.push(member.username.clone());
        }
        self.store.mark_active(lobby_id).await?;

        info!(lobby_id, seats = seated.len(), "lobby started");
        Ok(seated)
    }

    pub async fn lobby_of(&self, username: &str) -> Result<Option<Lobby>, DomainError> {
        self.store.lobby_of(username).await
    }

    pub async fn members(
        &self,
        lobby_id: &str,
    ) -> Result<Vec<crate::repos::lobbies::LobbyMember>, DomainError> {
        self.store.members(lobby_id).await
    }

    async fn require(&self, lobby_id: &str) -> Result<Lobby, DomainError> {
        self.store.get(lobby_id).await?.ok_or_else(|| {
            DomainError::not_found(
                NotFoundKind::Lobby,
                format!("lobby {lobby_id} does not exist"),
            )
        })
    }
}
