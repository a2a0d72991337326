//! In-memory lobby store.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::state::SeatId;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::repos::lobbies::{Lobby, LobbyMember, LobbyPhase, LobbyStore};
use crate::utils::join_code::generate_join_code;

#[derive(Default)]
pub struct InMemoryLobbyStore {
    lobbies: DashMap<String, Lobby>,
}

impl InMemoryLobbyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_lobby<T>(
        &self,
        lobby_id: &str,
        f: impl FnOnce(&mut Lobby) -> Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        match self.lobbies.get_mut(lobby_id) {
            Some(mut entry) => f(entry.value_mut()),
            None => Err(DomainError::not_found(
                NotFoundKind::Lobby,
                format!("lobby {lobby_id} does not exist"),
            )),
        }
    }
}

#[async_trait]
impl LobbyStore for InMemoryLobbyStore {
    async fn create_lobby(&self, leader: &str, max_players: u8) -> Result<Lobby, DomainError> {
        // Collisions are astronomically unlikely at 32^9 but cost one loop
        // iteration to rule out.
        let lobby_id = loop {
            let code = generate_join_code();
            if !self.lobbies.contains_key(&code) {
                break code;
            }
        };

        let lobby = Lobby {
            lobby_id: lobby_id.clone(),
            leader: leader.to_string(),
            max_players,
            members: vec![LobbyMember {
                username: leader.to_string(),
                is_leader: true,
                seat: None,
            }],
            phase: LobbyPhase::Forming,
        };
        self.lobbies.insert(lobby_id, lobby.clone());
        Ok(lobby)
    }

    async fn remove_lobby(&self, lobby_id: &str) -> Result<(), DomainError> {
        self.lobbies.remove(lobby_id);
        Ok(())
    }

    async fn get(&self, lobby_id: &str) -> Result<Option<Lobby>, DomainError> {
        Ok(self.lobbies.get(lobby_id).map(|e| e.value().clone()))
    }

    async fn add_member(&self, lobby_id: &str, username: &str) -> Result<(), DomainError> {
        self.with_lobby(lobby_id, |lobby| {
            lobby.members.push(LobbyMember {
                username: username.to_string(),
                is_leader: false,
                seat: None,
            });
            Ok(())
        })
    }

    async fn remove_member(&self, lobby_id: &str, username: &str) -> Result<(), DomainError> {
        self.with_lobby(lobby_id, |lobby| {
            lobby.members.retain(|m| m.username != username);
            Ok(())
        })
    }

    async fn members(&self, lobby_id: &str) -> Result<Vec<LobbyMember>, DomainError> {
        self.with_lobby(lobby_id, |lobby| Ok(lobby.members.clone()))
    }

    async fn set_max_players(&self, lobby_id: &str, max_players: u8) -> Result<(), DomainError> {
        self.with_lobby(lobby_id, |lobby| {
            lobby.max_players = max_players;
            Ok(())
        })
    }

    async fn max_players(&self, lobby_id: &str) -> Result<u8, DomainError> {
        self.with_lobby(lobby_id, |lobby| Ok(lobby.max_players))
    }

    async fn mark_active(&self, lobby_id: &str) -> Result<(), DomainError> {
        self.with_lobby(lobby_id, |lobby| {
            lobby.phase = LobbyPhase::Active;
            Ok(())
        })
    }

    async fn set_seat_index(
        &self,
        lobby_id: &str,
        username: &str,
        seat: SeatId,
    ) -> Result<(), DomainError> {
        self.with_lobby(lobby_id, |lobby| {
            match lobby.members.iter_mut().find(|m| m.username == username) {
                Some(member) => {
                    member.seat = Some(seat);
                    Ok(())
                }
                None => Err(DomainError::not_found(
                    NotFoundKind::Seat,
                    format!("{username} is not a member of {lobby_id}"),
                )),
            }
        })
    }

    async fn lobby_of(&self, username: &str) -> Result<Option<Lobby>, DomainError> {
        Ok(self
            .lobbies
            .iter()
            .find(|entry| entry.value().members.iter().any(|m| m.username == username))
            .map(|entry| entry.value().clone()))
    }
}
