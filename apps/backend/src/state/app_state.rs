//! Shared application state handed to every connection.

use std::sync::Arc;

use crate::adapters::games_mem::InMemoryGameStore;
use crate::adapters::lobbies_mem::InMemoryLobbyStore;
use crate::config::GameConfig;
use crate::repos::games::GameStore;
use crate::repos::lobbies::LobbyStore;
use crate::services::game_flow::SessionMap;
use crate::services::LobbyService;
use crate::ws::hub::SeatHub;

#[derive(Clone)]
pub struct AppState {
    hub: Arc<SeatHub>,
    lobbies: Arc<dyn LobbyStore>,
    games: Arc<dyn GameStore>,
    sessions: Arc<SessionMap>,
    config: GameConfig,
}

impl AppState {
    pub fn new(
        lobbies: Arc<dyn LobbyStore>,
        games: Arc<dyn GameStore>,
        config: GameConfig,
    ) -> Self {
        Self {
            hub: Arc::new(SeatHub::new()),
            lobbies,
            games,
            sessions: Arc::new(SessionMap::new()),
            config,
        }
    }

    /// State backed by the in-memory stores (the production wiring until an
    /// external persistence service exists, and the test wiring always).
    pub fn in_memory(config: GameConfig) -> Self {
        Self::new(
            Arc::new(InMemoryLobbyStore::new()),
            Arc::new(InMemoryGameStore::new()),
            config,
        )
    }

    pub fn hub(&self) -> Arc<SeatHub> {
        self.hub.clone()
    }

    pub fn lobby_store(&self) -> Arc<dyn LobbyStore> {
        self.lobbies.clone()
    }

    pub fn lobby_service(&self) -> LobbyService {
        LobbyService::new(self.lobbies.clone())
    }

    pub fn game_store(&self) -> Arc<dyn GameStore> {
        self.games.clone()
    }

    pub fn sessions(&self) -> Arc<SessionMap> {
        self.sessions.clone()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }
}
