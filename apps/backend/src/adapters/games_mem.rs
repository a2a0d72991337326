//! In-memory game result store.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::domain::DomainError;
use crate::gateway::WinnerNotice;
use crate::repos::games::GameStore;

#[derive(Default)]
pub struct InMemoryGameStore {
    results: Mutex<Vec<WinnerNotice>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn record_result(&self, result: &WinnerNotice) -> Result<(), DomainError> {
        self.results.lock().push(result.clone());
        Ok(())
    }

    async fn results_for(&self, username: &str) -> Result<Vec<WinnerNotice>, DomainError> {
        Ok(self
            .results
            .lock()
            .iter()
            .filter(|r| r.per_player.iter().any(|p| p.username == username))
            .cloned()
            .collect())
    }
}
