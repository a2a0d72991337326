//! Game result bookkeeping contract.
//!
//! Statistics and leaderboards are an external service; the core only
//! reports terminal outcomes through this seam.

use async_trait::async_trait;

use crate::errors::domain::DomainError;
use crate::gateway::WinnerNotice;

#[async_trait]
pub trait GameStore: Send + Sync {
    /// Record a finished session's outcome.
    async fn record_result(&self, result: &WinnerNotice) -> Result<(), DomainError>;

    /// Results recorded so far for a username (most recent last).
    async fn results_for(&self, username: &str) -> Result<Vec<WinnerNotice>, DomainError>;
}
