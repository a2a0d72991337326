#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod gateway;
pub mod health;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod ws;

// Re-exports for public API
pub use config::GameConfig;
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use gateway::Gateway;
pub use services::game_flow::{PlayOutcome, SessionHandle, SessionMap};
pub use services::LobbyService;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::test_logging::init();
}
