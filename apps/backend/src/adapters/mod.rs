//! In-memory implementations of the store contracts in `crate::repos`.
//!
//! These are process-local and intentionally unpersisted: durable storage
//! is an external collaborator. Everything is keyed so a swap to a
//! database-backed adapter only touches this module.

pub mod games_mem;
pub mod lobbies_mem;

pub use games_mem::InMemoryGameStore;
pub use lobbies_mem::InMemoryLobbyStore;
