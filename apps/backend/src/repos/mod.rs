//! Collaborator contracts consumed by the core.
//!
//! Persistence is an external concern (schema and migrations live with the
//! storage service); the core only depends on these narrow traits. The
//! in-memory implementations are in `crate::adapters`.

pub mod games;
pub mod lobbies;

pub use games::GameStore;
pub use lobbies::{Lobby, LobbyMember, LobbyPhase, LobbyStore};
