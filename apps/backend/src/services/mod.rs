pub mod game_flow;
pub mod lobbies;

pub use lobbies::{LeaveOutcome, LobbyService};
