//! Runtime configuration modules.

pub mod game;

pub use game::GameConfig;
