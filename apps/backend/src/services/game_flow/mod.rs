//! The rule engine: play validation, card effects, nope chains, and the
//! per-session task that owns the state.

pub mod effects;
pub mod nope;
pub mod session;
pub mod validation;

pub use effects::{draw_and_advance, resolve_play, PlayOutcome};
pub use session::{spawn_session, SessionCmd, SessionHandle, SessionMap};
pub use validation::{validate_play, validate_turn};
