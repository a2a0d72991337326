//! Game tuning: deck composition, deal size, and timeouts.
//!
//! Environment variables must be set by the runtime environment (Docker
//! env_file or sourced env files); everything has a sensible default so the
//! server boots bare.

use std::time::Duration;

use crate::domain::cards::CardKind;

/// Default number of cards dealt to each seat (the extra Deactivate is on
/// top of this).
const DEFAULT_HAND_SIZE: usize = 7;
const DEFAULT_TURN_TIMEOUT_SECS: u64 = 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;
/// Deactivate cards shuffled into the deck beyond the one dealt per seat.
const DEFAULT_SPARE_DEACTIVATES: usize = 2;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub hand_size: usize,
    pub spare_deactivates: usize,
    /// Fixed counts per directly-minted kind. Bombs and per-seat Deactivates
    /// are not listed here; they are injected during setup.
    pub deck_counts: Vec<(CardKind, usize)>,
    pub turn_timeout: Duration,
    pub request_timeout: Duration,
    /// Deterministic deck order for a session when set (test/replay use).
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            hand_size: DEFAULT_HAND_SIZE,
            spare_deactivates: DEFAULT_SPARE_DEACTIVATES,
            deck_counts: standard_counts(),
            turn_timeout: Duration::from_secs(DEFAULT_TURN_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            rng_seed: None,
        }
    }
}

impl GameConfig {
    /// Build a config from the environment, falling back to defaults for
    /// anything unset or unparsable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_u64("KABOOM_HAND_SIZE") {
            config.hand_size = v as usize;
        }
        if let Some(v) = env_u64("KABOOM_TURN_TIMEOUT_SECS") {
            config.turn_timeout = Duration::from_secs(v);
        }
        if let Some(v) = env_u64("KABOOM_REQUEST_TIMEOUT_SECS") {
            config.request_timeout = Duration::from_secs(v);
        }
        config
    }

    /// Total non-bomb, non-per-seat-Deactivate cards minted at setup.
    pub fn base_deck_size(&self) -> usize {
        self.deck_counts.iter().map(|(_, n)| n).sum::<usize>() + self.spare_deactivates
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Standard composition for the non-Bomb portion of the deck.
fn standard_counts() -> Vec<(CardKind, usize)> {
    vec![
        (CardKind::SeeFuture, 5),
        (CardKind::Shuffle, 4),
        (CardKind::Skip, 4),
        (CardKind::Attack, 4),
        (CardKind::Nope, 5),
        (CardKind::Favor, 4),
        (CardKind::TacoCat, 4),
        (CardKind::RainbowCat, 4),
        (CardKind::BeardCat, 4),
        (CardKind::Cattermelon, 4),
        (CardKind::HairyPotatoCat, 4),
    ]
}
