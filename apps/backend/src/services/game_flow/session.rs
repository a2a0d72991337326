//! One tokio task per running session.
//!
//! The task exclusively owns its `GameState`; everything else talks to it
//! through `SessionCmd` over an mpsc channel, which serializes plays per
//! session with no locking. The turn timer is a deadline local to the task's
//! select loop, so exactly one timer exists per session by construction.

use std::sync::Arc;

use dashmap::DashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::config::GameConfig;
use crate::domain::cards::CardId;
use crate::domain::snapshot::snapshot_for;
use crate::domain::state::{GameState, SeatId};
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::gateway::{Gateway, GameEvent, PlayerHistory, WinnerNotice};
use crate::repos::games::GameStore;
use crate::repos::lobbies::LobbyStore;
use crate::services::game_flow::effects::{draw_and_advance, resolve_play, PlayOutcome};
use crate::services::game_flow::validation::{validate_play, validate_turn};

/// Coins credited to a winner per seat at the table.
const WINNER_COINS_PER_SEAT: u32 = 25;

const COMMAND_BUFFER: usize = 32;

#[derive(Debug)]
pub enum SessionCmd {
    /// A play (or an empty draw) from one participant. The validation error
    /// or outcome goes back through `ack` to that participant alone.
    Play {
        username: String,
        card_ids: Vec<CardId>,
        ack: oneshot::Sender<Result<PlayOutcome, DomainError>>,
    },
    Disconnect {
        username: String,
    },
    /// Re-sync a seat that re-established its socket.
    Reconnect {
        username: String,
    },
    /// Leader-only: freeze the turn deadline.
    PauseTimer {
        username: String,
    },
    /// Leader-only: unfreeze and restart the turn deadline.
    ResumeTimer {
        username: String,
    },
}

#[derive(Clone)]
pub struct SessionHandle {
    tx: mpsc::Sender<SessionCmd>,
}

impl SessionHandle {
    pub async fn play(
        &self,
        username: &str,
        card_ids: Vec<CardId>,
    ) -> Result<PlayOutcome, DomainError> {
        let (ack, rx) = oneshot::channel();
        self.tx
            .send(SessionCmd::Play {
                username: username.to_string(),
                card_ids,
                ack,
            })
            .await
            .map_err(|_| DomainError::not_found(NotFoundKind::Game, "session ended"))?;
        rx.await
            .map_err(|_| DomainError::not_found(NotFoundKind::Game, "session ended"))?
    }

    pub async fn disconnect(&self, username: &str) {
        let _ = self
            .tx
            .send(SessionCmd::Disconnect {
                username: username.to_string(),
            })
            .await;
    }

    pub async fn reconnect(&self, username: &str) {
        let _ = self
            .tx
            .send(SessionCmd::Reconnect {
                username: username.to_string(),
            })
            .await;
    }

    pub async fn pause_timer(&self, username: &str) {
        let _ = self
            .tx
            .send(SessionCmd::PauseTimer {
                username: username.to_string(),
            })
            .await;
    }

    pub async fn resume_timer(&self, username: &str) {
        let _ = self
            .tx
            .send(SessionCmd::ResumeTimer {
                username: username.to_string(),
            })
            .await;
    }
}

/// Running sessions, keyed by lobby id.
#[derive(Default)]
pub struct SessionMap {
    sessions: DashMap<String, SessionHandle>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, lobby_id: &str) -> Option<SessionHandle> {
        self.sessions.get(lobby_id).map(|h| h.value().clone())
    }

    pub fn insert(&self, lobby_id: &str, handle: SessionHandle) {
        self.sessions.insert(lobby_id.to_string(), handle);
    }

    pub fn remove(&self, lobby_id: &str) {
        self.sessions.remove(lobby_id);
    }
}

/// Deal a session and spawn its task. The handle is also registered in
/// `sessions` under the lobby id.
pub fn spawn_session(
    lobby_id: &str,
    usernames: &[String],
    gateway: Arc<dyn Gateway>,
    lobbies: Arc<dyn LobbyStore>,
    games: Arc<dyn GameStore>,
    sessions: Arc<SessionMap>,
    config: GameConfig,
) -> Result<SessionHandle, DomainError> {
    let mut rng = match config.rng_seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };
    let state = GameState::deal(lobby_id, usernames, &config, &mut rng)?;

    let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
    let handle = SessionHandle { tx };
    sessions.insert(lobby_id, handle.clone());

    let lobby_id = lobby_id.to_string();
    tokio::spawn(async move {
        run_session(
            lobby_id, state, rng, rx, gateway, lobbies, games, sessions, config,
        )
        .await;
    });

    Ok(handle)
}

#[allow(clippy::too_many_arguments)]
#[instrument(skip_all, fields(lobby_id = %lobby_id))]
async fn run_session(
    lobby_id: String,
    mut state: GameState,
    mut rng: ChaCha20Rng,
    mut rx: mpsc::Receiver<SessionCmd>,
    gateway: Arc<dyn Gateway>,
    lobbies: Arc<dyn LobbyStore>,
    games: Arc<dyn GameStore>,
    sessions: Arc<SessionMap>,
    config: GameConfig,
) {
    info!(seats = state.seats.len(), "session started");
    push_snapshots(&state, gateway.as_ref(), &config);

    let mut deadline = Instant::now() + config.turn_timeout;
    let mut paused = false;

    while state.winner.is_none() {
        let turn_marker = (state.turn_index, state.turns_remaining);

        tokio::select! {
            cmd = rx.recv() => {
                let Some(cmd) = cmd else {
                    // Every handle dropped; nobody can act anymore.
                    warn!("session abandoned before a winner");
                    break;
                };
                handle_cmd(
                    &mut state,
                    gateway.as_ref(),
                    &mut rng,
                    &config,
                    &mut paused,
                    &mut deadline,
                    cmd,
                )
                .await;
            }
            _ = tokio::time::sleep_until(deadline), if !paused => {
                let seat = state.turn_index;
                info!(seat, "turn timed out, forcing a draw");
                if let Err(err) = draw_and_advance(&mut state, gateway.as_ref(), &mut rng, seat) {
                    error!(error = %err, "forced draw failed");
                }
                push_snapshots(&state, gateway.as_ref(), &config);
            }
        }

        if (state.turn_index, state.turns_remaining) != turn_marker {
            deadline = Instant::now() + config.turn_timeout;
        }
    }

    if let Some(winner) = state.winner {
        finish(&state, winner, gateway.as_ref(), games.as_ref()).await;
    }

    if let Err(err) = lobbies.remove_lobby(&lobby_id).await {
        warn!(error = %err, "lobby cleanup failed");
    }
    sessions.remove(&lobby_id);
    info!("session ended");
}

async fn handle_cmd(
    state: &mut GameState,
    gateway: &dyn Gateway,
    rng: &mut ChaCha20Rng,
    config: &GameConfig,
    paused: &mut bool,
    deadline: &mut Instant,
    cmd: SessionCmd,
) {
    match cmd {
        SessionCmd::Play {
            username,
            card_ids,
            ack,
        } => {
            let result = handle_play(state, gateway, rng, &username, &card_ids).await;
            if result.is_ok() {
                push_snapshots(state, gateway, config);
            }
            let _ = ack.send(result);
        }

        SessionCmd::Disconnect { username } => {
            if let Ok(seat) = state.seat_of_username(&username) {
                // The seat stays in rotation; the turn timer covers it.
                if let Ok(seat_state) = state.seat_mut(seat) {
                    seat_state.disconnected = true;
                }
                info!(username, seat, "seat disconnected");
            }
        }

        SessionCmd::Reconnect { username } => {
            if let Ok(seat) = state.seat_of_username(&username) {
                if let Ok(seat_state) = state.seat_mut(seat) {
                    seat_state.disconnected = false;
                }
                gateway.notify_seat(
                    seat,
                    GameEvent::State(snapshot_for(state, seat, config.turn_timeout.as_secs())),
                );
                info!(username, seat, "seat reconnected");
            }
        }

        SessionCmd::PauseTimer { username } => {
            if is_leader(state, &username) {
                *paused = true;
                info!(username, "turn timer paused");
            } else {
                warn!(username, "timer pause from a non-leader ignored");
            }
        }

        SessionCmd::ResumeTimer { username } => {
            if is_leader(state, &username) {
                *paused = false;
                *deadline = Instant::now() + config.turn_timeout;
                info!(username, "turn timer resumed");
            } else {
                warn!(username, "timer resume from a non-leader ignored");
            }
        }
    }
}

async fn handle_play(
    state: &mut GameState,
    gateway: &dyn Gateway,
    rng: &mut ChaCha20Rng,
    username: &str,
    card_ids: &[CardId],
) -> Result<PlayOutcome, DomainError> {
    let seat = state.seat_of_username(username)?;

    if card_ids.is_empty() {
        // An empty play is the voluntary end-of-turn draw.
        validate_turn(state, seat)?;
        draw_and_advance(state, gateway, rng, seat)?;
        return Ok(PlayOutcome::default());
    }

    let cards = validate_play(state, seat, card_ids)?;
    resolve_play(state, gateway, rng, seat, cards).await
}

async fn finish(state: &GameState, winner: SeatId, gateway: &dyn Gateway, games: &dyn GameStore) {
    let winner_username = state
        .seats
        .get(winner as usize)
        .map(|s| s.username.clone())
        .unwrap_or_default();

    let notice = WinnerNotice {
        winner_username,
        coins_earned: WINNER_COINS_PER_SEAT * state.seats.len() as u32,
        lobby_id: state.lobby_id.clone(),
        per_player: state
            .seats
            .iter()
            .map(|s| PlayerHistory {
                username: s.username.clone(),
                cards_played: s.cards_played,
                active: s.active,
            })
            .collect(),
    };

    info!(winner = %notice.winner_username, coins = notice.coins_earned, "session won");
    gateway.notify_all(GameEvent::Winner(notice.clone()));
    if let Err(err) = games.record_result(&notice).await {
        error!(error = %err, "winner bookkeeping failed");
    }
}

fn push_snapshots(state: &GameState, gateway: &dyn Gateway, config: &GameConfig) {
    let secs = config.turn_timeout.as_secs();
    for seat_state in &state.seats {
        gateway.notify_seat(
            seat_state.seat,
            GameEvent::State(snapshot_for(state, seat_state.seat, secs)),
        );
    }
}

fn is_leader(state: &GameState, username: &str) -> bool {
    state
        .seats
        .get(state.leader_seat as usize)
        .is_some_and(|s| s.username == username)
}
