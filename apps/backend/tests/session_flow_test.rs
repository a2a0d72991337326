mod common;

use std::sync::Arc;
use std::time::Duration;

use backend::adapters::{InMemoryGameStore, InMemoryLobbyStore};
use backend::config::GameConfig;
use backend::errors::domain::{DomainError, ValidationKind};
use backend::gateway::stub::StubGateway;
use backend::gateway::{GameEvent, WinnerNotice};
use backend::repos::games::GameStore;
use backend::services::game_flow::{spawn_session, SessionHandle, SessionMap};

const LOBBY: &str = "LOBBY0001";

struct Harness {
    handle: SessionHandle,
    gateway: Arc<StubGateway>,
    games: Arc<InMemoryGameStore>,
    sessions: Arc<SessionMap>,
}

fn seeded_config(seed: u64) -> GameConfig {
    GameConfig {
        rng_seed: Some(seed),
        ..GameConfig::default()
    }
}

fn start(usernames: &[&str], config: GameConfig) -> Harness {
    let gateway = Arc::new(StubGateway::new());
    let games = Arc::new(InMemoryGameStore::new());
    let sessions = Arc::new(SessionMap::new());
    let usernames: Vec<String> = usernames.iter().map(|u| u.to_string()).collect();

    let handle = spawn_session(
        LOBBY,
        &usernames,
        gateway.clone(),
        Arc::new(InMemoryLobbyStore::new()),
        games.clone(),
        sessions.clone(),
        config,
    )
    .unwrap();

    Harness {
        handle,
        gateway,
        games,
        sessions,
    }
}

/// Most recent per-seat snapshot tells us whose turn the engine thinks it
/// is.
fn current_turn(gateway: &StubGateway) -> Option<String> {
    gateway.events().iter().rev().find_map(|(_, event)| match event {
        GameEvent::State(snapshot) => Some(snapshot.turn_username.clone()),
        _ => None,
    })
}

fn winner_notice(gateway: &StubGateway) -> Option<WinnerNotice> {
    gateway.events().iter().find_map(|(_, event)| match event {
        GameEvent::Winner(notice) => Some(notice.clone()),
        _ => None,
    })
}

/// Give the session task a beat to drain its channel and push events.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[tokio::test]
async fn spawning_needs_at_least_two_seats() {
    let gateway = Arc::new(StubGateway::new());
    let result = spawn_session(
        LOBBY,
        &["ada".to_string()],
        gateway,
        Arc::new(InMemoryLobbyStore::new()),
        Arc::new(InMemoryGameStore::new()),
        Arc::new(SessionMap::new()),
        seeded_config(1),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn initial_snapshots_go_to_every_seat() {
    let h = start(&["ada", "grace", "edsger"], seeded_config(2));
    settle().await;

    let snapshot_seats: Vec<_> = h
        .gateway
        .events()
        .iter()
        .filter_map(|(seat, event)| match event {
            GameEvent::State(_) => *seat,
            _ => None,
        })
        .collect();
    assert_eq!(snapshot_seats, vec![0, 1, 2]);
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("ada"));
}

#[tokio::test]
async fn plays_out_of_turn_or_from_strangers_are_rejected() {
    let h = start(&["ada", "grace"], seeded_config(3));

    let err = h.handle.play("grace", vec![]).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::NotYourTurn, _)
    ));

    assert!(h.handle.play("mallory", vec![]).await.is_err());
}

#[tokio::test]
async fn an_empty_play_draws_and_passes_the_turn() {
    let h = start(&["ada", "grace"], seeded_config(4));

    h.handle.play("ada", vec![]).await.unwrap();
    settle().await;
    // Defused or not, a draw always ends the turn.
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("grace"));
}

#[tokio::test]
async fn unowned_card_ids_are_rejected_without_moving_the_turn() {
    let h = start(&["ada", "grace"], seeded_config(5));

    let err = h.handle.play("ada", vec![999_999]).await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::CardNotOwned, _)
    ));
    settle().await;
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("ada"));
}

#[tokio::test]
async fn draws_alone_play_the_session_to_completion() {
    let h = start(&["ada", "grace"], seeded_config(6));
    settle().await;

    // Drawing every turn must eventually explode someone: Deactivates run
    // out and one bomb is in the deck.
    for _ in 0..300 {
        let Some(turn) = current_turn(&h.gateway) else {
            break;
        };
        if h.handle.play(&turn, vec![]).await.is_err() {
            break;
        }
    }

    // Cleanup runs after the winning play's ack; poll briefly.
    let mut notice = None;
    for _ in 0..50 {
        notice = winner_notice(&h.gateway);
        if notice.is_some() && h.sessions.get(LOBBY).is_none() {
            break;
        }
        settle().await;
    }
    let notice = notice.expect("session should end with a winner");

    assert_eq!(notice.lobby_id, LOBBY);
    assert_eq!(notice.coins_earned, 50);
    assert_eq!(notice.per_player.len(), 2);
    assert!(h.sessions.get(LOBBY).is_none());

    let recorded = h.games.results_for(&notice.winner_username).await.unwrap();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].winner_username, notice.winner_username);
}

#[tokio::test]
async fn an_idle_turn_times_out_into_a_forced_draw() {
    let config = GameConfig {
        turn_timeout: Duration::from_millis(100),
        ..seeded_config(7)
    };
    let h = start(&["ada", "grace"], config);
    settle().await;
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("ada"));

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("grace"));
}

#[tokio::test]
async fn the_leader_can_pause_and_resume_the_turn_timer() {
    let config = GameConfig {
        turn_timeout: Duration::from_millis(150),
        ..seeded_config(8)
    };
    let h = start(&["ada", "grace"], config);
    settle().await;

    h.handle.pause_timer("ada").await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("ada"));

    // Non-leaders cannot resume it either.
    h.handle.resume_timer("grace").await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("ada"));

    h.handle.resume_timer("ada").await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("grace"));
}

#[tokio::test]
async fn a_disconnected_seat_stays_in_rotation() {
    let config = GameConfig {
        turn_timeout: Duration::from_millis(100),
        ..seeded_config(9)
    };
    let h = start(&["ada", "grace"], config);
    settle().await;

    h.handle.disconnect("ada").await;
    tokio::time::sleep(Duration::from_millis(400)).await;
    // The forced draw moved the turn on for the absent seat.
    assert_eq!(current_turn(&h.gateway).as_deref(), Some("grace"));
}
