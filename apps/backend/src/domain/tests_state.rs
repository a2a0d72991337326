use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::GameConfig;
use crate::domain::state::GameState;

fn fixture(players: usize) -> GameState {
    let usernames: Vec<String> = (0..players).map(|i| format!("player{i}")).collect();
    let mut rng = ChaCha20Rng::seed_from_u64(42);
    GameState::deal("LOBBY0001", &usernames, &GameConfig::default(), &mut rng).unwrap()
}

#[test]
fn turn_rotation_skips_eliminated_seats() {
    let mut state = fixture(4);
    state.seats[1].active = false;

    assert_eq!(state.turn_index, 0);
    state.advance_turn();
    assert_eq!(state.turn_index, 2);
    state.advance_turn();
    assert_eq!(state.turn_index, 3);
    state.advance_turn();
    assert_eq!(state.turn_index, 0);
}

#[test]
fn attack_stack_burns_down_before_the_pointer_moves() {
    let mut state = fixture(3);
    state.turns_remaining = 3;

    state.advance_turn();
    assert_eq!(state.turn_index, 0);
    assert_eq!(state.turns_remaining, 2);
    state.advance_turn();
    assert_eq!(state.turn_index, 0);
    assert_eq!(state.turns_remaining, 1);
    state.advance_turn();
    assert_eq!(state.turn_index, 1);
    assert_eq!(state.turns_remaining, 1);
}

#[test]
fn an_eliminated_seat_forfeits_its_stacked_turns() {
    let mut state = fixture(3);
    state.turn_index = 1;
    state.turns_remaining = 2;
    state.seats[1].active = false;

    // No ghost turn: the pointer leaves the dead seat immediately.
    state.advance_turn();
    assert_eq!(state.turn_index, 2);
    assert_eq!(state.turns_remaining, 1);
}

#[test]
fn next_active_seat_wraps_and_handles_a_lone_survivor() {
    let mut state = fixture(3);
    assert_eq!(state.next_active_seat(2), Some(0));

    state.seats[0].active = false;
    state.seats[2].active = false;
    // Seat 1 is the only active seat; there is no "next" other seat.
    assert_eq!(state.next_active_seat(1), None);
}

#[test]
fn winner_is_declared_at_one_active_seat_and_sticks() {
    let mut state = fixture(3);
    assert_eq!(state.check_winner(), None);

    state.seats[0].active = false;
    assert_eq!(state.check_winner(), None);

    state.seats[2].active = false;
    assert_eq!(state.check_winner(), Some(1));

    // A later recompute never reassigns.
    assert_eq!(state.check_winner(), Some(1));
}

#[test]
fn discard_from_hand_moves_exactly_the_named_cards() {
    let mut state = fixture(2);
    let picked: Vec<_> = state.seats[0].hand.cards()[..2].to_vec();
    let before = state.seats[0].hand.len();

    state.discard_from_hand(0, &picked).unwrap();
    assert_eq!(state.seats[0].hand.len(), before - 2);
    for card in &picked {
        assert!(state.discard.contains_id(card.id));
        assert!(!state.seats[0].hand.contains_id(card.id));
    }
    assert!(state.cards_conserved());
}

#[test]
fn seat_lookup_by_username() {
    let state = fixture(2);
    assert_eq!(state.seat_of_username("player1").unwrap(), 1);
    assert!(state.seat_of_username("stranger").is_err());
}
