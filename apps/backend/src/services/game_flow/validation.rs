//! Play validation. Checks run in a fixed order and the first failure wins;
//! the error is reported to the acting seat only, with no state mutation.

use crate::domain::cards::{Card, CardId};
use crate::domain::state::{GameState, SeatId};
use crate::errors::domain::{DomainError, ValidationKind};

/// Validate a non-empty play and resolve the referenced cards.
///
/// Order: seat in range, seat holds the turn, seat active, every card owned
/// by identity, and the set forms a playable combination (all one kind,
/// none of Bomb/Deactivate/Nope, wild kinds in groups of exactly 2 or 3).
pub fn validate_play(
    state: &GameState,
    seat: SeatId,
    card_ids: &[CardId],
) -> Result<Vec<Card>, DomainError> {
    let seat_state = state.seat(seat)?;

    if seat != state.turn_index {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            format!("seat {seat} played out of turn"),
        ));
    }

    if !seat_state.active {
        return Err(DomainError::validation(
            ValidationKind::SeatInactive,
            format!("seat {seat} was eliminated"),
        ));
    }

    let mut cards = Vec::with_capacity(card_ids.len());
    for &id in card_ids {
        match seat_state.hand.cards().iter().find(|c| c.id == id) {
            Some(card) => cards.push(*card),
            None => {
                return Err(DomainError::validation(
                    ValidationKind::CardNotOwned,
                    format!("card {id} is not in seat {seat}'s hand"),
                ))
            }
        }
    }

    let first = cards.first().ok_or_else(|| {
        DomainError::validation(ValidationKind::UnplayableCards, "empty play set")
    })?;

    if cards.iter().any(|c| c.kind != first.kind) {
        return Err(DomainError::validation(
            ValidationKind::UnplayableCards,
            "played cards must all be the same kind",
        ));
    }

    if !first.kind.is_playable() {
        return Err(DomainError::validation(
            ValidationKind::UnplayableCards,
            format!("{:?} cannot be played directly", first.kind),
        ));
    }

    if first.kind.is_wild() && !matches!(cards.len(), 2 | 3) {
        return Err(DomainError::validation(
            ValidationKind::UnplayableCards,
            format!("wild cards play in pairs or triples, got {}", cards.len()),
        ));
    }

    Ok(cards)
}

/// The turn checks alone (steps 1-3), used for the empty "draw" play.
pub fn validate_turn(state: &GameState, seat: SeatId) -> Result<(), DomainError> {
    let seat_state = state.seat(seat)?;
    if seat != state.turn_index {
        return Err(DomainError::validation(
            ValidationKind::NotYourTurn,
            format!("seat {seat} drew out of turn"),
        ));
    }
    if !seat_state.active {
        return Err(DomainError::validation(
            ValidationKind::SeatInactive,
            format!("seat {seat} was eliminated"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;
    use crate::config::GameConfig;
    use crate::domain::cards::{Card, CardKind};

    fn fixture() -> GameState {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let usernames = vec!["ada".to_string(), "grace".to_string(), "edsger".to_string()];
        GameState::deal("LOBBY0001", &usernames, &GameConfig::default(), &mut rng).unwrap()
    }

    fn plant(state: &mut GameState, seat: SeatId, kind: CardKind, n: usize) -> Vec<u64> {
        // Ids far above anything the deck minted.
        let base = 10_000 + (seat as u64) * 100 + state.seats[seat as usize].hand.len() as u64;
        let mut ids = Vec::new();
        for i in 0..n {
            let id = base + i as u64;
            state.seats[seat as usize].hand.push(Card { id, kind });
            ids.push(id);
        }
        ids
    }

    #[test]
    fn rejects_out_of_turn_play() {
        let mut state = fixture();
        let ids = plant(&mut state, 1, CardKind::Skip, 1);
        let err = validate_play(&state, 1, &ids).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::NotYourTurn, _)
        ));
    }

    #[test]
    fn rejects_unowned_card_id() {
        let state = fixture();
        let err = validate_play(&state, 0, &[999_999]).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::CardNotOwned, _)
        ));
    }

    #[test]
    fn rejects_inactive_seat() {
        let mut state = fixture();
        state.seats[0].active = false;
        let ids = plant(&mut state, 0, CardKind::Skip, 1);
        let err = validate_play(&state, 0, &ids).unwrap_err();
        assert!(matches!(
            err,
            DomainError::Validation(ValidationKind::SeatInactive, _)
        ));
    }

    #[test]
    fn rejects_forbidden_kinds() {
        for kind in [CardKind::Bomb, CardKind::Deactivate, CardKind::Nope] {
            let mut state = fixture();
            let ids = plant(&mut state, 0, kind, 1);
            let err = validate_play(&state, 0, &ids).unwrap_err();
            assert!(matches!(
                err,
                DomainError::Validation(ValidationKind::UnplayableCards, _)
            ));
        }
    }

    #[test]
    fn wild_groups_of_two_or_three_only() {
        for (n, ok) in [(1usize, false), (2, true), (3, true), (4, false)] {
            let mut state = fixture();
            let ids = plant(&mut state, 0, CardKind::TacoCat, n);
            let result = validate_play(&state, 0, &ids);
            assert_eq!(result.is_ok(), ok, "wild group of {n}");
        }
    }

    #[test]
    fn rejects_mixed_kinds() {
        let mut state = fixture();
        let mut ids = plant(&mut state, 0, CardKind::TacoCat, 1);
        ids.extend(plant(&mut state, 0, CardKind::BeardCat, 1));
        assert!(validate_play(&state, 0, &ids).is_err());
    }

    #[test]
    fn accepts_single_action_card() {
        let mut state = fixture();
        let ids = plant(&mut state, 0, CardKind::SeeFuture, 1);
        let cards = validate_play(&state, 0, &ids).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].kind, CardKind::SeeFuture);
    }
}
