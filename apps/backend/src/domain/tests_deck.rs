use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::config::GameConfig;
use crate::domain::cards::{Card, CardKind};
use crate::domain::deck::{Deck, MAX_PLAYERS, MIN_PLAYERS};
use crate::domain::pile::Pile;
use crate::domain::state::GameState;
use crate::errors::domain::{DomainError, ValidationKind};

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("player{i}")).collect()
}

#[test]
fn standard_deal_matches_the_arithmetic() {
    let config = GameConfig::default();
    for players in MIN_PLAYERS..=MAX_PLAYERS {
        let mut rng = ChaCha20Rng::seed_from_u64(players as u64);
        let (deck, hands) = Deck::standard(&config, players, &mut rng).unwrap();

        assert_eq!(hands.len(), players);
        for hand in &hands {
            // hand_size dealt plus the guaranteed Deactivate.
            assert_eq!(hand.len(), config.hand_size + 1);
            assert!(hand.has_kind(CardKind::Deactivate));
            assert!(!hand.has_kind(CardKind::Bomb));
        }

        let bombs_in_deck = deck
            .peek(deck.len())
            .iter()
            .filter(|c| c.kind == CardKind::Bomb)
            .count();
        assert_eq!(bombs_in_deck, players - 1);

        let expected_minted = config.base_deck_size() + players + (players - 1);
        assert_eq!(deck.minted() as usize, expected_minted);
        assert_eq!(
            deck.len(),
            expected_minted - players * (config.hand_size + 1)
        );
    }
}

#[test]
fn piles_draw_most_recently_added_first() {
    let mut pile: Pile = (0..5u64)
        .map(|id| Card {
            id,
            kind: CardKind::Skip,
        })
        .collect();

    let drawn = pile.draw(3).unwrap();
    let ids: Vec<u64> = drawn.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![4, 3, 2]);
    assert_eq!(pile.len(), 2);

    let peeked: Vec<u64> = pile.peek(10).iter().map(|c| c.id).collect();
    assert_eq!(peeked, vec![1, 0]);
}

#[test]
fn overdrawing_a_pile_is_an_insufficient_cards_error() {
    let mut pile: Pile = (0..2u64)
        .map(|id| Card {
            id,
            kind: CardKind::Skip,
        })
        .collect();

    let err = pile.draw(3).unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InsufficientCards, _)
    ));
    // Nothing was removed on failure.
    assert_eq!(pile.len(), 2);
}

#[test]
fn player_count_out_of_range_is_rejected() {
    let config = GameConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    assert!(Deck::standard(&config, 1, &mut rng).is_err());
    assert!(Deck::standard(&config, 5, &mut rng).is_err());
}

#[test]
fn card_ids_are_unique_across_deck_and_hands() {
    let config = GameConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let (deck, hands) = Deck::standard(&config, 4, &mut rng).unwrap();

    let mut ids: Vec<u64> = deck.peek(deck.len()).iter().map(|c| c.id).collect();
    for hand in &hands {
        ids.extend(hand.cards().iter().map(|c| c.id));
    }
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn defused_bomb_returns_without_minting() {
    let config = GameConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let (mut deck, _) = Deck::standard(&config, 2, &mut rng).unwrap();

    let minted_before = deck.minted();
    let len_before = deck.len();
    let card = deck.draw_one().unwrap();
    deck.add_back_and_shuffle(card, &mut rng);

    assert_eq!(deck.minted(), minted_before);
    assert_eq!(deck.len(), len_before);
}

proptest! {
    #[test]
    fn every_fresh_deal_conserves_cards(players in MIN_PLAYERS..=MAX_PLAYERS, seed in any::<u64>()) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let state =
            GameState::deal("LOBBY0001", &names(players), &GameConfig::default(), &mut rng)
                .unwrap();
        prop_assert!(state.cards_conserved());
    }

    #[test]
    fn drawing_down_the_deck_conserves_cards(seed in any::<u64>(), draws in 0usize..20) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut state =
            GameState::deal("LOBBY0001", &names(3), &GameConfig::default(), &mut rng).unwrap();
        for i in 0..draws.min(state.deck.len()) {
            let card = state.deck.draw_one().unwrap();
            state.seats[i % 3].hand.push(card);
        }
        prop_assert!(state.cards_conserved());
    }
}
