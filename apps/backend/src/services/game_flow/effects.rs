//! Card-effect resolution and the draw/bomb path.
//!
//! Every effect resolves in full (nested nope chains and targeting queries
//! included) before the session takes its next command. A `None` reply to
//! any mid-effect query terminates that effect as a no-op; prior state
//! changes from the same play (the spent cards) stay in place.

use rand::Rng;
use serde::Serialize;
use tracing::warn;

use crate::domain::cards::{Card, CardKind};
use crate::domain::state::{GameState, SeatId};
use crate::errors::domain::DomainError;
use crate::gateway::{ActionKind, ActionNotice, Gateway, GameEvent, SeatQuery, SeatReply};
use crate::services::game_flow::nope::nope_chain;

/// Ack payload for `game-played-cards`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cards_see_future: Option<Vec<CardKind>>,
    pub has_shuffled: bool,
    pub skip_turn: bool,
    pub has_won_attack: bool,
    pub has_stolen_random_card: bool,
    pub has_stolen_card_by_type: bool,
}

/// Resolve an already-validated, non-empty play.
///
/// The played cards are spent into the discard pile up front: a noped
/// attack still costs its cards.
pub async fn resolve_play<R: Rng + Send>(
    state: &mut GameState,
    gateway: &dyn Gateway,
    rng: &mut R,
    seat: SeatId,
    cards: Vec<Card>,
) -> Result<PlayOutcome, DomainError> {
    let first_kind = cards[0].kind;

    state.discard_from_hand(seat, &cards)?;
    state.seat_mut(seat)?.cards_played += cards.len() as u32;
    state.last_card_played = Some(first_kind);

    let mut outcome = PlayOutcome::default();
    match first_kind {
        CardKind::SeeFuture => {
            // Revealed to the acting seat only, through the play's ack.
            outcome.cards_see_future =
                Some(state.deck.peek(3).iter().map(|c| c.kind).collect());
        }

        CardKind::Shuffle => {
            state.deck.shuffle(rng);
            outcome.has_shuffled = true;
        }

        CardKind::Skip => {
            if let Some(defender) = state.next_active_seat(seat) {
                if nope_chain(state, gateway, seat, defender, ActionKind::Skip).await? {
                    state.advance_turn();
                    outcome.skip_turn = true;
                }
            }
        }

        CardKind::Attack => {
            if let Some(defender) = state.next_active_seat(seat) {
                if nope_chain(state, gateway, seat, defender, ActionKind::Attack).await? {
                    // Chained attacks stack additively on top of the turns
                    // the attacker still owed.
                    state.turns_remaining = if state.turns_remaining > 1 {
                        state.turns_remaining + 2
                    } else {
                        2
                    };
                    state.turn_index = defender;
                    outcome.has_won_attack = true;
                }
            }
        }

        CardKind::Favor => {
            resolve_favor(state, gateway, seat).await?;
        }

        kind if kind.is_wild() && cards.len() == 2 => {
            outcome.has_stolen_random_card =
                resolve_random_steal(state, gateway, rng, seat).await?;
        }

        kind if kind.is_wild() && cards.len() == 3 => {
            outcome.has_stolen_card_by_type =
                resolve_typed_steal(state, gateway, seat).await?;
        }

        kind => {
            // validate_play admits nothing else; abort just this effect.
            warn!(?kind, seat, "play validated but no effect is defined");
        }
    }

    Ok(outcome)
}

/// Draw one card for `seat`, route bombs, then advance the turn. Used for
/// the explicit empty play and the forced draw on turn timeout.
pub fn draw_and_advance<R: Rng>(
    state: &mut GameState,
    gateway: &dyn Gateway,
    rng: &mut R,
    seat: SeatId,
) -> Result<(), DomainError> {
    match state.deck.draw_one() {
        Ok(card) if card.kind == CardKind::Bomb => {
            handle_bomb(state, gateway, rng, seat, card)?;
        }
        Ok(card) => {
            state.seat_mut(seat)?.hand.push(card);
        }
        Err(err) => {
            // Composition makes this unreachable in practice; the turn
            // still advances so the session cannot wedge.
            warn!(seat, error = %err, "draw from exhausted deck");
        }
    }

    state.check_winner();
    state.advance_turn();
    Ok(())
}

fn handle_bomb<R: Rng>(
    state: &mut GameState,
    gateway: &dyn Gateway,
    rng: &mut R,
    seat: SeatId,
    bomb: Card,
) -> Result<(), DomainError> {
    let seat_state = state.seat_mut(seat)?;
    let username = seat_state.username.clone();

    match seat_state.hand.remove_first_of_kind(CardKind::Deactivate) {
        Some(deactivate) => {
            state.discard.push(deactivate);
            state.deck.add_back_and_shuffle(bomb, rng);
            gateway.notify_all(GameEvent::Action(ActionNotice {
                trigger_user: username,
                target_user: None,
                action: ActionKind::BombDefused,
            }));
        }
        None => {
            seat_state.active = false;
            state.discard.push(bomb);
            gateway.notify_all(GameEvent::Action(ActionNotice {
                trigger_user: username,
                target_user: None,
                action: ActionKind::BombExploded,
            }));
        }
    }
    Ok(())
}

/// Ask the acting seat to name a target among the other active seats.
/// Any invalid or missing answer resolves to `None`.
async fn select_target(
    state: &GameState,
    gateway: &dyn Gateway,
    actor: SeatId,
) -> Result<Option<SeatId>, DomainError> {
    let candidates: Vec<String> = state
        .seats
        .iter()
        .filter(|s| s.active && s.seat != actor)
        .map(|s| s.username.clone())
        .collect();
    if candidates.is_empty() {
        return Ok(None);
    }

    let reply = gateway
        .request(actor, SeatQuery::SelectPlayer { candidates })
        .await;

    let Some(SeatReply::Player { username }) = reply else {
        return Ok(None);
    };

    match state.seats.iter().find(|s| s.username == username) {
        Some(target) if target.active && target.seat != actor => Ok(Some(target.seat)),
        _ => {
            warn!(actor, username, "invalid target selection");
            Ok(None)
        }
    }
}

async fn select_card_type(gateway: &dyn Gateway, seat: SeatId) -> Option<CardKind> {
    match gateway.request(seat, SeatQuery::SelectCardType).await {
        Some(SeatReply::CardType { card_type }) => Some(card_type),
        _ => None,
    }
}

/// Favor: target seat hands over one card. The acting seat names the kind
/// it wants; when the target holds cards but none of that kind, the target
/// picks the card to give (its top card if it does not answer).
async fn resolve_favor(
    state: &mut GameState,
    gateway: &dyn Gateway,
    seat: SeatId,
) -> Result<(), DomainError> {
    let Some(target) = select_target(state, gateway, seat).await? else {
        return Ok(());
    };

    if state.seat(target)?.hand.is_empty() {
        warn!(seat, target, "favor against an empty hand");
        return Ok(());
    }

    if !nope_chain(state, gateway, seat, target, ActionKind::Favor).await? {
        return Ok(());
    }

    let Some(kind) = select_card_type(gateway, seat).await else {
        return Ok(());
    };

    let card = match state.seat_mut(target)?.hand.remove_first_of_kind(kind) {
        Some(card) => Some(card),
        None => {
            let hand = state.seat(target)?.hand.cards().to_vec();
            let chosen = gateway
                .request(target, SeatQuery::SelectCard { cards: hand.clone() })
                .await;
            let card_id = match chosen {
                Some(SeatReply::Card { card_id })
                    if hand.iter().any(|c| c.id == card_id) =>
                {
                    card_id
                }
                // No answer: the target's top card goes over.
                _ => match hand.last() {
                    Some(card) => card.id,
                    None => return Ok(()),
                },
            };
            state.seat_mut(target)?.hand.remove_by_id(card_id)
        }
    };

    if let Some(card) = card {
        state.seat_mut(seat)?.hand.push(card);
    }
    Ok(())
}

/// Two matching wilds: steal one uniformly-random card.
async fn resolve_random_steal<R: Rng + Send>(
    state: &mut GameState,
    gateway: &dyn Gateway,
    rng: &mut R,
    seat: SeatId,
) -> Result<bool, DomainError> {
    let Some(target) = select_target(state, gateway, seat).await? else {
        return Ok(false);
    };

    if !nope_chain(state, gateway, seat, target, ActionKind::RandomSteal).await? {
        return Ok(false);
    }

    match state.seat_mut(target)?.hand.remove_random(rng) {
        Some(card) => {
            state.seat_mut(seat)?.hand.push(card);
            Ok(true)
        }
        None => {
            warn!(seat, target, "random steal against an empty hand");
            Ok(false)
        }
    }
}

/// Three matching wilds: name a kind and steal the first match, or
/// broadcast the miss.
async fn resolve_typed_steal(
    state: &mut GameState,
    gateway: &dyn Gateway,
    seat: SeatId,
) -> Result<bool, DomainError> {
    let Some(target) = select_target(state, gateway, seat).await? else {
        return Ok(false);
    };

    let Some(kind) = select_card_type(gateway, seat).await else {
        return Ok(false);
    };

    if !nope_chain(state, gateway, seat, target, ActionKind::TypedSteal).await? {
        return Ok(false);
    }

    match state.seat_mut(target)?.hand.remove_first_of_kind(kind) {
        Some(card) => {
            state.seat_mut(seat)?.hand.push(card);
            Ok(true)
        }
        None => {
            let trigger_user = state.seat(seat)?.username.clone();
            let target_user = state.seat(target)?.username.clone();
            gateway.notify_all(GameEvent::Action(ActionNotice {
                trigger_user,
                target_user: Some(target_user),
                action: ActionKind::StealFailed,
            }));
            Ok(false)
        }
    }
}
