//! Counter-play ("nope") chain between an initiator and a defender.
//!
//! The chain alternates starting with the defender. Each affirmative Nope
//! is spent from that seat's hand, broadcast, and flips which side is being
//! challenged. The loop ends the first time the asked seat holds no Nope or
//! declines (a timed-out request counts as declining); the contested effect
//! succeeds iff that final seat is the defender.

use tracing::info;

use crate::domain::cards::CardKind;
use crate::domain::state::{GameState, SeatId};
use crate::errors::domain::DomainError;
use crate::gateway::{ActionKind, ActionNotice, Gateway, GameEvent, SeatQuery, SeatReply};

/// Run the chain for a contested `action`. Returns true when the effect
/// goes through.
pub async fn nope_chain(
    state: &mut GameState,
    gateway: &dyn Gateway,
    initiator: SeatId,
    defender: SeatId,
    action: ActionKind,
) -> Result<bool, DomainError> {
    let initiator_name = state.seat(initiator)?.username.clone();
    let defender_name = state.seat(defender)?.username.clone();

    // Everyone learns of the incoming action; the defender reacts first.
    gateway.notify_all(GameEvent::Action(ActionNotice {
        trigger_user: initiator_name.clone(),
        target_user: Some(defender_name.clone()),
        action,
    }));

    let mut asked = defender;
    loop {
        if !state.seat(asked)?.hand.has_kind(CardKind::Nope) {
            break;
        }

        let challenger = if asked == defender {
            &initiator_name
        } else {
            &defender_name
        };
        let reply = gateway
            .request(
                asked,
                SeatQuery::SelectNope {
                    action,
                    trigger_user: challenger.clone(),
                },
            )
            .await;

        match reply {
            Some(SeatReply::Nope { use_nope: true }) => {
                let asked_name = {
                    let seat = state.seat_mut(asked)?;
                    // has_kind checked above
                    if let Some(nope) = seat.hand.remove_first_of_kind(CardKind::Nope) {
                        let name = seat.username.clone();
                        state.discard.push(nope);
                        name
                    } else {
                        break;
                    }
                };
                gateway.notify_all(GameEvent::Action(ActionNotice {
                    trigger_user: asked_name,
                    target_user: None,
                    action: ActionKind::NopeUsed,
                }));
                asked = if asked == defender { initiator } else { defender };
            }
            // Declined, timed out, disconnected, or malformed: the chain
            // ends with `asked` holding priority.
            _ => break,
        }
    }

    let success = asked == defender;
    info!(initiator, defender, ?action, success, "nope chain resolved");
    Ok(success)
}
