//! Production gateway: delivers engine events over the WebSocket hub and
//! races seat requests against their timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::state::SeatId;
use crate::gateway::{Gateway, GameEvent, SeatQuery, SeatReply};
use crate::ws::hub::SeatHub;
use crate::ws::protocol::{ServerMsg, Status};

pub struct WsGateway {
    hub: Arc<SeatHub>,
    lobby_id: String,
    /// Seat order fixed at session start; index is the SeatId.
    seats: Vec<String>,
    request_timeout: Duration,
}

impl WsGateway {
    pub fn new(
        hub: Arc<SeatHub>,
        lobby_id: impl Into<String>,
        seats: Vec<String>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            hub,
            lobby_id: lobby_id.into(),
            seats,
            request_timeout,
        }
    }

    fn username(&self, seat: SeatId) -> Option<&str> {
        self.seats.get(seat as usize).map(String::as_str)
    }

    fn event_to_msg(&self, event: GameEvent) -> ServerMsg {
        match event {
            GameEvent::State(snapshot) => ServerMsg::GameState {
                status: Status::ok(),
                snapshot,
            },
            GameEvent::Action(notice) => ServerMsg::NotifyAction {
                status: Status::ok(),
                trigger_user: notice.trigger_user,
                target_user: notice.target_user,
                action: notice.action,
            },
            GameEvent::Winner(notice) => ServerMsg::Winner {
                status: Status::ok(),
                winner_username: notice.winner_username,
                coins_earned: notice.coins_earned,
                lobby_id: notice.lobby_id,
                per_player: notice.per_player,
            },
        }
    }

    fn query_to_msg(&self, query: &SeatQuery) -> ServerMsg {
        let time_out = self.request_timeout.as_secs();
        match query {
            SeatQuery::SelectPlayer { candidates } => ServerMsg::SelectPlayer {
                status: Status::ok(),
                lobby_id: self.lobby_id.clone(),
                time_out,
                candidates: candidates.clone(),
            },
            SeatQuery::SelectCard { cards } => ServerMsg::SelectCard {
                status: Status::ok(),
                lobby_id: self.lobby_id.clone(),
                time_out,
                cards: cards.clone(),
            },
            SeatQuery::SelectCardType => ServerMsg::SelectCardType {
                status: Status::ok(),
                lobby_id: self.lobby_id.clone(),
                time_out,
            },
            SeatQuery::SelectNope {
                action,
                trigger_user,
            } => ServerMsg::SelectNope {
                status: Status::ok(),
                lobby_id: self.lobby_id.clone(),
                time_out,
                action: *action,
                trigger_user: trigger_user.clone(),
            },
        }
    }
}

#[async_trait]
impl Gateway for WsGateway {
    fn notify_seat(&self, seat: SeatId, event: GameEvent) {
        if let Some(username) = self.username(seat) {
            self.hub.send(username, self.event_to_msg(event));
        }
    }

    fn notify_all(&self, event: GameEvent) {
        for username in &self.seats {
            self.hub.send(username, self.event_to_msg(event.clone()));
        }
    }

    async fn request(&self, seat: SeatId, query: SeatQuery) -> Option<SeatReply> {
        let username = self.username(seat)?.to_string();
        let kind = query.kind();

        // A duplicate outstanding (target, event) pair resolves as "no
        // answer" rather than clobbering the first listener.
        let rx = self.hub.begin_request(&username, kind)?;
        self.hub.send(&username, self.query_to_msg(&query));

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(reply)) => Some(reply),
            // Sender dropped: the seat disconnected mid-request.
            Ok(Err(_)) => None,
            Err(_) => {
                debug!(username, ?kind, "seat request timed out");
                self.hub.cancel_request(&username, kind);
                None
            }
        }
    }
}
