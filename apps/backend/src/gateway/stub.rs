//! Scripted gateway double for engine tests.
//!
//! Replies are consumed front-to-back, one per `request` call; an exhausted
//! script answers `None`, which is exactly what a timed-out participant
//! looks like to the engine.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::state::SeatId;
use crate::gateway::{Gateway, GameEvent, RequestKind, SeatQuery, SeatReply};

#[derive(Default)]
pub struct StubGateway {
    replies: Mutex<VecDeque<Option<SeatReply>>>,
    requests: Mutex<Vec<(SeatId, RequestKind)>>,
    events: Mutex<Vec<(Option<SeatId>, GameEvent)>>,
}

impl StubGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the answer for the next `request` call.
    pub fn push_reply(&self, reply: Option<SeatReply>) {
        self.replies.lock().push_back(reply);
    }

    /// Every `request` issued so far, in order.
    pub fn requests(&self) -> Vec<(SeatId, RequestKind)> {
        self.requests.lock().clone()
    }

    /// Every push issued so far; `None` seat means a broadcast.
    pub fn events(&self) -> Vec<(Option<SeatId>, GameEvent)> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl Gateway for StubGateway {
    fn notify_seat(&self, seat: SeatId, event: GameEvent) {
        self.events.lock().push((Some(seat), event));
    }

    fn notify_all(&self, event: GameEvent) {
        self.events.lock().push((None, event));
    }

    async fn request(&self, seat: SeatId, query: SeatQuery) -> Option<SeatReply> {
        self.requests.lock().push((seat, query.kind()));
        self.replies.lock().pop_front().flatten()
    }
}
