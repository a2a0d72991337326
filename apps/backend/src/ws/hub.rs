//! Connection registry and pending-request table.
//!
//! The hub maps usernames to live WebSocket session actors and holds the
//! one-shot listeners for server-initiated requests. Both maps are mutated
//! from the event-loop context only and are pruned on every disconnect so
//! nothing leaks across sessions.

use actix::prelude::*;
use dashmap::DashMap;
use tokio::sync::oneshot;
use tracing::warn;
use uuid::Uuid;

use crate::gateway::{RequestKind, SeatReply};
use crate::ws::protocol::ServerMsg;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct OutboundMsg(pub ServerMsg);

#[derive(Default)]
pub struct SeatHub {
    connections: DashMap<String, (Uuid, Recipient<OutboundMsg>)>,
    pending: DashMap<(String, RequestKind), oneshot::Sender<SeatReply>>,
}

impl SeatHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a username to its live session actor. A reconnect replaces the
    /// previous recipient; `conn_id` marks which connection owns the entry.
    pub fn register(&self, username: &str, conn_id: Uuid, recipient: Recipient<OutboundMsg>) {
        self.connections
            .insert(username.to_string(), (conn_id, recipient));
    }

    /// Drop the connection and resolve every request pending on it as "no
    /// answer" (the receivers observe the dropped senders). A stale caller
    /// whose registration was already replaced by a reconnect gets `false`
    /// and must not touch the seat: the replacement owns it now.
    pub fn unregister(&self, username: &str, conn_id: Uuid) -> bool {
        let replaced = self
            .connections
            .get(username)
            .is_some_and(|entry| entry.value().0 != conn_id);
        if replaced {
            return false;
        }
        self.connections.remove(username);
        self.resolve_pending_for(username);
        true
    }

    pub fn is_connected(&self, username: &str) -> bool {
        self.connections.contains_key(username)
    }

    /// Fire-and-forget delivery; silently dropped when not connected.
    pub fn send(&self, username: &str, msg: ServerMsg) {
        if let Some(entry) = self.connections.get(username) {
            entry.value().1.do_send(OutboundMsg(msg));
        }
    }

    /// Register the one-shot listener for a (target, event) request.
    /// Returns `None` when a request on that pair is already outstanding,
    /// which is a caller error per the gateway contract.
    pub fn begin_request(
        &self,
        username: &str,
        kind: RequestKind,
    ) -> Option<oneshot::Receiver<SeatReply>> {
        let key = (username.to_string(), kind);
        if self.pending.contains_key(&key) {
            warn!(username, ?kind, "duplicate outstanding request");
            return None;
        }
        let (tx, rx) = oneshot::channel();
        self.pending.insert(key, tx);
        Some(rx)
    }

    /// Discard the listener after a timeout; the late reply, if any, is
    /// dropped.
    pub fn cancel_request(&self, username: &str, kind: RequestKind) {
        self.pending.remove(&(username.to_string(), kind));
    }

    /// Route a client reply to its waiting request. Returns false for
    /// unsolicited replies.
    pub fn fulfil(&self, username: &str, kind: RequestKind, reply: SeatReply) -> bool {
        match self.pending.remove(&(username.to_string(), kind)) {
            Some((_, tx)) => tx.send(reply).is_ok(),
            None => false,
        }
    }

    /// Resolve all of a seat's outstanding requests as "no answer".
    pub fn resolve_pending_for(&self, username: &str) {
        self.pending.retain(|(user, _), _| user != username);
    }
}
