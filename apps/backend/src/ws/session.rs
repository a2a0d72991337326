//! WebSocket session actor: one per connected participant.
//!
//! The actor owns nothing but the socket. Lobby changes go through
//! `LobbyService`, plays go to the owning session task, and replies to
//! server-initiated requests resolve their hub listener. All server pushes
//! to this participant arrive as `OutboundMsg` through the hub.

use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind, ValidationKind};
use crate::gateway::ws::WsGateway;
use crate::gateway::{RequestKind, SeatReply};
use crate::repos::lobbies::LobbyPhase;
use crate::services::game_flow::{spawn_session, PlayOutcome};
use crate::services::LeaveOutcome;
use crate::state::app_state::AppState;
use crate::ws::hub::OutboundMsg;
use crate::ws::protocol::{ClientMsg, LobbyPlayer, ServerMsg, Status};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub username: String,
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<ConnectQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let username = query.into_inner().username;
    if username.trim().is_empty() {
        let err = DomainError::validation(ValidationKind::Other, "username required");
        return Err(AppError::from(err).into());
    }

    let session = WsSession::new(username, app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    username: String,
    app_state: web::Data<AppState>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(username: String, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            username,
            app_state,
            last_heartbeat: Instant::now(),
        }
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(username = %actor.username, "heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    /// Run lobby/game work off the actor and deliver results through the
    /// hub, which this connection is registered with.
    fn spawn_task<F>(&self, ctx: &mut ws::WebsocketContext<Self>, fut: F)
    where
        F: std::future::Future<Output = ()> + 'static,
    {
        ctx.spawn(fut.into_actor(self).map(|_, _, _| ()));
    }

    fn handle_msg(&mut self, msg: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let state = self.app_state.clone();
        let username = self.username.clone();

        match msg {
            ClientMsg::CreateLobby { max_players } => {
                self.spawn_task(ctx, async move {
                    let result = state.lobby_service().create(&username, max_players).await;
                    let msg = match &result {
                        Ok(lobby) => ServerMsg::CreateLobbyAck {
                            status: Status::ok(),
                            lobby_id: Some(lobby.lobby_id.clone()),
                        },
                        Err(err) => ServerMsg::CreateLobbyAck {
                            status: Status::from(err),
                            lobby_id: None,
                        },
                    };
                    state.hub().send(&username, msg);
                    if let Ok(lobby) = result {
                        push_lobby_state(&state, &lobby.lobby_id).await;
                    }
                });
            }

            ClientMsg::JoinLobby { lobby_id } => {
                self.spawn_task(ctx, async move {
                    let result = state.lobby_service().join(&lobby_id, &username).await;
                    let msg = match &result {
                        Ok(lobby) => ServerMsg::JoinLobbyAck {
                            status: Status::ok(),
                            lobby_id: Some(lobby.lobby_id.clone()),
                        },
                        Err(err) => ServerMsg::JoinLobbyAck {
                            status: Status::from(err),
                            lobby_id: None,
                        },
                    };
                    state.hub().send(&username, msg);
                    if result.is_ok() {
                        push_lobby_state(&state, &lobby_id).await;
                    }
                });
            }

            ClientMsg::LeaveLobby { lobby_id } => {
                self.spawn_task(ctx, async move {
                    leave_lobby(&state, &lobby_id, &username).await;
                });
            }

            ClientMsg::StartLobby { lobby_id } => {
                self.spawn_task(ctx, async move {
                    start_lobby(&state, &lobby_id, &username).await;
                });
            }

            ClientMsg::PlayedCards {
                lobby_id,
                played_cards,
            } => {
                self.spawn_task(ctx, async move {
                    let result = match state.sessions().get(&lobby_id) {
                        Some(session) => session.play(&username, played_cards).await,
                        None => Err(DomainError::not_found(
                            NotFoundKind::Game,
                            format!("no running game for lobby {lobby_id}"),
                        )),
                    };
                    let msg = match result {
                        Ok(outcome) => ServerMsg::PlayedCardsAck {
                            status: Status::ok(),
                            outcome,
                        },
                        Err(err) => ServerMsg::PlayedCardsAck {
                            status: Status::from(&err),
                            outcome: PlayOutcome::default(),
                        },
                    };
                    state.hub().send(&username, msg);
                });
            }

            ClientMsg::SelectPlayer { username: pick, .. } => {
                self.fulfil(RequestKind::SelectPlayer, SeatReply::Player { username: pick });
            }
            ClientMsg::SelectCard { card_id, .. } => {
                self.fulfil(RequestKind::SelectCard, SeatReply::Card { card_id });
            }
            ClientMsg::SelectCardType { card_type, .. } => {
                self.fulfil(RequestKind::SelectCardType, SeatReply::CardType { card_type });
            }
            ClientMsg::SelectNope { use_nope, .. } => {
                self.fulfil(RequestKind::SelectNope, SeatReply::Nope { use_nope });
            }
        }
    }

    fn fulfil(&self, kind: RequestKind, reply: SeatReply) {
        if !self.app_state.hub().fulfil(&self.username, kind, reply) {
            warn!(username = %self.username, ?kind, "unsolicited reply dropped");
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, username = %self.username, "ws session started");
        self.app_state.hub().register(
            &self.username,
            self.conn_id,
            ctx.address().recipient::<OutboundMsg>(),
        );
        self.start_heartbeat(ctx);

        // Re-sync a participant whose game is still running.
        let state = self.app_state.clone();
        let username = self.username.clone();
        self.spawn_task(ctx, async move {
            if let Ok(Some(lobby)) = state.lobby_service().lobby_of(&username).await {
                if lobby.phase == LobbyPhase::Active {
                    if let Some(session) = state.sessions().get(&lobby.lobby_id) {
                        session.reconnect(&username).await;
                    }
                }
            }
        });
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, username = %self.username, "ws session stopped");
        // Pending requests on this seat resolve as "no answer". A stale
        // actor whose registration a reconnect already replaced owns
        // nothing and must not tear the seat down.
        if !self.app_state.hub().unregister(&self.username, self.conn_id) {
            return;
        }

        let state = self.app_state.clone();
        let username = self.username.clone();
        actix::spawn(async move {
            if let Ok(Some(lobby)) = state.lobby_service().lobby_of(&username).await {
                leave_lobby(&state, &lobby.lobby_id, &username).await;
            }
        });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();
                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(msg) => self.handle_msg(msg, ctx),
                    Err(err) => {
                        warn!(username = %self.username, error = %err, "malformed client message");
                        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Invalid)));
                        ctx.stop();
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                warn!(username = %self.username, "binary frames are not part of the protocol");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Unsupported)));
                ctx.stop();
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(username = %self.username, error = %err, "ws protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<OutboundMsg> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: OutboundMsg, ctx: &mut Self::Context) -> Self::Result {
        match serde_json::to_string(&msg.0) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(username = %self.username, error = %err, "outbound serialization failed"),
        }
    }
}

/// Push the current member list to everyone in the lobby.
async fn push_lobby_state(state: &AppState, lobby_id: &str) {
    let Ok(members) = state.lobby_service().members(lobby_id).await else {
        return;
    };
    let players: Vec<LobbyPlayer> = members
        .iter()
        .map(|m| LobbyPlayer {
            name: m.username.clone(),
            is_leader: m.is_leader,
        })
        .collect();
    for member in &members {
        state.hub().send(
            &member.username,
            ServerMsg::LobbyState {
                status: Status::ok(),
                players: players.clone(),
                disband: false,
            },
        );
    }
}

async fn leave_lobby(state: &AppState, lobby_id: &str, username: &str) {
    // Disband notifications need the roster from before the change.
    let members_before = state
        .lobby_service()
        .members(lobby_id)
        .await
        .unwrap_or_default();

    match state.lobby_service().leave(lobby_id, username).await {
        Ok(LeaveOutcome::Left) => {
            state.hub().send(
                username,
                ServerMsg::LobbyState {
                    status: Status::ok(),
                    players: Vec::new(),
                    disband: true,
                },
            );
            push_lobby_state(state, lobby_id).await;
        }
        Ok(LeaveOutcome::Disbanded) => {
            for member in &members_before {
                state.hub().send(
                    &member.username,
                    ServerMsg::LobbyState {
                        status: Status::ok(),
                        players: Vec::new(),
                        disband: true,
                    },
                );
            }
        }
        Ok(LeaveOutcome::WasActive) => {
            if let Some(session) = state.sessions().get(lobby_id) {
                session.disconnect(username).await;
            }
        }
        Err(err) => {
            warn!(username, lobby_id, error = %err, "leave failed");
        }
    }
}

async fn start_lobby(state: &AppState, lobby_id: &str, username: &str) {
    let seated = match state.lobby_service().start(lobby_id, username).await {
        Ok(seated) => seated,
        Err(err) => {
            state.hub().send(
                username,
                ServerMsg::StartLobbyAck {
                    status: Status::from(&err),
                    num_players: None,
                },
            );
            return;
        }
    };

    let gateway = std::sync::Arc::new(WsGateway::new(
        state.hub(),
        lobby_id,
        seated.clone(),
        state.config().request_timeout,
    ));

    let result = spawn_session(
        lobby_id,
        &seated,
        gateway,
        state.lobby_store(),
        state.game_store(),
        state.sessions(),
        state.config().clone(),
    );

    match result {
        Ok(_) => {
            let ack = ServerMsg::StartLobbyAck {
                status: Status::ok(),
                num_players: Some(seated.len() as u8),
            };
            for seat_username in &seated {
                state.hub().send(seat_username, ack.clone());
            }
        }
        Err(err) => {
            state.hub().send(
                username,
                ServerMsg::StartLobbyAck {
                    status: Status::from(&err),
                    num_players: None,
                },
            );
        }
    }
}
