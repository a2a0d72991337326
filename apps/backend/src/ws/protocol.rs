//! Wire protocol for the WebSocket session.
//!
//! Event names are kebab-case tags; payload fields are camelCase. Every
//! server payload carries `{error, errorMsg}`; when `error` is true the
//! rest of the payload is undefined and must be ignored by clients.

use serde::{Deserialize, Serialize};

use crate::domain::cards::{Card, CardId, CardKind};
use crate::domain::snapshot::GameSnapshot;
use crate::errors::domain::DomainError;
use crate::gateway::{ActionKind, PlayerHistory};
use crate::services::game_flow::PlayOutcome;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    #[serde(rename = "create-lobby", rename_all = "camelCase")]
    CreateLobby { max_players: u8 },

    #[serde(rename = "join-lobby", rename_all = "camelCase")]
    JoinLobby { lobby_id: String },

    #[serde(rename = "leave-lobby", rename_all = "camelCase")]
    LeaveLobby { lobby_id: String },

    #[serde(rename = "start-lobby", rename_all = "camelCase")]
    StartLobby { lobby_id: String },

    #[serde(rename = "game-played-cards", rename_all = "camelCase")]
    PlayedCards {
        lobby_id: String,
        /// Card ids; empty means "draw and end my turn".
        played_cards: Vec<CardId>,
    },

    // Replies to server-initiated requests (§ gateway). Each resolves the
    // one-shot listener registered for the same event.
    #[serde(rename = "game-select-player", rename_all = "camelCase")]
    SelectPlayer { lobby_id: String, username: String },

    #[serde(rename = "game-select-card", rename_all = "camelCase")]
    SelectCard { lobby_id: String, card_id: CardId },

    #[serde(rename = "game-select-card-type", rename_all = "camelCase")]
    SelectCardType { lobby_id: String, card_type: CardKind },

    #[serde(rename = "game-select-nope", rename_all = "camelCase")]
    SelectNope { lobby_id: String, use_nope: bool },
}

/// `{error, errorMsg}` pair carried by every server payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub error: bool,
    pub error_msg: String,
}

impl Status {
    pub fn ok() -> Self {
        Self {
            error: false,
            error_msg: String::new(),
        }
    }
}

impl From<&DomainError> for Status {
    fn from(err: &DomainError) -> Self {
        Self {
            error: true,
            error_msg: format!("{}: {}", err.code(), err.detail()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayer {
    pub name: String,
    pub is_leader: bool,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    #[serde(rename = "create-lobby", rename_all = "camelCase")]
    CreateLobbyAck {
        #[serde(flatten)]
        status: Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        lobby_id: Option<String>,
    },

    #[serde(rename = "join-lobby", rename_all = "camelCase")]
    JoinLobbyAck {
        #[serde(flatten)]
        status: Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        lobby_id: Option<String>,
    },

    #[serde(rename = "start-lobby", rename_all = "camelCase")]
    StartLobbyAck {
        #[serde(flatten)]
        status: Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        num_players: Option<u8>,
    },

    #[serde(rename = "lobby-state", rename_all = "camelCase")]
    LobbyState {
        #[serde(flatten)]
        status: Status,
        players: Vec<LobbyPlayer>,
        disband: bool,
    },

    #[serde(rename = "game-state", rename_all = "camelCase")]
    GameState {
        #[serde(flatten)]
        status: Status,
        #[serde(flatten)]
        snapshot: GameSnapshot,
    },

    #[serde(rename = "game-played-cards", rename_all = "camelCase")]
    PlayedCardsAck {
        #[serde(flatten)]
        status: Status,
        #[serde(flatten)]
        outcome: PlayOutcome,
    },

    #[serde(rename = "game-select-player", rename_all = "camelCase")]
    SelectPlayer {
        #[serde(flatten)]
        status: Status,
        lobby_id: String,
        time_out: u64,
        candidates: Vec<String>,
    },

    #[serde(rename = "game-select-card", rename_all = "camelCase")]
    SelectCard {
        #[serde(flatten)]
        status: Status,
        lobby_id: String,
        time_out: u64,
        cards: Vec<Card>,
    },

    #[serde(rename = "game-select-card-type", rename_all = "camelCase")]
    SelectCardType {
        #[serde(flatten)]
        status: Status,
        lobby_id: String,
        time_out: u64,
    },

    #[serde(rename = "game-select-nope", rename_all = "camelCase")]
    SelectNope {
        #[serde(flatten)]
        status: Status,
        lobby_id: String,
        time_out: u64,
        action: ActionKind,
        trigger_user: String,
    },

    #[serde(rename = "winner", rename_all = "camelCase")]
    Winner {
        #[serde(flatten)]
        status: Status,
        winner_username: String,
        coins_earned: u32,
        lobby_id: String,
        per_player: Vec<PlayerHistory>,
    },

    #[serde(rename = "notify-action", rename_all = "camelCase")]
    NotifyAction {
        #[serde(flatten)]
        status: Status,
        trigger_user: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        target_user: Option<String>,
        action: ActionKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_msg_parses_kebab_case_tags() {
        let msg: ClientMsg =
            serde_json::from_str(r#"{"type":"create-lobby","maxPlayers":3}"#).unwrap();
        assert!(matches!(msg, ClientMsg::CreateLobby { max_players: 3 }));

        let msg: ClientMsg = serde_json::from_str(
            r#"{"type":"game-played-cards","lobbyId":"ABCDEFGH1","playedCards":[4,9]}"#,
        )
        .unwrap();
        match msg {
            ClientMsg::PlayedCards {
                lobby_id,
                played_cards,
            } => {
                assert_eq!(lobby_id, "ABCDEFGH1");
                assert_eq!(played_cards, vec![4, 9]);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn server_msg_carries_error_fields() {
        let msg = ServerMsg::CreateLobbyAck {
            status: Status::ok(),
            lobby_id: Some("ABCDEFGH1".to_string()),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "create-lobby");
        assert_eq!(json["error"], false);
        assert_eq!(json["errorMsg"], "");
        assert_eq!(json["lobbyId"], "ABCDEFGH1");
    }
}
