use serde::{Deserialize, Deserializer, Serialize};

use crate::AppError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientMessage {
    Ping,
    ReserveRoom,
    CreateRoom {
        #[serde(default)]
        room: Option<String>,
        #[serde(default)]
        name: Option<String>,
    },
    JoinRoom {
        #[serde(default, deserialize_with = "null_as_empty")]
        room: String,
        #[serde(default)]
        name: Option<String>,
    },
    StartGame {
        #[serde(default, deserialize_with = "null_as_empty")]
        room: String,
    },
    FlipCard {
        #[serde(default, deserialize_with = "null_as_empty")]
        room: String,
        #[serde(default = "missing_index", deserialize_with = "lenient_index")]
        index: i64,
    },
    LeaveRoom {
        #[serde(default, deserialize_with = "null_as_empty")]
        room: String,
    },
}

fn missing_index() -> i64 {
    -1
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawIndex {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Accepts `3`, `3.0` and `"3"`. Anything unreadable becomes `-1`, which the
/// board rejects as an invalid index.
fn lenient_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let index = match Option::<RawIndex>::deserialize(deserializer)? {
        Some(RawIndex::Integer(index)) => index,
        Some(RawIndex::Float(index)) if index.is_finite() => index.trunc() as i64,
        Some(RawIndex::Text(text)) => text.trim().parse().unwrap_or_else(|_| missing_index()),
        Some(RawIndex::Float(_)) | None => missing_index(),
    };
    Ok(index)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerName {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PlayerScore {
    pub name: String,
    pub score: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerResponse {
    Connected {
        connection_id: String,
    },
    Pong,
    RoomReserved {
        room: String,
    },
    RoomCreated {
        room: String,
    },
    CreateFailed {
        reason: String,
    },
    JoinOk {
        room: String,
    },
    JoinFailed {
        reason: String,
    },
    LobbyUpdate {
        room: String,
        players: Vec<PlayerName>,
        host: Option<String>,
        started: bool,
    },
    GameStarted {
        card_count: usize,
        players: Vec<PlayerScore>,
        current_turn: usize,
    },
    BoardState {
        revealed: Vec<bool>,
        temp: Vec<usize>,
        players: Vec<PlayerScore>,
        current_turn: usize,
    },
    CardFlipped {
        index: usize,
        value: String,
    },
    MatchResult {
        #[serde(rename = "match")]
        matched: bool,
        indices: [usize; 2],
        player: usize,
    },
    GameOver {
        players: Vec<PlayerScore>,
    },
    Error {
        msg: String,
    },
    TurnError {
        msg: String,
    },
}

impl ServerResponse {
    pub fn from_app_error(error: &AppError) -> Self {
        match error {
            AppError::NotPlayerTurn => ServerResponse::TurnError {
                msg: error.user_friendly_message(),
            },
            AppError::RoomHasHost { .. } => ServerResponse::CreateFailed {
                reason: error.user_friendly_message(),
            },
            AppError::RoomDoesNotExist { .. } => ServerResponse::JoinFailed {
                reason: error.user_friendly_message(),
            },
            _ => ServerResponse::Error {
                msg: error.user_friendly_message(),
            },
        }
    }
}

pub fn deserialize_message(json: &str) -> Result<ClientMessage, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn serialize_message(message: &ClientMessage) -> Result<String, serde_json::Error> {
    serde_json::to_string(message)
}

pub fn deserialize_response(json: &str) -> Result<ServerResponse, serde_json::Error> {
    serde_json::from_str(json)
}

pub fn serialize_response(response: ServerResponse) -> String {
    // Payloads are plain data; encoding does not fail in practice.
    serde_json::to_string(&response).unwrap_or_else(|err| {
        tracing::error!(%err, "failed to serialize response");
        r#"{"event":"error","data":{"msg":"Internal server error"}}"#.to_string()
    })
}
