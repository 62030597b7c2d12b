use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, Serialize, Clone, PartialEq)]
pub enum AppError {
    // Room-related errors
    #[error("Room not found")]
    RoomNotFound { room: String },

    #[error("Room does not exist")]
    RoomDoesNotExist { room: String },

    #[error("Room already has a host")]
    RoomHasHost { room: String },

    #[error("No free room codes, try again later")]
    RoomCodesExhausted,

    #[error("Only the host can start the game")]
    NotHost,

    #[error("You are not in this room")]
    NotInRoom,

    // Game-related errors
    #[error("Game has not started")]
    GameNotStarted,

    #[error("Not your turn")]
    NotPlayerTurn,

    #[error("Wait for the cards to turn back")]
    MismatchPending,

    #[error("Invalid card index")]
    InvalidCardIndex { index: i64 },

    #[error("Card already matched or currently flipped")]
    CardUnavailable { index: usize },

    // Validation errors
    #[error("Invalid player name: {reason}")]
    InvalidPlayerName { reason: String },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Serialization errors
    #[error("Failed to parse message: {message}")]
    SerializationError { message: String },

    #[error("WebSocket error: {message}")]
    WebSocketError { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorCategory {
    ClientError,
    ServerError,
    ValidationError,
    GameError,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::RoomNotFound { .. }
            | AppError::RoomDoesNotExist { .. }
            | AppError::RoomHasHost { .. }
            | AppError::RoomCodesExhausted
            | AppError::NotHost
            | AppError::NotInRoom => ErrorCategory::ClientError,

            AppError::InvalidPlayerName { .. }
            | AppError::InvalidConfig { .. }
            | AppError::SerializationError { .. } => ErrorCategory::ValidationError,

            AppError::WebSocketError { .. } | AppError::Internal { .. } => {
                ErrorCategory::ServerError
            }

            AppError::GameNotStarted
            | AppError::NotPlayerTurn
            | AppError::MismatchPending
            | AppError::InvalidCardIndex { .. }
            | AppError::CardUnavailable { .. } => ErrorCategory::GameError,
        }
    }

    pub fn should_log(&self) -> bool {
        matches!(self.category(), ErrorCategory::ServerError)
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            AppError::RoomNotFound { .. } => "RoomNotFound",
            AppError::RoomDoesNotExist { .. } => "RoomDoesNotExist",
            AppError::RoomHasHost { .. } => "RoomHasHost",
            AppError::RoomCodesExhausted => "RoomCodesExhausted",
            AppError::NotHost => "NotHost",
            AppError::NotInRoom => "NotInRoom",
            AppError::GameNotStarted => "GameNotStarted",
            AppError::NotPlayerTurn => "NotPlayerTurn",
            AppError::MismatchPending => "MismatchPending",
            AppError::InvalidCardIndex { .. } => "InvalidCardIndex",
            AppError::CardUnavailable { .. } => "CardUnavailable",
            AppError::InvalidPlayerName { .. } => "InvalidPlayerName",
            AppError::InvalidConfig { .. } => "InvalidConfig",
            AppError::SerializationError { .. } => "SerializationError",
            AppError::WebSocketError { .. } => "WebSocketError",
            AppError::Internal { .. } => "Internal",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::SerializationError { .. } => "Invalid message format".to_string(),
            AppError::WebSocketError { .. } | AppError::Internal { .. } => {
                "Something went wrong on the server".to_string()
            }
            _ => self.to_string(), // Use the error's display message
        }
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for AppError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        AppError::Internal {
            message: "Failed to send to a closed channel".to_string(),
        }
    }
}

pub mod validation {
    use super::AppError;

    pub const MAX_PLAYER_NAME_LEN: usize = 50;

    /// Trims `name` and substitutes `default` when nothing is left.
    pub fn normalize_player_name(name: Option<&str>, default: &str) -> Result<String, AppError> {
        let trimmed = name.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            return Ok(default.to_string());
        }
        if trimmed.chars().count() > MAX_PLAYER_NAME_LEN {
            return Err(AppError::InvalidPlayerName {
                reason: format!(
                    "Player name cannot exceed {} characters",
                    MAX_PLAYER_NAME_LEN
                ),
            });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AppError::InvalidPlayerName {
                reason: "Player name cannot contain control characters".to_string(),
            });
        }
        Ok(trimmed.to_string())
    }
}
