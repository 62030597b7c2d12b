use tokio::sync::mpsc;

use crate::actors::lobby_actor::LobbyMessage;
use crate::network::messages::ClientMessage;
use crate::{AppError, AppResult};

/// Handle connection tasks use to reach the lobby actor.
#[derive(Clone)]
pub struct ActorRegistry {
    lobby_sender: mpsc::UnboundedSender<LobbyMessage>,
}

impl ActorRegistry {
    pub fn new(lobby_sender: mpsc::UnboundedSender<LobbyMessage>) -> Self {
        Self { lobby_sender }
    }

    pub fn send_lobby_message(&self, message: LobbyMessage) -> AppResult<()> {
        self.lobby_sender
            .send(message)
            .map_err(|_| AppError::Internal {
                message: "Failed to send message to lobby actor".to_string(),
            })
    }

    pub fn forward_client_message(
        &self,
        connection_id: &str,
        message: ClientMessage,
    ) -> AppResult<()> {
        self.send_lobby_message(LobbyMessage::Client {
            connection_id: connection_id.to_string(),
            message,
        })
    }

    pub fn disconnect(&self, connection_id: &str) -> AppResult<()> {
        self.send_lobby_message(LobbyMessage::Disconnect {
            connection_id: connection_id.to_string(),
        })
    }
}
