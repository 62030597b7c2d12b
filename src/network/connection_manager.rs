use futures_util::{stream::SplitSink, SinkExt};
use std::collections::HashMap;
use tokio::net::TcpStream;
use tokio_tungstenite::{tungstenite::Message, WebSocketStream};

use crate::{AppError, AppResult};

pub type WebSocketSender = SplitSink<WebSocketStream<TcpStream>, Message>;

#[derive(Debug)]
struct WebSocketConnection {
    sender: WebSocketSender,
}

/// Owns the write half of every open socket.
pub struct ConnectionManager {
    connections: HashMap<String, WebSocketConnection>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    pub fn add_connection(&mut self, id: String, sender: WebSocketSender) {
        tracing::debug!(connection_id = %id, "📝 added connection");
        self.connections.insert(id, WebSocketConnection { sender });
        tracing::debug!(total = self.connection_count(), "open connections");
    }

    pub async fn remove_connection(&mut self, id: &str) {
        if let Some(mut connection) = self.connections.remove(id) {
            let _ = connection.sender.close().await;
            tracing::debug!(connection_id = %id, "🗑️ removed connection");
        }
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub async fn send_to_player(&mut self, connection_id: &str, message: &str) -> AppResult<()> {
        let connection = self
            .connections
            .get_mut(connection_id)
            .ok_or_else(|| AppError::WebSocketError {
                message: format!("connection {} not found", connection_id),
            })?;

        connection
            .sender
            .send(Message::Text(message.to_string()))
            .await
            .map_err(|err| AppError::WebSocketError {
                message: err.to_string(),
            })
    }

    /// Sends to each listed connection, dropping the ones whose socket failed.
    pub async fn send_to_players(&mut self, connections_id: &[String], message: &str) {
        let mut failed_connections = Vec::new();

        for connection_id in connections_id {
            if let Err(err) = self.send_to_player(connection_id, message).await {
                tracing::warn!(%connection_id, %err, "❌ failed to send");
                failed_connections.push(connection_id.clone());
            }
        }

        for failed_id in failed_connections {
            self.remove_connection(&failed_id).await;
        }
    }
}
