use futures_util::StreamExt;
use std::error::Error;
use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{accept_async, tungstenite::Message};

use crate::network::messages::{deserialize_message, serialize_response, ServerResponse};
use crate::{ActorRegistry, AppError, ConnectionCommand};

pub struct ConnectionHandler;

impl ConnectionHandler {
    pub async fn handle_connection(
        stream: TcpStream,
        connection_id: String,
        actor_registry: Arc<ActorRegistry>,
        cmd_sender: mpsc::UnboundedSender<ConnectionCommand>,
    ) -> Result<(), Box<dyn Error>> {
        let ws_stream = accept_async(stream).await?;
        tracing::debug!(%connection_id, "✅ WebSocket connection established");

        let (ws_sender, mut ws_receiver) = ws_stream.split();

        cmd_sender.send(ConnectionCommand::AddConnection {
            id: connection_id.clone(),
            sender: ws_sender,
        })?;

        cmd_sender.send(ConnectionCommand::SendToPlayer {
            connection_id: connection_id.clone(),
            message: serialize_response(ServerResponse::Connected {
                connection_id: connection_id.clone(),
            }),
        })?;

        // Forward every parsed frame to the lobby actor
        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => match deserialize_message(&text) {
                    Ok(client_message) => {
                        if actor_registry
                            .forward_client_message(&connection_id, client_message)
                            .is_err()
                        {
                            tracing::error!(%connection_id, "lobby actor is gone");
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::debug!(%connection_id, %err, "unparseable frame");
                        let error = AppError::SerializationError {
                            message: err.to_string(),
                        };
                        cmd_sender.send(ConnectionCommand::SendToPlayer {
                            connection_id: connection_id.clone(),
                            message: serialize_response(ServerResponse::from_app_error(&error)),
                        })?;
                    }
                },
                Ok(Message::Close(_)) => {
                    tracing::debug!(%connection_id, "👋 close requested");
                    break;
                }
                Ok(_) => continue, // Pings are answered by tungstenite
                Err(err) => {
                    tracing::warn!(%connection_id, %err, "WebSocket error");
                    break;
                }
            }
        }

        let _ = actor_registry.disconnect(&connection_id);
        cmd_sender.send(ConnectionCommand::RemoveConnection {
            id: connection_id.clone(),
        })?;

        tracing::info!(%connection_id, "📴 connection closed");
        Ok(())
    }
}
