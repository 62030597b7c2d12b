use std::error::Error;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::network::websocket::ConnectionHandler;
use crate::{
    ActorRegistry, CommandProcessor, ConnectionCommand, ConnectionManager, LobbyActor,
    LobbyMessage, RoomManager, ServerConfig,
};

pub struct WebsocketServer {
    config: ServerConfig,
}

impl WebsocketServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error>> {
        let listener = TcpListener::bind(&self.config.bind).await?;
        self.run_on(listener).await
    }

    /// Serves an already bound listener.
    pub async fn run_on(&self, listener: TcpListener) -> Result<(), Box<dyn Error>> {
        let settings = self.config.game_settings()?;
        let addr = listener.local_addr()?;
        tracing::info!(%addr, ?settings, "🌐 WebSocket server listening");

        // Connection manager task owns every socket write half
        let (cmd_sender, mut cmd_receiver) = mpsc::unbounded_channel::<ConnectionCommand>();
        tokio::spawn(async move {
            let mut connection_manager = ConnectionManager::new();
            while let Some(command) = cmd_receiver.recv().await {
                CommandProcessor::process_command(command, &mut connection_manager).await;
            }
        });

        let (lobby_sender, lobby_receiver) = mpsc::unbounded_channel::<LobbyMessage>();
        let mut lobby_actor = LobbyActor::new(
            RoomManager::new(settings),
            cmd_sender.clone(),
            lobby_sender.downgrade(),
        );
        tokio::spawn(async move {
            lobby_actor.run(lobby_receiver).await;
        });

        let actor_registry = Arc::new(ActorRegistry::new(lobby_sender));

        // Accept connections
        while let Ok((stream, addr)) = listener.accept().await {
            let connection_id = Uuid::new_v4().to_string();
            tracing::info!(%addr, %connection_id, "🔗 new connection");

            let actor_registry = actor_registry.clone();
            let cmd_sender = cmd_sender.clone();

            tokio::spawn(async move {
                if let Err(err) = ConnectionHandler::handle_connection(
                    stream,
                    connection_id,
                    actor_registry,
                    cmd_sender,
                )
                .await
                {
                    tracing::warn!(%err, "❌ error handling connection");
                }
            });
        }

        Ok(())
    }
}
