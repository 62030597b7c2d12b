use crate::network::connection_manager::WebSocketSender;
use crate::ConnectionManager;

#[derive(Debug)]
pub enum ConnectionCommand {
    AddConnection {
        id: String,
        sender: WebSocketSender,
    },
    RemoveConnection {
        id: String,
    },
    SendToPlayer {
        connection_id: String,
        message: String,
    },
    SendToPlayers {
        connections_id: Vec<String>,
        message: String,
    },
}

pub struct CommandProcessor;

impl CommandProcessor {
    pub async fn process_command(
        command: ConnectionCommand,
        connection_manager: &mut ConnectionManager,
    ) {
        match command {
            ConnectionCommand::AddConnection { id, sender } => {
                connection_manager.add_connection(id, sender);
            }
            ConnectionCommand::RemoveConnection { id } => {
                connection_manager.remove_connection(&id).await;
            }
            ConnectionCommand::SendToPlayer {
                connection_id,
                message,
            } => {
                connection_manager
                    .send_to_players(std::slice::from_ref(&connection_id), &message)
                    .await;
            }
            ConnectionCommand::SendToPlayers {
                connections_id,
                message,
            } => {
                connection_manager
                    .send_to_players(&connections_id, &message)
                    .await;
            }
        }
    }
}
