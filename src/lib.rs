pub mod actors;
pub mod client;
pub mod config;
pub mod errors;
pub mod game;
pub mod network;
pub mod player;

#[cfg(test)]
mod tests;

// Re-export commonly used items for convenience
pub use actors::actor_registry::ActorRegistry;
pub use actors::lobby_actor::{LobbyActor, LobbyMessage};
pub use config::{GameSettings, ServerConfig};
pub use errors::{AppError, AppResult};
pub use game::board::Board;
pub use game::room::Room;
pub use game::turn_order::TurnOrder;
pub use player::Player;
pub use network::connection_commands::{CommandProcessor, ConnectionCommand};
pub use network::connection_manager::ConnectionManager;
pub use network::room_manager::RoomManager;
pub use network::websocket::WebsocketServer;
