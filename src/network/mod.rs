pub mod connection_commands;
pub mod connection_manager;
pub mod messages;
pub mod room_manager;
pub mod websocket;
