pub mod connection;
pub mod server;

pub use connection::ConnectionHandler;
pub use server::WebsocketServer;
