pub mod session;
pub mod view;

pub use session::{GameSession, Update, UserCommand};
pub use view::{BoardView, ClickRejected, Tile, ViewEffect};
