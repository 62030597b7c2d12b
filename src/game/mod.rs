pub mod board;
pub mod room;
pub mod room_code;
pub mod turn_order;
