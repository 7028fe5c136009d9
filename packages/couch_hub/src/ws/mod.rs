//! Controller WebSocket endpoint
//!
//! One WebSocket connection per device. The first frame a client sends is
//! its handshake (role + target room); everything after that is relayed to
//! the room's host by the hub.

pub mod handler;
pub mod protocol;

pub use handler::ws_handler;
pub use protocol::Frame;
