//! Room Relay - room registry and event relay engine
//!
//! This crate groups one "host" connection (a shared screen) with many
//! "player" connections (phone controllers) into named rooms and relays
//! player events to the room's host. It has no transport dependencies;
//! the server hands each connection's outbound queue to the hub and
//! drives it with connect/handshake/forward/disconnect calls.
//!
//! # Example
//!
//! ```no_run
//! use room_relay::{RelayHub, Role};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let hub = RelayHub::new(Box::new(|| "blue-fox".to_string()));
//!
//!     let (tx, mut rx) = mpsc::channel(8);
//!     hub.connect("conn-1", tx).await;
//!
//!     let room = hub
//!         .handshake("conn-1", Some(Role::Host), None)
//!         .await
//!         .unwrap();
//!     assert_eq!(room, "blue-fox");
//!
//!     while let Some(event) = rx.recv().await {
//!         println!("outbound: {:?}", event);
//!     }
//! }
//! ```

mod error;
mod hub;
mod registry;
mod session;

pub use error::{HandshakeError, RegistryError};
pub use hub::{
    BEST_EFFORT_EVENT, Delivery, EventSender, NameGenerator, RelayEvent, RelayHub, RelayStats,
    RelayStatsSnapshot,
};
pub use registry::{Room, RoomRegistry};
pub use session::{Role, SessionBinding, SessionTable};
