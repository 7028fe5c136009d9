use thiserror::Error;

/// Failures surfaced to a connection through the handshake acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HandshakeError {
    /// Player handshake referenced a room that does not exist (or no longer does)
    #[error("room not found")]
    RoomNotFound,
    /// Handshake omitted the role or supplied an unrecognized one
    #[error("a role of host or player is required")]
    RoleRequired,
    /// Name generation kept colliding with live rooms until the retry budget ran out
    #[error("room name generation exhausted its retry budget")]
    RegistryExhausted,
    /// Second handshake on a connection that already holds a role
    #[error("connection is already identified")]
    AlreadyIdentified,
}

impl HandshakeError {
    /// Stable wire code carried in the `handshake:ack` frame.
    pub fn code(&self) -> &'static str {
        match self {
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::RoleRequired => "ROLE_REQUIRED",
            Self::RegistryExhausted => "REGISTRY_EXHAUSTED",
            Self::AlreadyIdentified => "ALREADY_IDENTIFIED",
        }
    }
}

/// Errors from the room registry itself, mapped onto [`HandshakeError`]
/// by the hub before they reach a connection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No room with this id
    #[error("room not found: {0}")]
    RoomNotFound(String),
    /// The generator produced nothing but collisions within the attempt budget
    #[error("no non-colliding room name within {0} attempts")]
    NamesExhausted(usize),
}
