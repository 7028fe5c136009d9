//! Session Binding
//!
//! Per-connection role and room, kept in a side table keyed by the
//! transport-assigned connection id. A slot is opened when the connection
//! is accepted, populated once on handshake success, and discarded when
//! the connection closes.

use std::collections::HashMap;

/// Role a connection declared in its handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Host,
    Player,
}

/// Role and room assigned to a connection at handshake time. Immutable
/// once set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionBinding {
    pub role: Role,
    pub room: String,
}

/// Side table of session bindings.
#[derive(Debug, Default)]
pub struct SessionTable {
    bindings: HashMap<String, Option<SessionBinding>>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open an empty slot for a freshly accepted connection.
    pub fn open(&mut self, conn_id: &str) {
        self.bindings.insert(conn_id.to_string(), None);
    }

    /// Bind a role and room to a connection. Returns false, leaving any
    /// existing binding untouched, when the slot is missing or already
    /// bound; the hub guards its handshake path so a rejected bind
    /// indicates a caller bug.
    pub fn bind(&mut self, conn_id: &str, role: Role, room: &str) -> bool {
        match self.bindings.get_mut(conn_id) {
            Some(slot) if slot.is_none() => {
                *slot = Some(SessionBinding {
                    role,
                    room: room.to_string(),
                });
                true
            }
            _ => false,
        }
    }

    pub fn get(&self, conn_id: &str) -> Option<&SessionBinding> {
        self.bindings.get(conn_id).and_then(|slot| slot.as_ref())
    }

    /// Discard a connection's slot, returning the binding it held.
    pub fn clear(&mut self, conn_id: &str) -> Option<SessionBinding> {
        self.bindings.remove(conn_id).flatten()
    }
}
