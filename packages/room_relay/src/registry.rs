//! Room Registry
//!
//! The authoritative in-memory mapping from room id to room state. A room
//! exists exactly as long as its host connection is live; the registry is
//! the single source of truth for membership.

use std::collections::{HashMap, HashSet};

use crate::error::RegistryError;

/// One named group pairing a host connection with zero or more players.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Room {
    /// Human-readable id, generated at creation, immutable for the room's lifetime
    pub id: String,
    /// The exclusive host connection; never reassigned
    pub host_id: String,
    /// Player connection ids, unique and unordered
    pub players: HashSet<String>,
}

/// In-memory room table.
///
/// The registry holds no lock of its own; callers serialize access (the hub
/// keeps it behind a single mutex together with the session table).
#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room for `host_id`, drawing candidate names from `generate`
    /// until one does not collide with a live room. The generator offers no
    /// uniqueness guarantee of its own, so the attempt budget guards against
    /// a pathological generator looping forever.
    pub fn create_room(
        &mut self,
        host_id: &str,
        generate: impl Fn() -> String,
        max_attempts: usize,
    ) -> Result<String, RegistryError> {
        for _ in 0..max_attempts {
            let candidate = generate();
            if self.rooms.contains_key(&candidate) {
                continue;
            }
            self.rooms.insert(
                candidate.clone(),
                Room {
                    id: candidate.clone(),
                    host_id: host_id.to_string(),
                    players: HashSet::new(),
                },
            );
            return Ok(candidate);
        }
        Err(RegistryError::NamesExhausted(max_attempts))
    }

    /// Add a player to a room. Idempotent: re-adding a present player is a
    /// no-op. Returns the room so the caller can reach its host.
    pub fn join_room(&mut self, room_id: &str, player_id: &str) -> Result<&Room, RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_string()))?;
        room.players.insert(player_id.to_string());
        Ok(room)
    }

    /// Delete the room entry entirely, regardless of player count, returning
    /// it so the caller can notify the evicted members.
    pub fn remove_host(&mut self, room_id: &str) -> Option<Room> {
        self.rooms.remove(room_id)
    }

    /// Remove a player from a room's set. Returns whether anything changed;
    /// an absent room or player is a no-op.
    pub fn remove_player(&mut self, room_id: &str, player_id: &str) -> bool {
        self.rooms
            .get_mut(room_id)
            .map(|room| room.players.remove(player_id))
            .unwrap_or(false)
    }

    pub fn lookup(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
