//! Relay Hub
//!
//! Couples the room registry, the session table, and every connection's
//! outbound queue behind one lock, so a player join and a host disconnect
//! on the same room can never interleave. The transport drives the hub
//! with connect/handshake/forward/disconnect and drains each connection's
//! queue into its socket.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

use crate::error::HandshakeError;
use crate::registry::RoomRegistry;
use crate::session::{Role, SessionTable};

/// Event name whose forwards may be dropped under backpressure. Continuous
/// accelerometer streams are high-frequency and low-value; a lost sample is
/// replaced by the next one a few milliseconds later.
pub const BEST_EFFORT_EVENT: &str = "player:accel";

/// Default budget for room-name generation retries.
pub const DEFAULT_NAME_ATTEMPTS: usize = 32;

/// Supplied room-name source. Returns a candidate per call with no
/// uniqueness guarantee; collision handling is the registry's job.
pub type NameGenerator = Box<dyn Fn() -> String + Send + Sync>;

/// Sending half of a connection's outbound queue, registered on connect.
pub type EventSender = mpsc::Sender<RelayEvent>;

/// Delivery mode for a relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Awaited send; waits for queue space
    Reliable,
    /// `try_send`; silently dropped when the recipient's queue is full
    BestEffort,
}

/// Events pushed into a connection's outbound queue.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayEvent {
    /// Answer to this connection's handshake. Always queued ahead of any
    /// lifecycle event the same handshake produced.
    HandshakeAck {
        room: Option<String>,
        error: Option<HandshakeError>,
    },
    /// A room was created for this host; carries the LAN address hint
    /// players need to find the server.
    HostJoined {
        room: String,
        server_address: Option<String>,
    },
    /// A player joined the recipient's room.
    PlayerJoined { player_id: String },
    /// The recipient's room was torn down because its host disconnected.
    HostLeft,
    /// A player left the recipient's room.
    PlayerLeft { player_id: String },
    /// A player-originated domain event, wrapped with sender and time.
    Forwarded {
        event: String,
        player_id: String,
        data: Value,
        timestamp: i64,
    },
}

/// Counters for relay traffic, folded into the server's metrics snapshot.
#[derive(Debug, Default)]
pub struct RelayStats {
    pub events_relayed: AtomicU64,
    pub events_dropped: AtomicU64,
    pub rooms_created: AtomicU64,
    pub rooms_closed: AtomicU64,
}

impl RelayStats {
    pub fn record_relayed(&self) {
        self.events_relayed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn room_created(&self) {
        self.rooms_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn room_closed(&self) {
        self.rooms_closed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            events_relayed: self.events_relayed.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            rooms_created: self.rooms_created.load(Ordering::Relaxed),
            rooms_closed: self.rooms_closed.load(Ordering::Relaxed),
        }
    }
}

/// Serializable snapshot of [`RelayStats`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayStatsSnapshot {
    pub events_relayed: u64,
    pub events_dropped: u64,
    pub rooms_created: u64,
    pub rooms_closed: u64,
}

#[derive(Default)]
struct HubState {
    registry: RoomRegistry,
    sessions: SessionTable,
    senders: HashMap<String, EventSender>,
}

/// The relay engine. One instance per process, shared as `Arc` across
/// connection tasks.
pub struct RelayHub {
    state: Mutex<HubState>,
    stats: RelayStats,
    generate_name: NameGenerator,
    name_attempts: usize,
    server_address: Option<String>,
}

impl RelayHub {
    pub fn new(generate_name: NameGenerator) -> Self {
        Self {
            state: Mutex::new(HubState::default()),
            stats: RelayStats::default(),
            generate_name,
            name_attempts: DEFAULT_NAME_ATTEMPTS,
            server_address: None,
        }
    }

    /// LAN address hint included in `host-joined` notifications.
    pub fn with_server_address(mut self, address: impl Into<String>) -> Self {
        self.server_address = Some(address.into());
        self
    }

    pub fn with_name_attempts(mut self, attempts: usize) -> Self {
        self.name_attempts = attempts.max(1);
        self
    }

    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    pub async fn room_count(&self) -> usize {
        self.state.lock().await.registry.len()
    }

    pub async fn connection_count(&self) -> usize {
        self.state.lock().await.senders.len()
    }

    /// Delivery mode for a forwarded event name.
    pub fn delivery_for(event: &str) -> Delivery {
        if event == BEST_EFFORT_EVENT {
            Delivery::BestEffort
        } else {
            Delivery::Reliable
        }
    }

    /// Register a freshly accepted connection: an empty session slot and
    /// the sending half of its outbound queue. No registry effect.
    pub async fn connect(&self, conn_id: &str, sender: EventSender) {
        let mut state = self.state.lock().await;
        state.sessions.open(conn_id);
        state.senders.insert(conn_id.to_string(), sender);
        debug!(conn = %conn_id, "connection registered");
    }

    /// Run a handshake for a connection, binding its role and room on
    /// success. The acknowledgement is queued on the connection's own
    /// outbound channel (ahead of any lifecycle event this handshake
    /// produced); the returned value carries the same outcome for the
    /// caller.
    pub async fn handshake(
        &self,
        conn_id: &str,
        role: Option<Role>,
        room: Option<&str>,
    ) -> Result<String, HandshakeError> {
        let mut notifications: Vec<(EventSender, RelayEvent)> = Vec::new();

        let result = {
            let mut state = self.state.lock().await;

            let result = if state.sessions.get(conn_id).is_some() {
                Err(HandshakeError::AlreadyIdentified)
            } else {
                match role {
                    None => Err(HandshakeError::RoleRequired),
                    Some(Role::Host) => self.host_handshake(&mut state, conn_id, &mut notifications),
                    Some(Role::Player) => {
                        Self::player_handshake(&mut state, conn_id, room, &mut notifications)
                    }
                }
            };

            // The ack goes out ahead of anything else this handshake queued.
            if let Some(tx) = state.senders.get(conn_id) {
                notifications.insert(
                    0,
                    (
                        tx.clone(),
                        RelayEvent::HandshakeAck {
                            room: result.as_ref().ok().cloned(),
                            error: result.as_ref().err().copied(),
                        },
                    ),
                );
            }
            result
        };

        // Lifecycle notifications are reliable; send outside the lock so a
        // full queue never stalls other connections' registry operations.
        for (tx, event) in notifications {
            let _ = tx.send(event).await;
        }

        result
    }

    fn host_handshake(
        &self,
        state: &mut HubState,
        conn_id: &str,
        notifications: &mut Vec<(EventSender, RelayEvent)>,
    ) -> Result<String, HandshakeError> {
        let room_id = state
            .registry
            .create_room(conn_id, &self.generate_name, self.name_attempts)
            .map_err(|_| HandshakeError::RegistryExhausted)?;

        if !state.sessions.bind(conn_id, Role::Host, &room_id) {
            warn!(conn = %conn_id, room = %room_id, "host bind rejected; session slot missing");
        }
        self.stats.room_created();

        // At creation the room's only member is the host itself.
        if let Some(tx) = state.senders.get(conn_id) {
            notifications.push((
                tx.clone(),
                RelayEvent::HostJoined {
                    room: room_id.clone(),
                    server_address: self.server_address.clone(),
                },
            ));
        }
        Ok(room_id)
    }

    fn player_handshake(
        state: &mut HubState,
        conn_id: &str,
        room: Option<&str>,
        notifications: &mut Vec<(EventSender, RelayEvent)>,
    ) -> Result<String, HandshakeError> {
        // A missing room id and a stale one answer the same way; the player
        // retries with a fresh id obtained out-of-band.
        let room_id = room.ok_or(HandshakeError::RoomNotFound)?;
        let host_id = state
            .registry
            .join_room(room_id, conn_id)
            .map(|joined| joined.host_id.clone())
            .map_err(|_| HandshakeError::RoomNotFound)?;

        if !state.sessions.bind(conn_id, Role::Player, room_id) {
            warn!(conn = %conn_id, room = %room_id, "player bind rejected; session slot missing");
        }

        if let Some(tx) = state.senders.get(&host_id) {
            notifications.push((
                tx.clone(),
                RelayEvent::PlayerJoined {
                    player_id: conn_id.to_string(),
                },
            ));
        }
        Ok(room_id.to_string())
    }

    /// Forward a player-originated event to its room's host, wrapped with
    /// the sender's id and a server timestamp. Silently dropped when the
    /// sender is unidentified, not a player, or its room is gone (a benign
    /// race with host disconnect); no error is surfaced to the sender.
    pub async fn forward(&self, conn_id: &str, event: &str, data: Value) {
        let host_tx = {
            let state = self.state.lock().await;
            let Some(binding) = state.sessions.get(conn_id) else {
                debug!(conn = %conn_id, event, "dropping forward from unidentified connection");
                return;
            };
            if binding.role != Role::Player {
                debug!(conn = %conn_id, event, "dropping forward from non-player connection");
                return;
            }
            let Some(room) = state.registry.lookup(&binding.room) else {
                debug!(conn = %conn_id, room = %binding.room, "dropping forward into torn-down room");
                return;
            };
            state.senders.get(&room.host_id).cloned()
        };
        let Some(tx) = host_tx else { return };

        let wrapped = RelayEvent::Forwarded {
            event: event.to_string(),
            player_id: conn_id.to_string(),
            data,
            timestamp: Utc::now().timestamp_millis(),
        };

        match Self::delivery_for(event) {
            Delivery::BestEffort => match tx.try_send(wrapped) {
                Ok(()) => self.stats.record_relayed(),
                Err(_) => self.stats.record_dropped(),
            },
            Delivery::Reliable => {
                if tx.send(wrapped).await.is_ok() {
                    self.stats.record_relayed();
                }
            }
        }
    }

    /// Tear down a closed connection. Hosts take their room with them
    /// (every member is notified); players are removed from their room's
    /// set with the host notified if the room still exists. The session
    /// binding is cleared last.
    pub async fn disconnect(&self, conn_id: &str) {
        let notifications: Vec<(EventSender, RelayEvent)> = {
            let mut state = self.state.lock().await;
            state.senders.remove(conn_id);

            let mut out = Vec::new();
            match state.sessions.get(conn_id).cloned() {
                None => {}
                Some(binding) => match binding.role {
                    Role::Host => {
                        // Guard against a stale binding: only tear down a room
                        // this connection is still recorded as hosting.
                        let still_host = state
                            .registry
                            .lookup(&binding.room)
                            .is_some_and(|room| room.host_id == conn_id);
                        if still_host {
                            if let Some(room) = state.registry.remove_host(&binding.room) {
                                debug!(room = %room.id, players = room.players.len(), "host left; room torn down");
                                self.stats.room_closed();
                                // The host's own sender is already gone; live
                                // players get the eviction notice.
                                for member in &room.players {
                                    if let Some(tx) = state.senders.get(member) {
                                        out.push((tx.clone(), RelayEvent::HostLeft));
                                    }
                                }
                            }
                        }
                    }
                    Role::Player => {
                        let removed = state.registry.remove_player(&binding.room, conn_id);
                        if removed {
                            // The room may have been torn down concurrently by
                            // a host disconnect; then there is nobody to tell.
                            if let Some(room) = state.registry.lookup(&binding.room) {
                                if let Some(tx) = state.senders.get(&room.host_id) {
                                    out.push((
                                        tx.clone(),
                                        RelayEvent::PlayerLeft {
                                            player_id: conn_id.to_string(),
                                        },
                                    ));
                                }
                            }
                        }
                    }
                },
            }
            state.sessions.clear(conn_id);
            out
        };

        for (tx, event) in notifications {
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;

    fn sequential_names(prefix: &'static str) -> NameGenerator {
        let counter = AtomicUsize::new(0);
        Box::new(move || format!("{}-{}", prefix, counter.fetch_add(1, Ordering::Relaxed)))
    }

    fn hub() -> RelayHub {
        RelayHub::new(sequential_names("room")).with_server_address("192.168.1.20:4000")
    }

    async fn connect(hub: &RelayHub, conn_id: &str) -> mpsc::Receiver<RelayEvent> {
        let (tx, rx) = mpsc::channel(8);
        hub.connect(conn_id, tx).await;
        rx
    }

    fn drain(rx: &mut mpsc::Receiver<RelayEvent>) -> Vec<RelayEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    async fn host_with_room(hub: &RelayHub, conn_id: &str) -> (mpsc::Receiver<RelayEvent>, String) {
        let mut rx = connect(hub, conn_id).await;
        let room = hub.handshake(conn_id, Some(Role::Host), None).await.unwrap();
        drain(&mut rx);
        (rx, room)
    }

    #[test]
    fn only_accel_is_best_effort() {
        assert_eq!(RelayHub::delivery_for("player:accel"), Delivery::BestEffort);
        assert_eq!(RelayHub::delivery_for("player:button"), Delivery::Reliable);
        assert_eq!(RelayHub::delivery_for("player:custom"), Delivery::Reliable);
    }

    #[tokio::test]
    async fn host_handshake_creates_room_and_acks_first() {
        let hub = hub();
        let mut rx = connect(&hub, "host-1").await;

        let room = hub.handshake("host-1", Some(Role::Host), None).await.unwrap();
        assert_eq!(room, "room-0");
        assert_eq!(hub.room_count().await, 1);

        let events = drain(&mut rx);
        assert_eq!(
            events,
            vec![
                RelayEvent::HandshakeAck {
                    room: Some("room-0".to_string()),
                    error: None,
                },
                RelayEvent::HostJoined {
                    room: "room-0".to_string(),
                    server_address: Some("192.168.1.20:4000".to_string()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn player_join_notifies_only_the_host() {
        let hub = hub();
        let (mut host_rx, room) = host_with_room(&hub, "host-1").await;
        let mut p1_rx = connect(&hub, "player-1").await;
        let mut p2_rx = connect(&hub, "player-2").await;

        let joined = hub
            .handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        assert_eq!(joined, room);

        let host_events = drain(&mut host_rx);
        assert_eq!(
            host_events,
            vec![RelayEvent::PlayerJoined {
                player_id: "player-1".to_string(),
            }]
        );
        // The joining player got only its ack; bystanders got nothing.
        assert_eq!(
            drain(&mut p1_rx),
            vec![RelayEvent::HandshakeAck {
                room: Some(room.clone()),
                error: None,
            }]
        );
        assert!(drain(&mut p2_rx).is_empty());
    }

    #[tokio::test]
    async fn player_handshake_to_unknown_room_fails_cleanly() {
        let hub = hub();
        let mut rx = connect(&hub, "player-1").await;

        let err = hub
            .handshake("player-1", Some(Role::Player), Some("nonexistent"))
            .await
            .unwrap_err();
        assert_eq!(err, HandshakeError::RoomNotFound);
        assert_eq!(hub.room_count().await, 0);

        assert_eq!(
            drain(&mut rx),
            vec![RelayEvent::HandshakeAck {
                room: None,
                error: Some(HandshakeError::RoomNotFound),
            }]
        );
        // The failed handshake left no binding; a retry can still succeed.
        let (_host_rx, room) = host_with_room(&hub, "host-1").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn handshake_without_role_is_rejected() {
        let hub = hub();
        let mut rx = connect(&hub, "c1").await;

        let err = hub.handshake("c1", None, None).await.unwrap_err();
        assert_eq!(err, HandshakeError::RoleRequired);
        assert_eq!(
            drain(&mut rx),
            vec![RelayEvent::HandshakeAck {
                room: None,
                error: Some(HandshakeError::RoleRequired),
            }]
        );
    }

    #[tokio::test]
    async fn second_handshake_is_rejected_without_state_change() {
        let hub = hub();
        let (mut host_rx, room) = host_with_room(&hub, "host-1").await;

        let err = hub
            .handshake("host-1", Some(Role::Host), None)
            .await
            .unwrap_err();
        assert_eq!(err, HandshakeError::AlreadyIdentified);
        assert_eq!(hub.room_count().await, 1);

        assert_eq!(
            drain(&mut host_rx),
            vec![RelayEvent::HandshakeAck {
                room: None,
                error: Some(HandshakeError::AlreadyIdentified),
            }]
        );
        // The original room is still reachable.
        let mut p_rx = connect(&hub, "player-1").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        drain(&mut p_rx);
    }

    #[tokio::test]
    async fn name_generation_budget_surfaces_as_registry_exhausted() {
        let hub = RelayHub::new(Box::new(|| "same".to_string())).with_name_attempts(4);
        let mut a_rx = connect(&hub, "host-a").await;
        let mut b_rx = connect(&hub, "host-b").await;

        hub.handshake("host-a", Some(Role::Host), None).await.unwrap();
        drain(&mut a_rx);

        let err = hub
            .handshake("host-b", Some(Role::Host), None)
            .await
            .unwrap_err();
        assert_eq!(err, HandshakeError::RegistryExhausted);
        assert_eq!(
            drain(&mut b_rx),
            vec![RelayEvent::HandshakeAck {
                room: None,
                error: Some(HandshakeError::RegistryExhausted),
            }]
        );
    }

    #[tokio::test]
    async fn forward_wraps_payload_for_the_host() {
        let hub = hub();
        let (mut host_rx, room) = host_with_room(&hub, "host-1").await;
        let mut p_rx = connect(&hub, "player-1").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        drain(&mut host_rx);
        drain(&mut p_rx);

        hub.forward("player-1", "player:button", json!({"x": 1})).await;

        let events = drain(&mut host_rx);
        assert_eq!(events.len(), 1);
        match &events[0] {
            RelayEvent::Forwarded {
                event,
                player_id,
                data,
                timestamp,
            } => {
                assert_eq!(event, "player:button");
                assert_eq!(player_id, "player-1");
                assert_eq!(data, &json!({"x": 1}));
                assert!(*timestamp > 0);
            }
            other => panic!("expected Forwarded, got {:?}", other),
        }
        assert_eq!(hub.stats().snapshot().events_relayed, 1);
    }

    #[tokio::test]
    async fn forward_before_handshake_is_silently_ignored() {
        let hub = hub();
        let (mut host_rx, _room) = host_with_room(&hub, "host-1").await;
        let _p_rx = connect(&hub, "player-1").await;

        hub.forward("player-1", "player:button", json!({"x": 1})).await;

        assert!(drain(&mut host_rx).is_empty());
        assert_eq!(hub.stats().snapshot().events_relayed, 0);
    }

    #[tokio::test]
    async fn forward_after_host_disconnect_is_silently_dropped() {
        let hub = hub();
        let (host_rx, room) = host_with_room(&hub, "host-1").await;
        let mut p_rx = connect(&hub, "player-1").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        drain(&mut p_rx);

        drop(host_rx);
        hub.disconnect("host-1").await;
        drain(&mut p_rx);

        // Room is gone; the forward vanishes without an error to the sender.
        hub.forward("player-1", "player:button", json!({"x": 1})).await;
        assert!(drain(&mut p_rx).is_empty());
    }

    #[tokio::test]
    async fn accel_is_dropped_when_the_host_queue_is_full() {
        let hub = hub();
        // Small host queue; handshakes leave it three-quarters full
        // (ack + host-joined + player-joined).
        let (host_tx, mut host_rx) = mpsc::channel(4);
        hub.connect("host-1", host_tx).await;
        let room = hub.handshake("host-1", Some(Role::Host), None).await.unwrap();

        let mut p_rx = connect(&hub, "player-1").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        drain(&mut p_rx);

        // First sample takes the last slot; the second has nowhere to go.
        hub.forward("player-1", "player:accel", json!({"x": 0.1})).await;
        hub.forward("player-1", "player:accel", json!({"x": 0.2})).await;
        assert_eq!(hub.stats().snapshot().events_dropped, 1);

        // Once the queue drains, samples get through again.
        drain(&mut host_rx);
        hub.forward("player-1", "player:accel", json!({"x": 0.3})).await;
        let delivered = drain(&mut host_rx);
        assert!(
            delivered
                .iter()
                .any(|e| matches!(e, RelayEvent::Forwarded { event, .. } if event == "player:accel"))
        );
    }

    #[tokio::test]
    async fn host_disconnect_tears_down_the_room() {
        let hub = hub();
        let (host_rx, room) = host_with_room(&hub, "host-1").await;
        let mut p1_rx = connect(&hub, "player-1").await;
        let mut p2_rx = connect(&hub, "player-2").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        hub.handshake("player-2", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        drain(&mut p1_rx);
        drain(&mut p2_rx);

        drop(host_rx);
        hub.disconnect("host-1").await;

        assert_eq!(hub.room_count().await, 0);
        // Every player hears exactly one host-left.
        assert_eq!(drain(&mut p1_rx), vec![RelayEvent::HostLeft]);
        assert_eq!(drain(&mut p2_rx), vec![RelayEvent::HostLeft]);

        // The id is stale now.
        let mut late_rx = connect(&hub, "late-player").await;
        let err = hub
            .handshake("late-player", Some(Role::Player), Some(&room))
            .await
            .unwrap_err();
        assert_eq!(err, HandshakeError::RoomNotFound);
        drain(&mut late_rx);
    }

    #[tokio::test]
    async fn player_disconnect_leaves_the_rest_of_the_room_intact() {
        let hub = hub();
        let (mut host_rx, room) = host_with_room(&hub, "host-1").await;
        let p1_rx = connect(&hub, "player-1").await;
        let mut p2_rx = connect(&hub, "player-2").await;
        hub.handshake("player-1", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        hub.handshake("player-2", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        drain(&mut host_rx);
        drain(&mut p2_rx);

        drop(p1_rx);
        hub.disconnect("player-1").await;

        assert_eq!(
            drain(&mut host_rx),
            vec![RelayEvent::PlayerLeft {
                player_id: "player-1".to_string(),
            }]
        );
        assert!(drain(&mut p2_rx).is_empty());
        assert_eq!(hub.room_count().await, 1);

        // Double-disconnect is a no-op.
        hub.disconnect("player-1").await;
        assert!(drain(&mut host_rx).is_empty());
    }

    #[tokio::test]
    async fn unidentified_disconnect_has_no_registry_effect() {
        let hub = hub();
        let (_host_rx, _room) = host_with_room(&hub, "host-1").await;
        let rx = connect(&hub, "drifter").await;

        drop(rx);
        hub.disconnect("drifter").await;
        assert_eq!(hub.room_count().await, 1);
        assert_eq!(hub.connection_count().await, 1);
    }

    #[tokio::test]
    async fn full_session_scenario() {
        let hub = hub();
        let mut host_rx = connect(&hub, "A").await;
        let room = hub.handshake("A", Some(Role::Host), None).await.unwrap();
        drain(&mut host_rx);

        let mut b_rx = connect(&hub, "B").await;
        let joined = hub
            .handshake("B", Some(Role::Player), Some(&room))
            .await
            .unwrap();
        assert_eq!(joined, room);
        assert_eq!(
            drain(&mut host_rx),
            vec![RelayEvent::PlayerJoined {
                player_id: "B".to_string(),
            }]
        );
        drain(&mut b_rx);

        hub.forward("B", "player:button", json!({"x": 1})).await;
        let forwarded = drain(&mut host_rx);
        assert!(matches!(
            &forwarded[..],
            [RelayEvent::Forwarded { event, player_id, .. }]
                if event == "player:button" && player_id == "B"
        ));

        drop(host_rx);
        hub.disconnect("A").await;
        assert_eq!(drain(&mut b_rx), vec![RelayEvent::HostLeft]);

        let mut c_rx = connect(&hub, "C").await;
        let err = hub
            .handshake("C", Some(Role::Player), Some(&room))
            .await
            .unwrap_err();
        assert_eq!(err, HandshakeError::RoomNotFound);
        drain(&mut c_rx);
    }
}
