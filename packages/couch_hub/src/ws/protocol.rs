//! Wire Protocol Types
//!
//! Every message on the controller socket is a JSON text frame enveloped by
//! a `type` key: `{"type": "player:button", "data": {...}}`. Forwarded
//! events keep their inbound name on the way out, so the envelope carries a
//! dynamic event name rather than a closed serde tag.

use room_relay::{RelayEvent, Role};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Event names with a fixed meaning to the server. Anything else arriving
/// from a player is relayed opaquely under its own name.
pub mod event {
    pub const HANDSHAKE: &str = "handshake";
    pub const HANDSHAKE_ACK: &str = "handshake:ack";
    pub const HOST_JOINED: &str = "system:host-joined";
    pub const HOST_LEFT: &str = "system:host-left";
    pub const PLAYER_JOINED: &str = "player:joined";
    pub const PLAYER_LEFT: &str = "player:left";
}

/// One JSON text frame on the socket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    #[serde(rename = "type")]
    pub event: String,
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl Frame {
    /// Opaque payload of a forwardable frame. Absent `data` forwards as null.
    pub fn data(&self) -> Value {
        self.payload.get("data").cloned().unwrap_or(Value::Null)
    }
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl From<&RelayEvent> for Frame {
    fn from(event: &RelayEvent) -> Self {
        match event {
            RelayEvent::HandshakeAck { room, error } => {
                let payload = match error {
                    Some(err) => json!({ "ok": false, "error": err.code() }),
                    None => json!({ "ok": true, "room": room }),
                };
                Frame {
                    event: event::HANDSHAKE_ACK.to_string(),
                    payload: fields(payload),
                }
            }
            RelayEvent::HostJoined {
                room,
                server_address,
            } => {
                let mut payload = fields(json!({ "room": room }));
                if let Some(address) = server_address {
                    payload.insert("serverAddress".to_string(), json!(address));
                }
                Frame {
                    event: event::HOST_JOINED.to_string(),
                    payload,
                }
            }
            RelayEvent::PlayerJoined { player_id } => Frame {
                event: event::PLAYER_JOINED.to_string(),
                payload: fields(json!({ "playerId": player_id })),
            },
            RelayEvent::HostLeft => Frame {
                event: event::HOST_LEFT.to_string(),
                payload: Map::new(),
            },
            RelayEvent::PlayerLeft { player_id } => Frame {
                event: event::PLAYER_LEFT.to_string(),
                payload: fields(json!({ "playerId": player_id })),
            },
            RelayEvent::Forwarded {
                event,
                player_id,
                data,
                timestamp,
            } => Frame {
                event: event.clone(),
                payload: fields(json!({
                    "playerId": player_id,
                    "data": data,
                    "timestamp": timestamp,
                })),
            },
        }
    }
}

/// Body of an inbound `handshake` frame. Unknown role strings parse as
/// `None` so the hub answers with its role-required error instead of the
/// connection dying on a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HandshakeRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub room: Option<String>,
}

impl HandshakeRequest {
    pub fn from_frame(frame: &Frame) -> Self {
        serde_json::from_value(Value::Object(frame.payload.clone())).unwrap_or_default()
    }

    pub fn role(&self) -> Option<Role> {
        match self.role.as_deref() {
            Some("host") => Some(Role::Host),
            Some("player") => Some(Role::Player),
            _ => None,
        }
    }
}
