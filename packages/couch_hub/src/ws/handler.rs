//! WebSocket Handler
//!
//! Upgrades `/ws` and runs one connection: a writer task drains the hub's
//! outbound queue into the socket while the reader loop feeds inbound
//! frames to the hub. Cleanup runs when either side ends.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures::{sink::SinkExt, stream::StreamExt};
use room_relay::RelayEvent;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::protocol::{Frame, HandshakeRequest, event};
use crate::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    state.metrics.connection_opened();
    info!(conn = %connection_id, "controller socket connected");

    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Outbound queue drained by the writer task; the hub holds the sender.
    let (tx, mut rx) = mpsc::channel::<RelayEvent>(state.outbound_queue);
    state.hub.connect(&connection_id, tx).await;

    let metrics_out = state.metrics.clone();
    let writer_task = async move {
        while let Some(relay_event) = rx.recv().await {
            let frame = Frame::from(&relay_event);
            let text = match serde_json::to_string(&frame) {
                Ok(text) => text,
                Err(e) => {
                    warn!("failed to serialize outbound frame: {}", e);
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
            metrics_out.frame_sent();
        }
    };

    let hub = state.hub.clone();
    let metrics_in = state.metrics.clone();
    let conn = connection_id.clone();
    let reader_task = async move {
        while let Some(msg) = ws_receiver.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    metrics_in.frame_received();
                    let frame: Frame = match serde_json::from_str(&text) {
                        Ok(frame) => frame,
                        Err(e) => {
                            debug!(conn = %conn, "ignoring malformed frame: {}", e);
                            continue;
                        }
                    };
                    if frame.event == event::HANDSHAKE {
                        let request = HandshakeRequest::from_frame(&frame);
                        // The ack rides the outbound queue; the result here
                        // only feeds logs and counters.
                        match hub
                            .handshake(&conn, request.role(), request.room.as_deref())
                            .await
                        {
                            Ok(room) => {
                                metrics_in.handshake_accepted();
                                info!(conn = %conn, room = %room, "handshake accepted");
                            }
                            Err(e) => {
                                metrics_in.handshake_rejected();
                                debug!(conn = %conn, "handshake rejected: {}", e);
                            }
                        }
                    } else {
                        hub.forward(&conn, &frame.event, frame.data()).await;
                    }
                }
                Ok(Message::Close(_)) => {
                    debug!(conn = %conn, "client closed connection");
                    break;
                }
                Ok(_) => {} // ping/pong/binary carry no frames
                Err(e) => {
                    warn!(conn = %conn, "socket error: {}", e);
                    break;
                }
            }
        }
    };

    tokio::select! {
        _ = writer_task => debug!("writer task ended"),
        _ = reader_task => debug!("reader task ended"),
    }

    state.hub.disconnect(&connection_id).await;
    state.metrics.connection_closed();
    info!(conn = %connection_id, "controller socket closed");
}
