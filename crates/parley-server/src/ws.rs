//! `WebSocket` handler: one task per connected session.
//!
//! Clients connect to `GET /ws`. On upgrade the handler mints a
//! [`SessionId`], registers the session with the dispatcher, and pumps
//! two directions through a `select!` loop until the connection closes:
//!
//! - outbound: [`ServerEvent`](parley_types::ServerEvent)s arriving on
//!   the session's channel are written to the socket as JSON text
//!   frames;
//! - inbound: text frames are decoded as named events and handed to the
//!   dispatcher; malformed frames are logged and dropped without
//!   touching the session.
//!
//! Teardown always goes through
//! [`handle_disconnect`](parley_relay::Dispatcher::handle_disconnect),
//! whether the client closed cleanly, errored, or its socket write
//! failed mid-broadcast.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use parley_relay::decode_client_event;
use parley_types::{ClientEvent, SessionId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::state::AppState;

/// Upgrade an HTTP request to a `WebSocket` connection and run the
/// session until it disconnects.
///
/// # Route
///
/// `GET /ws`
pub async fn ws_chat(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_session(socket, state))
}

/// Run one session's lifecycle: connect, pump, disconnect.
async fn handle_session(mut socket: WebSocket, state: Arc<AppState>) {
    let id = SessionId::new();
    let (sender, mut events) = mpsc::unbounded_channel();
    state.dispatcher().handle_connect(id, sender.clone()).await;

    loop {
        tokio::select! {
            // Outbound: events relayed from any session, this one included.
            event = events.recv() => {
                match event {
                    Some(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(e) => {
                                warn!(%id, "failed to serialize outbound event: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!(%id, "socket write failed, closing session");
                            break;
                        }
                    }
                    // Unreachable while this task holds its own sender
                    // clone for teardown; kept so a future refactor that
                    // drops it still closes the session cleanly.
                    None => break,
                }
            }
            // Inbound: frames from this client.
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match decode_client_event(&text) {
                            Ok(ClientEvent::ChatMessage(payload)) => {
                                state.dispatcher().handle_chat_message(id, payload).await;
                            }
                            Err(e) => {
                                // Scoped to this one frame; the session stays up.
                                warn!(%id, error = %e, "dropping malformed frame");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            debug!(%id, "pong failed, closing session");
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(%id, "client closed connection");
                        break;
                    }
                    Some(Err(e)) => {
                        debug!(%id, "websocket error: {e}");
                        break;
                    }
                    _ => {
                        // Binary and pong frames are ignored.
                    }
                }
            }
        }
    }

    state.dispatcher().handle_disconnect(id, &sender).await;
}
