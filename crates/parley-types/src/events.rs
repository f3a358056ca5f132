//! Wire-level event envelopes for the chat relay.
//!
//! Every frame on the `WebSocket` is a JSON text frame of the shape
//! `{"event": "<name>", "data": {...}}`, mirroring the named-event
//! transport the frontend speaks. [`ClientEvent`] covers frames the
//! server accepts; [`ServerEvent`] covers frames it emits. Both sides
//! currently carry a single event kind, `chat_message`; the tagged-enum
//! encoding leaves room for more without breaking the wire format.
//!
//! Payload fields are free-form text and pass through the relay
//! unchanged. The only transformation the server performs is attaching
//! the sender's [`SessionId`] on the way out (see [`ChatBroadcast`]).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::SessionId;

/// Inbound chat message payload.
///
/// Both fields are required; a frame missing either fails
/// deserialization and is dropped by the transport layer. No length
/// limits or sanitization are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChatPayload {
    /// Sender display name.
    pub name: String,
    /// Message body.
    pub message: String,
}

/// Outbound chat message: the inbound payload with the sender's session
/// id attached by the dispatcher.
///
/// Receivers use `sid` to attribute the message; the sender receives its
/// own message echoed back and is expected to tolerate or filter it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ChatBroadcast {
    /// Session id of the originating client.
    pub sid: SessionId,
    /// Sender display name, unchanged from the inbound payload.
    pub name: String,
    /// Message body, unchanged from the inbound payload.
    pub message: String,
}

impl ChatBroadcast {
    /// Attach a sender id to an inbound payload.
    pub fn tag(sid: SessionId, payload: ChatPayload) -> Self {
        Self {
            sid,
            name: payload.name,
            message: payload.message,
        }
    }
}

/// Events a client may send to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ClientEvent {
    /// A chat message to relay to every connected session.
    ChatMessage(ChatPayload),
}

/// Events the server emits to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ServerEvent {
    /// A chat message relayed from some session, possibly the receiver
    /// itself.
    ChatMessage(ChatBroadcast),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_event_decodes_named_frame() {
        let frame = r#"{"event":"chat_message","data":{"name":"Hamza","message":"Hello!"}}"#;
        let event: Result<ClientEvent, _> = serde_json::from_str(frame);
        assert_eq!(
            event.ok(),
            Some(ClientEvent::ChatMessage(ChatPayload {
                name: String::from("Hamza"),
                message: String::from("Hello!"),
            }))
        );
    }

    #[test]
    fn client_event_rejects_missing_message_field() {
        let frame = r#"{"event":"chat_message","data":{"name":"Hamza"}}"#;
        let event: Result<ClientEvent, _> = serde_json::from_str(frame);
        assert!(event.is_err());
    }

    #[test]
    fn client_event_rejects_unknown_event_name() {
        let frame = r#"{"event":"typing","data":{}}"#;
        let event: Result<ClientEvent, _> = serde_json::from_str(frame);
        assert!(event.is_err());
    }

    #[test]
    fn server_event_encodes_sid_alongside_payload() {
        let sid = SessionId::new();
        let event = ServerEvent::ChatMessage(ChatBroadcast {
            sid,
            name: String::from("Hamza"),
            message: String::from("Hello!"),
        });
        let json = serde_json::to_value(&event).ok();
        assert!(json.is_some());
        let json = json.unwrap_or_default();
        assert_eq!(json["event"], "chat_message");
        assert_eq!(json["data"]["sid"], sid.to_string());
        assert_eq!(json["data"]["name"], "Hamza");
        assert_eq!(json["data"]["message"], "Hello!");
    }

    #[test]
    fn tag_preserves_payload_fields() {
        let sid = SessionId::new();
        let broadcast = ChatBroadcast::tag(
            sid,
            ChatPayload {
                name: String::from("Ana"),
                message: String::from("hi"),
            },
        );
        assert_eq!(broadcast.sid, sid);
        assert_eq!(broadcast.name, "Ana");
        assert_eq!(broadcast.message, "hi");
    }
}
