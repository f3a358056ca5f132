//! Shared type definitions for the Parley chat relay.
//!
//! This crate holds the types that cross crate boundaries: the
//! [`SessionId`] assigned to every connection, and the wire-level event
//! envelopes ([`ClientEvent`], [`ServerEvent`]) exchanged over the
//! `WebSocket` transport. All types derive [`ts_rs::TS`] so the frontend
//! bundle gets compile-time-checked TypeScript bindings.

pub mod events;
pub mod ids;

pub use events::{ChatBroadcast, ChatPayload, ClientEvent, ServerEvent};
pub use ids::SessionId;
