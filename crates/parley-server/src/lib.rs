//! Transport and HTTP layer for the Parley chat relay.
//!
//! This crate owns everything outside the relay core:
//!
//! - **`WebSocket` endpoint** (`GET /ws`) — the named-event transport.
//!   Each accepted connection becomes one session; its lifecycle drives
//!   the [`Dispatcher`](parley_relay::Dispatcher) callbacks.
//! - **Liveness route** (`GET /`) — a JSON status message.
//! - **Static frontend mount** (optional) — serves the prebuilt bundle
//!   under `/app` with a single-page-application fallback to
//!   `index.html`.
//! - **CORS** — an origin allow-list (credentials enabled) or a
//!   wildcard, from configuration.
//!
//! # Architecture
//!
//! Each connection runs as one Tokio task pumping two directions
//! through a `select!` loop: inbound frames go to the dispatcher,
//! outbound events arrive on the session's unbounded channel and are
//! written to the socket. The registry snapshot taken per broadcast is
//! the only point of contact between sessions.

pub mod config;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use config::{ConfigError, ServerConfig};
pub use router::build_router;
pub use server::{ServerError, start_server};
pub use state::AppState;
