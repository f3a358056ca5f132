//! Functional core of the Parley chat relay.
//!
//! Two components form the whole of the relay logic:
//!
//! - [`SessionRegistry`] — the authoritative set of currently connected
//!   sessions, keyed by [`SessionId`](parley_types::SessionId), each
//!   paired with its outbound event channel.
//! - [`Dispatcher`] — translates transport lifecycle callbacks
//!   (connect, disconnect) and inbound chat events into registry
//!   updates and best-effort fan-out to every registered session.
//!
//! The relay holds no history and gives no delivery guarantees beyond
//! in-process fan-out: a chat message exists only for the duration of
//! one broadcast call. The transport layer (see `parley-server`) owns
//! the sockets; this crate never touches I/O directly, which keeps the
//! core testable with plain channels.

pub mod dispatcher;
pub mod error;
pub mod registry;

pub use dispatcher::{Dispatcher, decode_client_event};
pub use error::RelayError;
pub use registry::{SessionRegistry, SessionSender};
