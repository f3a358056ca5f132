//! Error types for the relay core.
//!
//! All relay failures are local to the single event being processed.
//! There is no global error state and nothing here is fatal: a
//! malformed frame is logged and dropped, and the offending session
//! stays connected.

/// Errors that can occur while relaying events.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The inbound frame was not a well-formed named event: invalid
    /// JSON, an unknown event name, or a `chat_message` payload missing
    /// a required field.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
