//! Error type for the RIS Live client.
//!
//! Library code returns [`RisError`]; the runner lifts it into
//! `anyhow::Result` with `?`. Per-frame decode failures are logged by the
//! receiver and never reach the caller.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RisError {
    /// Configuration parsing or validation error.
    #[error("config error: {0}")]
    Config(String),

    /// WebSocket connection, handshake, or communication error.
    #[error("websocket error: {0}")]
    WebSocket(String),

    /// Outbound control message could not be serialized.
    #[error("encode error: {0}")]
    Encode(serde_json::Error),

    /// Inbound frame is not a valid RIS Live envelope.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
