//! # ris-core
//!
//! Core crate for the RIS Live tail client, providing:
//!
//! - **Types** (`types`) — inbound envelopes, `ris_message` payloads, outbound control messages
//! - **Configuration** (`config`) — JSON config deserialization and defaults
//! - **Error types** (`error`) — domain-specific `RisError` via thiserror
//! - **WebSocket** (`ws`) — connect, subscribe, and the keepalive/interrupt loop
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod types;
pub mod ws;

// Re-export types at crate root for convenience.
pub use types::*;
