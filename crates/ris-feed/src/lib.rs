//! # ris-feed
//!
//! Receive side of the RIS Live client.
//!
//! - [`decoder`]: receiver task that reads, classifies, and logs frames
//! - [`render`]: one-line summaries of `ris_message` payloads
//! - [`session`]: wires connect → subscribe → receiver task → lifecycle loop

pub mod decoder;
pub mod render;
pub mod session;
