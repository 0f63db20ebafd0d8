//! RIS Live wire types.
//!
//! - [`envelope`]: inbound frames (`ris_message` and everything else)
//! - [`control`]: outbound client messages (`ping`, `ris_subscribe`)

pub mod control;
pub mod envelope;

pub use control::*;
pub use envelope::*;
