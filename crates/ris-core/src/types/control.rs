//! Outbound client messages.
//!
//! RIS Live accepts `{"type": ..., "data": ...}` objects from the client.
//! Only the two messages this client sends are modeled:
//!
//! ```json
//! {"type":"ping"}
//! {"type":"ris_subscribe","data":{"host":"","prefix":"0.0.0.0/0"}}
//! ```

use std::fmt;

use ipnet::IpNet;
use serde::{Deserialize, Serialize};

use crate::error::RisError;

/// Subscription filter carried by `ris_subscribe`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeFilter {
    /// Route collector to listen to (e.g. `"rrc21"`). Empty means all collectors.
    #[serde(default)]
    pub host: String,
    /// Announced or withdrawn prefixes must fall inside this block.
    pub prefix: IpNet,
}

impl SubscribeFilter {
    pub fn new(host: impl Into<String>, prefix: IpNet) -> Self {
        Self { host: host.into(), prefix }
    }
}

impl Default for SubscribeFilter {
    /// All collectors, all of the IPv4 address space.
    fn default() -> Self {
        Self { host: String::new(), prefix: IpNet::V4(Default::default()) }
    }
}

impl fmt::Display for SubscribeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let host = if self.host.is_empty() { "*" } else { &self.host };
        write!(f, "host={host} prefix={}", self.prefix)
    }
}

/// A message sent from the client to RIS Live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ControlMessage {
    /// Keepalive. Serializes without a `data` field.
    Ping,
    /// Start receiving messages matching the filter.
    RisSubscribe(SubscribeFilter),
}

impl ControlMessage {
    pub fn subscribe(filter: SubscribeFilter) -> Self {
        Self::RisSubscribe(filter)
    }

    /// Serialize to the JSON text sent in a WebSocket text frame.
    pub fn to_json(&self) -> Result<String, RisError> {
        serde_json::to_string(self).map_err(RisError::Encode)
    }
}
