//! Inbound RIS Live frames.
//!
//! Every frame is a JSON object tagged by `type`. Only `ris_message` is
//! decoded into a typed payload; other envelopes (`pong`, `ris_error`,
//! `ris_subscribe_ok`, ...) are kept as raw JSON so they can be logged
//! verbatim.
//!
//! ```json
//! {
//!   "type": "ris_message",
//!   "data": {
//!     "timestamp": 1695269583.730,
//!     "peer": "217.29.66.158",
//!     "peer_asn": "24482",
//!     "id": "217.29.66.158-018ab5f0fb720005",
//!     "host": "rrc10.ripe.net",
//!     "type": "UPDATE",
//!     "path": [24482, 6939, 38040, 23969],
//!     "community": [[24482, 2], [24482, 200]],
//!     "origin": "IGP",
//!     "med": 0,
//!     "announcements": [{"next_hop": "217.29.66.158", "prefixes": ["1.1.249.0/24"]}],
//!     "withdrawals": []
//!   }
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RisError;

const RIS_MESSAGE: &str = "ris_message";

/// A decoded inbound frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// `ris_message`: a BGP event seen by a route collector.
    RisMessage(RisMessage),
    /// Any other envelope type, passed through untouched.
    Other(RawEnvelope),
}

impl Envelope {
    /// Decode a frame payload.
    ///
    /// The outer object must be valid JSON with an optional string `type`.
    /// For `ris_message` the `data` object must also match [`RisMessage`];
    /// a null or missing `data` decodes as an empty message.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, RisError> {
        let raw: RawEnvelope = serde_json::from_slice(bytes)?;
        if raw.msg_type != RIS_MESSAGE {
            return Ok(Self::Other(raw));
        }
        if raw.data.is_null() {
            return Ok(Self::RisMessage(RisMessage::default()));
        }
        let msg: RisMessage = serde_json::from_value(raw.data)?;
        Ok(Self::RisMessage(msg))
    }

    /// The outer `type` tag.
    pub fn msg_type(&self) -> &str {
        match self {
            Self::RisMessage(_) => RIS_MESSAGE,
            Self::Other(raw) => &raw.msg_type,
        }
    }
}

/// Envelope with an untyped payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEnvelope {
    #[serde(rename = "type", default)]
    pub msg_type: String,
    #[serde(default)]
    pub data: Value,
}

impl fmt::Display for RawEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{self:?}"),
        }
    }
}

/// Decode an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload of a `ris_message` envelope.
///
/// All fields default when absent or null: non-UPDATE messages (`OPEN`,
/// `RIS_PEER_STATE`, ...) carry only a subset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RisMessage {
    /// Seconds since the Unix epoch, millisecond precision.
    #[serde(deserialize_with = "null_as_default")]
    pub timestamp: f64,
    /// BGP peer address.
    #[serde(deserialize_with = "null_as_default")]
    pub peer: String,
    /// BGP peer ASN. RIS Live sends it as a string.
    #[serde(deserialize_with = "null_as_default")]
    pub peer_asn: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Route collector, e.g. `rrc10.ripe.net`.
    #[serde(deserialize_with = "null_as_default")]
    pub host: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub msg_type: RisMessageType,
    #[serde(deserialize_with = "null_as_default")]
    pub path: Vec<PathSegment>,
    #[serde(deserialize_with = "null_as_default")]
    pub community: Vec<(u32, u32)>,
    #[serde(deserialize_with = "null_as_default")]
    pub origin: String,
    pub med: Option<u32>,
    #[serde(deserialize_with = "null_as_default")]
    pub announcements: Vec<Announcement>,
    /// Withdrawn prefixes. Shape is not relied upon.
    #[serde(deserialize_with = "null_as_default")]
    pub withdrawals: Vec<Value>,
}

impl RisMessage {
    pub fn is_update(&self) -> bool {
        self.msg_type == RisMessageType::Update
    }
}

/// Inner `type` of a `ris_message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RisMessageType {
    Update,
    Open,
    Notification,
    Keepalive,
    RisPeerState,
    /// Anything RIS Live adds later, kept verbatim.
    Other(String),
}

impl Default for RisMessageType {
    /// A payload without `type` is not treated as an UPDATE.
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl RisMessageType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Update => "UPDATE",
            Self::Open => "OPEN",
            Self::Notification => "NOTIFICATION",
            Self::Keepalive => "KEEPALIVE",
            Self::RisPeerState => "RIS_PEER_STATE",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for RisMessageType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "UPDATE" => Self::Update,
            "OPEN" => Self::Open,
            "NOTIFICATION" => Self::Notification,
            "KEEPALIVE" => Self::Keepalive,
            "RIS_PEER_STATE" => Self::RisPeerState,
            _ => Self::Other(s),
        }
    }
}

impl From<RisMessageType> for String {
    fn from(t: RisMessageType) -> Self {
        match t {
            RisMessageType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for RisMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One hop of an AS path: a plain ASN or an AS_SET (`[64500, 64501]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Asn(u32),
    Set(Vec<u32>),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asn(asn) => write!(f, "{asn}"),
            Self::Set(asns) => {
                f.write_str("{")?;
                for (i, asn) in asns.iter().enumerate() {
                    if i != 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{asn}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Prefixes announced via one next hop.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Announcement {
    #[serde(deserialize_with = "null_as_default")]
    pub next_hop: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prefixes: Vec<String>,
}

impl fmt::Display for Announcement {
    /// `{next_hop [prefix prefix ...]}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{} [{}]}}", self.next_hop, self.prefixes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPDATE: &str = r#"{
        "type": "ris_message",
        "data": {
            "timestamp": 1695269583.73,
            "peer": "217.29.66.158",
            "peer_asn": "24482",
            "id": "217.29.66.158-018ab5f0fb720005",
            "host": "rrc10.ripe.net",
            "type": "UPDATE",
            "path": [24482, 6939, 38040, 23969],
            "community": [[24482, 2], [24482, 200], [24482, 12000]],
            "origin": "IGP",
            "med": 0,
            "announcements": [{"next_hop": "217.29.66.158", "prefixes": ["1.1.249.0/24"]}],
            "withdrawals": []
        }
    }"#;

    #[test]
    fn decode_update() {
        let env = Envelope::from_slice(UPDATE.as_bytes()).unwrap();
        let Envelope::RisMessage(msg) = env else { panic!("expected ris_message") };
        assert!(msg.is_update());
        assert_eq!(msg.peer_asn, "24482");
        assert_eq!(msg.host, "rrc10.ripe.net");
        assert_eq!(msg.path.len(), 4);
        assert_eq!(msg.path[0], PathSegment::Asn(24482));
        assert_eq!(msg.community[1], (24482, 200));
        assert_eq!(msg.med, Some(0));
        assert_eq!(msg.announcements[0].prefixes, vec!["1.1.249.0/24".to_string()]);
        assert!(msg.withdrawals.is_empty());
    }

    #[test]
    fn decode_path_with_as_set() {
        let json = r#"{"type":"ris_message","data":{"type":"UPDATE","path":[3356,[64500,64501]]}}"#;
        let Envelope::RisMessage(msg) = Envelope::from_slice(json.as_bytes()).unwrap() else {
            panic!("expected ris_message")
        };
        assert_eq!(msg.path[1], PathSegment::Set(vec![64500, 64501]));
        assert_eq!(msg.path[1].to_string(), "{64500,64501}");
    }

    #[test]
    fn decode_peer_state_without_update_fields() {
        let json = r#"{"type":"ris_message","data":{"timestamp":1.5,"peer":"192.0.2.1","peer_asn":"64496","host":"rrc00","type":"RIS_PEER_STATE","state":"connected"}}"#;
        let Envelope::RisMessage(msg) = Envelope::from_slice(json.as_bytes()).unwrap() else {
            panic!("expected ris_message")
        };
        assert_eq!(msg.msg_type, RisMessageType::RisPeerState);
        assert!(!msg.is_update());
        assert!(msg.announcements.is_empty());
        assert_eq!(msg.med, None);
    }

    #[test]
    fn null_fields_decode_as_empty() {
        let json = r#"{"type":"ris_message","data":{"timestamp":1.5,"peer":"192.0.2.1","peer_asn":"64496","host":"rrc00","type":"UPDATE","path":[64496],"community":null,"med":null,"origin":null,"announcements":[{"next_hop":"192.0.2.1","prefixes":null}],"withdrawals":null}}"#;
        let Envelope::RisMessage(msg) = Envelope::from_slice(json.as_bytes()).unwrap() else {
            panic!("expected ris_message")
        };
        assert!(msg.is_update());
        assert!(msg.community.is_empty());
        assert_eq!(msg.med, None);
        assert_eq!(msg.origin, "");
        assert!(msg.announcements[0].prefixes.is_empty());
        assert!(msg.withdrawals.is_empty());
    }

    #[test]
    fn null_data_is_an_empty_message() {
        let env = Envelope::from_slice(br#"{"type":"ris_message","data":null}"#).unwrap();
        assert_eq!(env, Envelope::RisMessage(RisMessage::default()));
        let env = Envelope::from_slice(br#"{"type":"ris_message"}"#).unwrap();
        assert_eq!(env, Envelope::RisMessage(RisMessage::default()));
    }

    #[test]
    fn unknown_inner_type_is_kept() {
        let t = RisMessageType::from("ROUTE_REFRESH".to_string());
        assert_eq!(t, RisMessageType::Other("ROUTE_REFRESH".into()));
        assert_eq!(t.to_string(), "ROUTE_REFRESH");
        assert_eq!(String::from(RisMessageType::Keepalive), "KEEPALIVE");
    }

    #[test]
    fn other_envelopes_pass_through() {
        let env = Envelope::from_slice(br#"{"type":"pong","data":null}"#).unwrap();
        assert_eq!(env.msg_type(), "pong");
        let Envelope::Other(raw) = env else { panic!("expected other") };
        assert_eq!(raw.to_string(), r#"{"type":"pong","data":null}"#);

        let env = Envelope::from_slice(br#"{"type":"ris_error","data":{"message":"bad prefix"}}"#).unwrap();
        assert!(matches!(env, Envelope::Other(ref raw) if raw.data["message"] == "bad prefix"));
    }

    #[test]
    fn malformed_frames_are_errors() {
        assert!(Envelope::from_slice(b"not json").is_err());
        assert!(Envelope::from_slice(br#"{"type":"ris_message","data":{"path":"oops"}}"#).is_err());
    }

    #[test]
    fn announcement_display() {
        let ann = Announcement {
            next_hop: "192.0.2.1".into(),
            prefixes: vec!["198.51.100.0/24".into(), "203.0.113.0/24".into()],
        };
        assert_eq!(ann.to_string(), "{192.0.2.1 [198.51.100.0/24 203.0.113.0/24]}");
    }
}
