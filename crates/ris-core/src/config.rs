//! Client configuration.
//!
//! Every setting has a default, so the client runs with no config at all.
//! An optional JSON file can override any subset of fields; the runner then
//! applies command-line overrides on top.
//!
//! # Example config
//!
//! ```json
//! {
//!   "url": "wss://ris-live.ripe.net/v1/ws/",
//!   "client": "noc-dashboard",
//!   "host": "rrc21",
//!   "prefix": "151.101.0.0/16",
//!   "ping_interval_sec": 60,
//!   "close_timeout_ms": 1000
//! }
//! ```

use std::time::Duration;

use ipnet::IpNet;
use serde::Deserialize;
use url::Url;

use crate::error::RisError;
use crate::types::SubscribeFilter;

/// Public RIS Live endpoint.
pub const DEFAULT_URL: &str = "ws://ris-live.ripe.net/v1/ws/";

/// Client settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// WebSocket endpoint (`ws://` or `wss://`).
    pub url: String,

    /// Client name sent as the `client` query parameter.
    pub client: Option<String>,

    /// Collector filter. Empty means all collectors.
    pub host: String,

    /// Prefix filter (CIDR).
    pub prefix: IpNet,

    /// Keepalive interval in seconds (default: 60).
    pub ping_interval_sec: u64,

    /// How long to wait for the receiver after sending a close frame.
    pub close_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            client: None,
            host: String::new(),
            prefix: SubscribeFilter::default().prefix,
            ping_interval_sec: 60,
            close_timeout_ms: 1000,
        }
    }
}

impl ClientConfig {
    /// Check settings that would otherwise fail later at runtime.
    pub fn validate(&self) -> Result<(), RisError> {
        if self.ping_interval_sec == 0 {
            return Err(RisError::Config("ping_interval_sec must be greater than 0".into()));
        }
        self.endpoint().map(|_| ())
    }

    /// Parsed endpoint URL including the `client` query parameter.
    pub fn endpoint(&self) -> Result<Url, RisError> {
        let mut url =
            Url::parse(&self.url).map_err(|e| RisError::Config(format!("invalid url {:?}: {e}", self.url)))?;

        match url.scheme() {
            "ws" | "wss" => {}
            other => return Err(RisError::Config(format!("unsupported url scheme {other:?}"))),
        }

        if let Some(client) = self.client.as_deref().filter(|c| !c.is_empty()) {
            url.query_pairs_mut().append_pair("client", client);
        }
        Ok(url)
    }

    /// The subscription this config asks for.
    pub fn filter(&self) -> SubscribeFilter {
        SubscribeFilter::new(self.host.clone(), self.prefix)
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_sec)
    }

    pub fn close_timeout(&self) -> Duration {
        Duration::from_millis(self.close_timeout_ms)
    }
}

/// Load and parse a JSON config file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<ClientConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: ClientConfig = serde_json::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.url, DEFAULT_URL);
        assert_eq!(cfg.filter(), SubscribeFilter::default());
        assert_eq!(cfg.ping_interval(), Duration::from_secs(60));
        assert_eq!(cfg.close_timeout(), Duration::from_secs(1));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: ClientConfig = serde_json::from_str(r#"{"host": "rrc21", "prefix": "151.101.0.0/16"}"#).unwrap();
        assert_eq!(cfg.host, "rrc21");
        assert_eq!(cfg.prefix.to_string(), "151.101.0.0/16");
        assert_eq!(cfg.ping_interval_sec, 60);
        assert_eq!(cfg.url, DEFAULT_URL);
    }

    #[test]
    fn unknown_fields_rejected() {
        assert!(serde_json::from_str::<ClientConfig>(r#"{"hots": "rrc21"}"#).is_err());
    }

    #[test]
    fn bad_prefix_rejected() {
        assert!(serde_json::from_str::<ClientConfig>(r#"{"prefix": "10.0.0.0/33"}"#).is_err());
    }

    #[test]
    fn endpoint_appends_client() {
        let cfg = ClientConfig { client: Some("ris-tail".into()), ..Default::default() };
        assert_eq!(cfg.endpoint().unwrap().as_str(), "ws://ris-live.ripe.net/v1/ws/?client=ris-tail");
    }

    #[test]
    fn validate_rejects_zero_ping_and_http() {
        let cfg = ClientConfig { ping_interval_sec: 0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(RisError::Config(_))));

        let cfg = ClientConfig { url: "http://ris-live.ripe.net/v1/ws/".into(), ..Default::default() };
        assert!(matches!(cfg.validate(), Err(RisError::Config(_))));
    }
}
