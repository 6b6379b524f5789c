//! Parsed connection settings

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::errors::{ConfigError, ConfigResult};
use super::policy::{BasePolicy, ClientPolicy, QueryPolicy, ScanPolicy};
use super::url::{parse_url, Host};

/// Every option key the connection understands
pub const RECOGNIZED_OPTIONS: &[&str] = &[
    "user",
    "password",
    "clusterName",
    "timeout",
    "loginTimeout",
    "maxConnsPerNode",
    "socketTimeout",
    "totalTimeout",
    "maxRetries",
    "sleepBetweenRetries",
    "sendKey",
    "recordsPerSecond",
    "maxConcurrentNodes",
    "recordSetQueueCapacity",
    "useBoolBin",
];

/// Connection settings, immutable once parsed
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionConfig {
    pub hosts: Vec<Host>,
    /// Default namespace from the URL path
    pub namespace: Option<String>,
    pub client: ClientPolicy,
    /// Point lookups
    pub read: BasePolicy,
    pub scan: ScanPolicy,
    pub query: QueryPolicy,
    /// Bounded capacity for scan and index query streams (None = growable)
    pub record_queue_capacity: Option<usize>,
    /// Booleans travel as boolean particles; false encodes them as 1/0
    pub use_bool_bin: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            hosts: vec![Host {
                name: "localhost".into(),
                port: super::url::DEFAULT_PORT,
            }],
            namespace: None,
            client: ClientPolicy::default(),
            read: BasePolicy::default(),
            scan: ScanPolicy::default(),
            query: QueryPolicy::default(),
            record_queue_capacity: None,
            use_bool_bin: true,
        }
    }
}

impl ConnectionConfig {
    /// Parses a URL and property map.
    ///
    /// URL parameters override properties with the same key.
    pub fn parse(url: &str, properties: &BTreeMap<String, String>) -> ConfigResult<Self> {
        let parsed = parse_url(url)?;

        let mut options = properties.clone();
        options.extend(parsed.params);

        let mut config = Self {
            hosts: parsed.hosts,
            namespace: parsed.namespace,
            ..Self::default()
        };
        for (key, value) in &options {
            if !config.apply_option(key, value)? {
                debug!(key = %key, "ignoring unrecognized connection option");
            }
        }

        info!(
            hosts = ?config.hosts.iter().map(ToString::to_string).collect::<Vec<_>>(),
            namespace = ?config.namespace,
            "connection configured"
        );
        Ok(config)
    }

    /// Applies one option; returns false if the key is not recognized
    pub fn apply_option(&mut self, key: &str, value: &str) -> ConfigResult<bool> {
        match key {
            "user" => self.client.user = Some(value.to_string()),
            "password" => self.client.password = Some(value.to_string()),
            "clusterName" => self.client.cluster_name = Some(value.to_string()),
            "timeout" => self.client.timeout_ms = parse_u32(key, value)?,
            "loginTimeout" => self.client.login_timeout_ms = parse_u32(key, value)?,
            "maxConnsPerNode" => self.client.max_conns_per_node = parse_u32(key, value)?,
            "socketTimeout" => {
                let ms = parse_u32(key, value)?;
                self.each_base(|base| base.socket_timeout_ms = ms);
            }
            "totalTimeout" => {
                let ms = parse_u32(key, value)?;
                self.each_base(|base| base.total_timeout_ms = ms);
            }
            "maxRetries" => {
                let retries = parse_u32(key, value)?;
                self.each_base(|base| base.max_retries = retries);
            }
            "sleepBetweenRetries" => {
                let ms = parse_u32(key, value)?;
                self.each_base(|base| base.sleep_between_retries_ms = ms);
            }
            "sendKey" => {
                let send = parse_bool(key, value)?;
                self.each_base(|base| base.send_key = send);
            }
            "recordsPerSecond" => {
                let rps = parse_u32(key, value)?;
                self.scan.records_per_second = rps;
                self.query.records_per_second = rps;
            }
            "maxConcurrentNodes" => self.scan.max_concurrent_nodes = parse_u32(key, value)?,
            "recordSetQueueCapacity" => {
                let capacity = parse_u32(key, value)? as usize;
                if capacity == 0 {
                    return Err(ConfigError::invalid_value(key, value, "must be positive"));
                }
                self.record_queue_capacity = Some(capacity);
            }
            "useBoolBin" => self.use_bool_bin = parse_bool(key, value)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    fn each_base(&mut self, mut apply: impl FnMut(&mut BasePolicy)) {
        apply(&mut self.read);
        apply(&mut self.scan.base);
        apply(&mut self.query.base);
    }
}

fn parse_u32(key: &str, value: &str) -> ConfigResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::invalid_value(key, value, e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::invalid_value(key, value, "expected true or false")),
    }
}
