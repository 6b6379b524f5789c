//! Connection URL parsing
//!
//! Grammar: `jdbc:aerospike:[//]host[:port][,host[:port]]*[/namespace][?key=value[&key=value]*]`

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::errors::{ConfigError, ConfigResult};

/// Port used when a host omits one
pub const DEFAULT_PORT: u16 = 3000;

/// One seed host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub name: String,
    pub port: u16,
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.port)
    }
}

/// Pieces of a connection URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    pub hosts: Vec<Host>,
    pub namespace: Option<String>,
    /// `key=value` pairs after `?`
    pub params: BTreeMap<String, String>,
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^jdbc:aerospike:(?://)?(?P<hosts>[^/?]+)(?:/(?P<ns>[^?]*))?(?:\?(?P<params>.*))?$")
            .expect("URL pattern is valid")
    })
}

/// Splits a connection URL into hosts, namespace and parameters
pub fn parse_url(url: &str) -> ConfigResult<ParsedUrl> {
    let caps = url_pattern()
        .captures(url)
        .ok_or_else(|| ConfigError::InvalidUrl(url.to_string()))?;

    let hosts = caps
        .name("hosts")
        .map(|m| m.as_str())
        .unwrap_or_default()
        .split(',')
        .filter(|h| !h.is_empty())
        .map(|h| parse_host(url, h))
        .collect::<ConfigResult<Vec<_>>>()?;
    if hosts.is_empty() {
        return Err(ConfigError::InvalidUrl(url.to_string()));
    }

    let namespace = caps
        .name("ns")
        .map(|m| m.as_str().to_string())
        .filter(|ns| !ns.is_empty());

    let mut params = BTreeMap::new();
    if let Some(query) = caps.name("params") {
        for pair in query.as_str().split('&') {
            // pairs without a value are skipped
            if let Some((key, value)) = pair.split_once('=') {
                if !key.is_empty() && !value.is_empty() {
                    params.insert(key.to_string(), value.to_string());
                }
            }
        }
    }

    Ok(ParsedUrl {
        hosts,
        namespace,
        params,
    })
}

fn parse_host(url: &str, spec: &str) -> ConfigResult<Host> {
    match spec.split_once(':') {
        Some((name, port)) => {
            let port = port
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidUrl(url.to_string()))?;
            Ok(Host {
                name: name.to_string(),
                port,
            })
        }
        None => Ok(Host {
            name: spec.to_string(),
            port: DEFAULT_PORT,
        }),
    }
}
