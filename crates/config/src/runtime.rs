//! Runtime configuration assembly.
//!
//! Turns one merged [`Fragment`] into a fully-resolved [`RuntimeConfig`].
//! Steps run in a fixed order and the first failure is returned:
//!
//! 1. `bootstrap` (default `false`)
//! 2. `check_update_interval` (duration string, default zero)
//! 3. `datacenter` (default empty)
//! 4. `start_join` and `node_meta`, copied as-is
//! 5. ports without a bind address are rejected
//! 6. `bind_addrs` from `bind_addr` (empty string means `0.0.0.0`)
//! 7. DNS listen endpoints, one TCP and one UDP per bind address

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;

use crate::error::ConfigError;
use crate::fragment::Fragment;

/// Address meaning "listen on all interfaces".
pub const WILDCARD_ADDR: &str = "0.0.0.0";

/// Fully-resolved agent configuration. Every field has a concrete value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RuntimeConfig {
    pub bootstrap: bool,

    #[serde(serialize_with = "serialize_duration")]
    pub check_update_interval: Duration,

    pub datacenter: String,

    pub bind_addrs: Vec<String>,
    pub join_addrs_lan: Vec<String>,

    /// Zero when no DNS port was configured.
    pub dns_port: u16,
    pub dns_addrs_tcp: Vec<String>,
    pub dns_addrs_udp: Vec<String>,

    pub node_meta: BTreeMap<String, String>,
}

impl RuntimeConfig {
    /// Validate a merged fragment and derive the runtime configuration.
    pub fn from_fragment(fragment: Fragment) -> Result<Self, ConfigError> {
        let Fragment {
            bootstrap,
            check_update_interval,
            datacenter,
            bind_addr,
            join_addrs_lan,
            node_meta,
            ports,
        } = fragment;

        let bootstrap = bootstrap.unwrap_or(false);
        let check_update_interval = match check_update_interval {
            Some(value) => parse_duration("check_update_interval", &value)?,
            None => Duration::ZERO,
        };
        let datacenter = datacenter.unwrap_or_default();

        // Production always merges a default bind address first, so this
        // only fires for callers that skip the defaults.
        if bind_addr.is_none() && !ports.is_empty() {
            return Err(ConfigError::MissingBindAddress);
        }

        let bind_addrs: Vec<String> = bind_addr
            .map(|addr| vec![normalize_bind_addr(addr)])
            .unwrap_or_default();

        let (dns_port, dns_addrs_tcp, dns_addrs_udp) = match ports.dns {
            Some(port) => {
                let addrs: Vec<String> = bind_addrs
                    .iter()
                    .map(|host| join_host_port(host, port))
                    .collect();
                (port, addrs.clone(), addrs)
            }
            None => (0, Vec::new(), Vec::new()),
        };

        let config = Self {
            bootstrap,
            check_update_interval,
            datacenter,
            bind_addrs,
            join_addrs_lan,
            dns_port,
            dns_addrs_tcp,
            dns_addrs_udp,
            node_meta,
        };

        debug!(
            datacenter = %config.datacenter,
            bind_addrs = ?config.bind_addrs,
            dns_port = config.dns_port,
            "assembled runtime configuration"
        );

        Ok(config)
    }
}

fn parse_duration(field: &'static str, value: &str) -> Result<Duration, ConfigError> {
    humantime::parse_duration(value).map_err(|e| ConfigError::DurationParse {
        field,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn normalize_bind_addr(addr: String) -> String {
    if addr.is_empty() {
        WILDCARD_ADDR.to_string()
    } else {
        addr
    }
}

/// Join a host and port into a listen address.
///
/// The wildcard host is dropped (`":53"`), IPv6 literals are bracketed.
fn join_host_port(host: &str, port: u16) -> String {
    let host = if host == WILDCARD_ADDR { "" } else { host };
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&humantime::format_duration(*duration))
}
