//! Configuration fragments — sparse snapshots produced by a single source.
//!
//! A fragment only carries what its source actually set. Optional values
//! stay `None` until some source mentions them, so `Some(false)` or
//! `Some(String::new())` are real settings and not "unset".

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ConfigError;

/// One sparsely-populated configuration snapshot.
///
/// Field names in TOML/JSON files follow the agent's file format:
///
/// ```toml
/// bootstrap = true
/// datacenter = "eu-west"
/// bind_addr = "10.0.0.5"
/// check_update_interval = "10m"
/// start_join = ["10.0.0.6", "10.0.0.7"]
///
/// [ports]
/// dns = 8600
///
/// [node_meta]
/// rack = "r12"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap: Option<bool>,

    /// Interval between update checks, as a duration string ("5m", "1h 30m").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_update_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter: Option<String>,

    /// Interface to bind listeners to. An empty string means all interfaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_addr: Option<String>,

    /// LAN addresses to join at startup.
    #[serde(default, rename = "start_join", skip_serializing_if = "Vec::is_empty")]
    pub join_addrs_lan: Vec<String>,

    /// Free-form node metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub node_meta: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "Ports::is_empty")]
    pub ports: Ports,
}

/// Listener ports grouped under the `[ports]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ports {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<u16>,
}

impl Ports {
    /// True when no port in the group has been set.
    pub fn is_empty(&self) -> bool {
        let Ports { dns } = self;
        dns.is_none()
    }
}

/// Encoding of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Json,
}

impl Format {
    /// Pick the format from a file extension (`.toml` or `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl Fragment {
    /// Decode a fragment from configuration text.
    ///
    /// `origin` names the source in error messages (a path, "flags", ...).
    /// Unknown keys are ignored.
    pub fn parse(format: Format, text: &str, origin: &str) -> Result<Self, ConfigError> {
        let parsed = match format {
            Format::Toml => toml::from_str(text).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        };

        parsed.map_err(|reason| ConfigError::Parse {
            origin: origin.to_string(),
            reason,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Self::parse(Format::Toml, text, "<toml>")
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::parse(Format::Json, text, "<json>")
    }
}
