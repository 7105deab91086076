//! Built-in defaults, merged underneath every other source.

use crate::fragment::{Fragment, Ports};
use crate::runtime::WILDCARD_ADDR;

pub const DEFAULT_DATACENTER: &str = "dc1";
pub const DEFAULT_DNS_PORT: u16 = 8600;
pub const DEFAULT_CHECK_UPDATE_INTERVAL: &str = "5m";

impl Fragment {
    /// The lowest-precedence fragment the agent starts from.
    ///
    /// It always carries a bind address, so ports set by later sources never
    /// trip the missing-bind-address check.
    pub fn defaults() -> Self {
        Self {
            bind_addr: Some(WILDCARD_ADDR.to_string()),
            check_update_interval: Some(DEFAULT_CHECK_UPDATE_INTERVAL.to_string()),
            datacenter: Some(DEFAULT_DATACENTER.to_string()),
            ports: Ports {
                dns: Some(DEFAULT_DNS_PORT),
            },
            ..Self::default()
        }
    }
}
