//! Configuration for the Outpost agent.
//!
//! Startup configuration is built from several partial sources — built-in
//! defaults, config files and directories, command-line flags — each
//! decoded into a [`Fragment`]. Fragments are merged in precedence order
//! (see [`merge`]) and the result is validated into a [`RuntimeConfig`].
//!
//! ```
//! use outpost_config::{resolve, Fragment};
//!
//! let flags = Fragment {
//!     datacenter: Some("eu-west".into()),
//!     ..Fragment::default()
//! };
//! let config = resolve(&[Fragment::defaults(), flags]).unwrap();
//! assert_eq!(config.datacenter, "eu-west");
//! assert_eq!(config.dns_addrs_udp, vec![":8600"]);
//! ```

pub mod defaults;
pub mod error;
pub mod fragment;
pub mod merge;
pub mod runtime;
pub mod source;

pub use error::ConfigError;
pub use fragment::{Format, Fragment, Ports};
pub use merge::{merge_fragments, Merge, MergeField, MergePolicy};
pub use runtime::{RuntimeConfig, WILDCARD_ADDR};
pub use source::ConfigSource;

/// Merge `fragments` (lowest precedence first) and assemble the result.
pub fn resolve(fragments: &[Fragment]) -> Result<RuntimeConfig, ConfigError> {
    RuntimeConfig::from_fragment(merge_fragments(fragments))
}
