pub mod show;
pub mod validate;

use clap::ArgMatches;
use outpost_config::{source, ConfigError, Fragment, RuntimeConfig};

use crate::flags::AgentFlags;

/// Defaults, then config sources, then flags.
pub fn load_config(flags: AgentFlags, matches: &ArgMatches) -> Result<RuntimeConfig, ConfigError> {
    let sources = flags.config_sources(matches);

    let mut fragments = vec![Fragment::defaults()];
    fragments.extend(source::load_all(&sources)?);
    fragments.push(flags.into_fragment());

    tracing::debug!(sources = sources.len(), "resolving agent configuration");
    outpost_config::resolve(&fragments)
}
