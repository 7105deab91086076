//! `outpost show` — Print the resolved configuration.

use clap::{ArgMatches, ValueEnum};

use super::load_config;
use crate::flags::AgentFlags;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

pub fn run(
    flags: AgentFlags,
    matches: &ArgMatches,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(flags, matches).map_err(|e| format!("Failed to load config: {e}"))?;

    let rendered = match format {
        OutputFormat::Toml => toml::to_string_pretty(&config)?,
        OutputFormat::Json => serde_json::to_string_pretty(&config)?,
    };
    println!("{rendered}");
    Ok(())
}
