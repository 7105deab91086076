//! `outpost validate` — Build the configuration and report problems.

use std::time::Duration;

use clap::ArgMatches;
use outpost_config::RuntimeConfig;

use super::load_config;
use crate::flags::AgentFlags;

pub fn run(flags: AgentFlags, matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    println!("🔍 Validating configuration...");

    let config = match load_config(flags, matches) {
        Ok(config) => config,
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    };
    println!("   ✅ Config resolved successfully");

    let warnings = warnings(&config);
    if warnings.is_empty() {
        println!("   ✅ All checks passed");
    } else {
        println!();
        for w in &warnings {
            println!("   ⚠️  {w}");
        }
    }

    println!();
    println!("   Datacenter:  {}", config.datacenter);
    println!("   Bind:        {}", config.bind_addrs.join(", "));
    println!("   DNS (tcp):   {}", config.dns_addrs_tcp.join(", "));
    println!("   DNS (udp):   {}", config.dns_addrs_udp.join(", "));
    println!("   Join:        {}", config.join_addrs_lan.len());
    println!("   Bootstrap:   {}", if config.bootstrap { "yes" } else { "no" });
    println!("   Node meta:   {}", config.node_meta.len());

    Ok(())
}

/// Settings that resolve cleanly but are probably not what the operator wants.
fn warnings(config: &RuntimeConfig) -> Vec<&'static str> {
    let mut warnings = Vec::new();

    if config.bootstrap && !config.join_addrs_lan.is_empty() {
        warnings.push("Bootstrap mode is enabled together with join addresses");
    }

    if !config.bootstrap && config.join_addrs_lan.is_empty() {
        warnings.push("No join addresses; the agent will wait for another node to join it");
    }

    if config.check_update_interval == Duration::ZERO {
        warnings.push("Update checks are disabled (check_update_interval is zero)");
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_node_without_join_warns() {
        let config = RuntimeConfig {
            check_update_interval: Duration::from_secs(60),
            ..RuntimeConfig::default()
        };
        assert_eq!(warnings(&config).len(), 1);
    }

    #[test]
    fn bootstrap_with_join_warns() {
        let config = RuntimeConfig {
            bootstrap: true,
            join_addrs_lan: vec!["10.0.0.6".into()],
            check_update_interval: Duration::from_secs(60),
            ..RuntimeConfig::default()
        };
        let found = warnings(&config);
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("Bootstrap"));
    }

    #[test]
    fn clean_config_has_no_warnings() {
        let config = RuntimeConfig {
            join_addrs_lan: vec!["10.0.0.6".into()],
            check_update_interval: Duration::from_secs(300),
            ..RuntimeConfig::default()
        };
        assert!(warnings(&config).is_empty());
    }
}
