//! Agent command-line flags.
//!
//! Flags form the highest-precedence fragment. `--config-dir` and
//! `--config-file` are not merged themselves: they name the sources loaded
//! underneath the flags, in the order they appear on the command line.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgMatches, Args};
use outpost_config::{ConfigSource, Fragment, Ports};

#[derive(Debug, Clone, Default, Args)]
pub struct AgentFlags {
    /// Address to bind listeners to ("" means all interfaces)
    #[arg(long = "bind", value_name = "ADDR")]
    pub bind_addr: Option<String>,

    /// Start in bootstrap mode (`--bootstrap` or `--bootstrap=false`)
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_parser = BoolishValueParser::new()
    )]
    pub bootstrap: Option<bool>,

    /// Load every .toml/.json file in this directory (repeatable)
    #[arg(long = "config-dir", value_name = "DIR")]
    pub config_dirs: Vec<PathBuf>,

    /// Load this .toml/.json config file (repeatable)
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_files: Vec<PathBuf>,

    /// Datacenter of the agent
    #[arg(long, value_name = "NAME")]
    pub datacenter: Option<String>,

    /// DNS listener port
    #[arg(long = "dns-port", value_name = "PORT")]
    pub dns_port: Option<u16>,

    /// Address to join at startup (repeatable)
    #[arg(long = "join", value_name = "ADDR")]
    pub join: Vec<String>,

    /// Node metadata as `key` or `key:value` (repeatable)
    #[arg(long = "node-meta", value_name = "KEY[:VALUE]", value_parser = parse_node_meta)]
    pub node_meta: Vec<(String, String)>,
}

impl AgentFlags {
    /// Config sources in command-line order.
    ///
    /// `matches` must be the matches these flags were parsed from; clap keeps
    /// directories and files apart, so their positions restore the order.
    pub fn config_sources(&self, matches: &ArgMatches) -> Vec<ConfigSource> {
        let dirs = positions(matches, "config_dirs")
            .zip(self.config_dirs.iter().cloned().map(ConfigSource::Dir));
        let files = positions(matches, "config_files")
            .zip(self.config_files.iter().cloned().map(ConfigSource::File));

        let mut sources: Vec<(usize, ConfigSource)> = dirs.chain(files).collect();
        sources.sort_by_key(|(index, _)| *index);
        sources.into_iter().map(|(_, source)| source).collect()
    }

    /// The fragment set by these flags.
    pub fn into_fragment(self) -> Fragment {
        let node_meta: BTreeMap<String, String> = self.node_meta.into_iter().collect();

        Fragment {
            bootstrap: self.bootstrap,
            check_update_interval: None,
            datacenter: self.datacenter,
            bind_addr: self.bind_addr,
            join_addrs_lan: self.join,
            node_meta,
            ports: Ports { dns: self.dns_port },
        }
    }
}

fn positions<'a>(matches: &'a ArgMatches, id: &'static str) -> impl Iterator<Item = usize> + 'a {
    matches.indices_of(id).into_iter().flatten()
}

/// Split `key:value` on the first colon. A bare `key` gets an empty value.
fn parse_node_meta(raw: &str) -> Result<(String, String), Infallible> {
    let (key, value) = raw.split_once(':').unwrap_or((raw, ""));
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::{CommandFactory, FromArgMatches, Parser};
    use std::path::Path;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        flags: AgentFlags,
    }

    fn parse(args: &[&str]) -> Result<(AgentFlags, ArgMatches), clap::Error> {
        let argv = std::iter::once("outpost").chain(args.iter().copied());
        let matches = TestCli::command().try_get_matches_from(argv)?;
        let cli = TestCli::from_arg_matches(&matches)?;
        Ok((cli.flags, matches))
    }

    #[test]
    fn no_flags_is_empty_fragment() {
        let (flags, matches) = parse(&[]).unwrap();
        assert!(flags.config_sources(&matches).is_empty());
        assert_eq!(flags.into_fragment(), Fragment::default());
    }

    #[test]
    fn scalar_flags_map_to_fragment() {
        let (flags, _) = parse(&[
            "--bind",
            "10.0.0.5",
            "--datacenter",
            "eu-west",
            "--dns-port",
            "53",
        ])
        .unwrap();

        let fragment = flags.into_fragment();
        assert_eq!(fragment.bind_addr.as_deref(), Some("10.0.0.5"));
        assert_eq!(fragment.datacenter.as_deref(), Some("eu-west"));
        assert_eq!(fragment.ports.dns, Some(53));
        assert!(fragment.bootstrap.is_none());
    }

    #[test]
    fn empty_bind_is_present() {
        let (flags, _) = parse(&["--bind", ""]).unwrap();
        assert_eq!(flags.into_fragment().bind_addr, Some(String::new()));
    }

    #[test]
    fn bootstrap_flag_forms() {
        let (flags, _) = parse(&["--bootstrap"]).unwrap();
        assert_eq!(flags.bootstrap, Some(true));

        let (flags, _) = parse(&["--bootstrap=false"]).unwrap();
        assert_eq!(flags.bootstrap, Some(false));

        let (flags, _) = parse(&["--bootstrap", "--join", "a"]).unwrap();
        assert_eq!(flags.bootstrap, Some(true));
        assert_eq!(flags.join, vec!["a"]);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = parse(&["--dns-port", "fifty-three"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);

        assert!(parse(&["--dns-port", "70000"]).is_err());
        assert!(parse(&["--bootstrap=maybe"]).is_err());
    }

    #[test]
    fn join_flags_keep_order() {
        let (flags, _) = parse(&["--join", "b", "--join", "a", "--join", "b"]).unwrap();
        assert_eq!(flags.into_fragment().join_addrs_lan, vec!["b", "a", "b"]);
    }

    #[test]
    fn node_meta_entries() {
        let (flags, _) = parse(&[
            "--node-meta",
            "rack:r12",
            "--node-meta",
            "canary",
            "--node-meta",
            "url:http://x",
        ])
        .unwrap();

        let meta = flags.into_fragment().node_meta;
        assert_eq!(meta.get("rack").map(String::as_str), Some("r12"));
        assert_eq!(meta.get("canary").map(String::as_str), Some(""));
        assert_eq!(meta.get("url").map(String::as_str), Some("http://x"));
    }

    #[test]
    fn config_sources_follow_command_line_order() {
        let (flags, matches) = parse(&[
            "--config-file",
            "a.toml",
            "--config-dir",
            "conf.d",
            "--datacenter",
            "x",
            "--config-file",
            "b.json",
        ])
        .unwrap();

        assert_eq!(
            flags.config_sources(&matches),
            vec![
                ConfigSource::File(Path::new("a.toml").to_path_buf()),
                ConfigSource::Dir(Path::new("conf.d").to_path_buf()),
                ConfigSource::File(Path::new("b.json").to_path_buf()),
            ]
        );
    }
}
