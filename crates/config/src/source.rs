//! Configuration sources on disk.
//!
//! A source is either a single file or a directory. Directories contribute
//! every `.toml` and `.json` file they directly contain, in file-name order,
//! so `10-base.toml` is overridden by `20-site.json`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::ConfigError;
use crate::fragment::{Format, Fragment};

/// Where a configuration fragment comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Dir(PathBuf),
}

/// Load the fragments of one source, in precedence order.
pub fn load(source: &ConfigSource) -> Result<Vec<Fragment>, ConfigError> {
    match source {
        ConfigSource::File(path) => load_file(path).map(|fragment| vec![fragment]),
        ConfigSource::Dir(path) => load_dir(path),
    }
}

/// Load every source in order and flatten the fragments.
pub fn load_all(sources: &[ConfigSource]) -> Result<Vec<Fragment>, ConfigError> {
    let mut fragments = Vec::new();
    for source in sources {
        fragments.extend(load(source)?);
    }
    Ok(fragments)
}

/// Read and decode a single file, picking the format from its extension.
pub fn load_file(path: &Path) -> Result<Fragment, ConfigError> {
    let format = Format::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let fragment = Fragment::parse(format, &content, &path.display().to_string())?;
    info!("Loaded config file {}", path.display());
    Ok(fragment)
}

fn load_dir(dir: &Path) -> Result<Vec<Fragment>, ConfigError> {
    let read_err = |e: std::io::Error| ConfigError::Read {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if Format::from_path(&path).is_none() {
            debug!("Skipping {} (not a config file)", path.display());
            continue;
        }
        paths.push(path);
    }
    paths.sort();

    paths.iter().map(|path| load_file(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_single_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        fs::write(&path, "datacenter = \"dc9\"").unwrap();

        let fragments = load(&ConfigSource::File(path)).unwrap();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].datacenter.as_deref(), Some("dc9"));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.hcl");
        fs::write(&path, "datacenter = \"dc9\"").unwrap();

        assert!(matches!(
            load_file(&path),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let result = load_file(Path::new("/nonexistent/outpost/agent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn directory_files_load_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("20-site.json"), r#"{"start_join": ["b"]}"#).unwrap();
        fs::write(dir.path().join("10-base.toml"), "start_join = [\"a\"]").unwrap();
        fs::write(dir.path().join("README.md"), "not config").unwrap();
        fs::create_dir(dir.path().join("nested.toml")).unwrap();

        let fragments = load(&ConfigSource::Dir(dir.path().to_path_buf())).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].join_addrs_lan, vec!["a"]);
        assert_eq!(fragments[1].join_addrs_lan, vec!["b"]);
    }

    #[test]
    fn parse_error_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "datacenter = ").unwrap();

        match load_file(&path).unwrap_err() {
            ConfigError::Parse { origin, .. } => assert!(origin.ends_with("broken.toml")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn load_all_keeps_source_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        fs::write(&first, "datacenter = \"one\"").unwrap();
        fs::write(&second, "datacenter = \"two\"").unwrap();

        let fragments = load_all(&[ConfigSource::File(second), ConfigSource::File(first)]).unwrap();
        let names: Vec<_> = fragments
            .iter()
            .map(|f| f.datacenter.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["two", "one"]);
    }
}
