//! Configuration files for the CLI.
//!
//! Each `[locations."<path>"]` table carries the retention scheme and the
//! options for one location. Keys whose last path component contains glob
//! characters expand to every matching local directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rotate_domain::{Frequency, RotationScheme};
use rotate_engine::FilenameFilter;
use serde::Deserialize;

use crate::error::{CliError, Result};
use crate::expression::parse_retention;

/// System wide configuration file
pub const SYSTEM_CONFIG_PATH: &str = "/etc/rotate-backups.toml";

/// Per-user configuration file name, relative to the home directory
pub const USER_CONFIG_NAME: &str = ".rotate-backups.toml";

/// Merged configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Configured locations keyed by path (`/path` or `host:/path`)
    #[serde(default)]
    pub locations: BTreeMap<String, LocationConfig>,
}

/// Settings for one configured location.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LocationConfig {
    pub minutely: Option<RetentionValue>,
    pub hourly: Option<RetentionValue>,
    pub daily: Option<RetentionValue>,
    pub weekly: Option<RetentionValue>,
    pub monthly: Option<RetentionValue>,
    pub yearly: Option<RetentionValue>,

    /// Shell patterns a backup name must match
    pub include: Option<Vec<String>>,

    /// Shell patterns excluding backups
    pub exclude: Option<Vec<String>>,

    /// Strict period window (default: true)
    pub strict: Option<bool>,

    pub prefer_recent: Option<bool>,
    pub recursive: Option<bool>,

    /// I/O scheduling class name for removals
    pub ionice: Option<String>,

    pub use_sudo: Option<bool>,
    pub ssh_user: Option<String>,

    /// Removal command as an argument vector
    pub removal_command: Option<Vec<String>>,

    pub timestamp_pattern: Option<String>,
}

/// A retention count as written in TOML: `7`, `"7 * 2"` or `"always"`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RetentionValue {
    Count(u64),
    Expression(String),
}

impl LocationConfig {
    /// Retention scheme of this location
    pub fn rotation_scheme(&self) -> Result<RotationScheme> {
        let values = [
            (Frequency::Minutely, &self.minutely),
            (Frequency::Hourly, &self.hourly),
            (Frequency::Daily, &self.daily),
            (Frequency::Weekly, &self.weekly),
            (Frequency::Monthly, &self.monthly),
            (Frequency::Yearly, &self.yearly),
        ];

        let mut scheme = RotationScheme::new();
        for (frequency, value) in values {
            match value {
                Some(RetentionValue::Count(count)) => {
                    scheme.set(frequency, rotate_domain::RetentionPeriod::Count(*count))
                }
                Some(RetentionValue::Expression(expression)) => {
                    scheme.set(frequency, parse_retention(expression)?)
                }
                None => {}
            }
        }
        Ok(scheme)
    }
}

impl Config {
    /// Default configuration files, in loading order.
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(USER_CONFIG_NAME));
        }
        paths
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one every existing default file
    /// is loaded and later files replace earlier entries for the same key.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let mut config = Config::default();
                for path in Self::default_paths() {
                    if path.is_file() {
                        config.merge(Self::from_file(&path)?);
                    }
                }
                Ok(config)
            }
        }
    }

    /// Load one configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Self::from_toml(&contents)
    }

    /// Parse configuration text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Overlay `other` on this configuration.
    pub fn merge(&mut self, other: Config) {
        self.locations.extend(other.locations);
    }

    /// Configured locations with glob keys expanded, in key order.
    pub fn expanded_locations(&self) -> Result<Vec<(String, &LocationConfig)>> {
        let mut expanded = Vec::new();
        for (key, settings) in &self.locations {
            for location in expand_location(key)? {
                expanded.push((location, settings));
            }
        }
        Ok(expanded)
    }

    /// Settings for a location given on the command line, if configured.
    pub fn find(&self, location: &str) -> Result<Option<&LocationConfig>> {
        let wanted = normalize(location);
        Ok(self
            .expanded_locations()?
            .into_iter()
            .find(|(candidate, _)| normalize(candidate) == wanted)
            .map(|(_, settings)| settings))
    }
}

fn normalize(location: &str) -> &str {
    let trimmed = location.trim_end_matches('/');
    if trimmed.is_empty() {
        location
    } else {
        trimmed
    }
}

fn has_glob(text: &str) -> bool {
    text.contains(['*', '?', '['])
}

/// Expand glob characters in the last component of a local location.
fn expand_location(key: &str) -> Result<Vec<String>> {
    let path = Path::new(key);
    let (Some(parent), Some(pattern)) = (path.parent(), path.file_name()) else {
        return Ok(vec![key.to_string()]);
    };
    let pattern = pattern.to_string_lossy();
    if !has_glob(&pattern) || looks_remote(key) {
        return Ok(vec![key.to_string()]);
    }
    if has_glob(&parent.to_string_lossy()) {
        return Err(CliError::Config(format!(
            "Only the last component of {:?} may contain glob characters",
            key
        )));
    }

    let filter = FilenameFilter::new(&[pattern.into_owned()], &[])?;
    let mut matches = Vec::new();
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Cannot expand {}: {}", key, e);
            return Ok(matches);
        }
    };
    for entry in entries {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.path().is_dir() && filter.accepts(&name) {
            matches.push(entry.path().to_string_lossy().into_owned());
        }
    }
    matches.sort();

    if matches.is_empty() {
        tracing::warn!("No directories match {}", key);
    } else {
        tracing::debug!("Expanded {} to {} location(s)", key, matches.len());
    }
    Ok(matches)
}

fn looks_remote(key: &str) -> bool {
    key.split_once(':')
        .is_some_and(|(host, directory)| !host.is_empty() && !host.contains('/') && !directory.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotate_domain::RetentionPeriod;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
[locations."/srv/backups/laptop"]
hourly = 24
daily = "7"
weekly = "2 * 2"
monthly = 12
yearly = "always"
include = ["*.tar.gz"]
strict = false
ionice = "idle"

[locations."db4:/var/backups/galera"]
daily = 7
ssh_user = "backup"
use_sudo = true
removal_command = ["rm", "-Rf"]
"#;

    #[test]
    fn test_parse_locations() {
        let config = Config::from_toml(SAMPLE).unwrap();
        assert_eq!(config.locations.len(), 2);

        let laptop = &config.locations["/srv/backups/laptop"];
        let scheme = laptop.rotation_scheme().unwrap();
        assert_eq!(scheme.get(Frequency::Hourly), RetentionPeriod::Count(24));
        assert_eq!(scheme.get(Frequency::Daily), RetentionPeriod::Count(7));
        assert_eq!(scheme.get(Frequency::Weekly), RetentionPeriod::Count(4));
        assert_eq!(scheme.get(Frequency::Yearly), RetentionPeriod::Always);
        assert_eq!(laptop.strict, Some(false));
        assert_eq!(laptop.ionice.as_deref(), Some("idle"));

        let galera = &config.locations["db4:/var/backups/galera"];
        assert_eq!(galera.ssh_user.as_deref(), Some("backup"));
        assert_eq!(galera.use_sudo, Some(true));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml("[locations.\"/srv\"]\nfortnightly = 2\n").unwrap_err();
        assert!(matches!(err, CliError::Toml(_)));
    }

    #[test]
    fn test_invalid_expression_is_config_error() {
        let config = Config::from_toml("[locations.\"/srv\"]\ndaily = \"seven\"\n").unwrap();
        let err = config.locations["/srv"].rotation_scheme().unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_later_file_overrides_location() {
        let mut config = Config::from_toml(SAMPLE).unwrap();
        config.merge(Config::from_toml("[locations.\"/srv/backups/laptop\"]\ndaily = 3\n").unwrap());

        let laptop = &config.locations["/srv/backups/laptop"];
        assert_eq!(laptop.daily, Some(RetentionValue::Count(3)));
        assert_eq!(laptop.hourly, None);
        assert!(config.locations.contains_key("db4:/var/backups/galera"));
    }

    #[test]
    fn test_missing_explicit_file() {
        let root = TempDir::new().unwrap();
        let err = Config::load(Some(&root.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, CliError::Config(_)));
    }

    #[test]
    fn test_glob_keys_expand_to_directories() {
        let root = TempDir::new().unwrap();
        for name in ["laptop", "server", "notes"] {
            fs::create_dir(root.path().join(name)).unwrap();
        }
        fs::write(root.path().join("stray.txt"), b"").unwrap();

        let pattern = format!("{}/[ls]*", root.path().display());
        let text = format!("[locations.\"{}\"]\ndaily = 7\n", pattern);
        let config = Config::from_toml(&text).unwrap();

        let expanded: Vec<String> = config
            .expanded_locations()
            .unwrap()
            .into_iter()
            .map(|(location, _)| location)
            .collect();
        assert_eq!(
            expanded,
            vec![
                root.path().join("laptop").to_string_lossy().into_owned(),
                root.path().join("server").to_string_lossy().into_owned(),
            ]
        );

        let found = config.find(&format!("{}/server/", root.path().display())).unwrap();
        assert!(found.is_some());
        assert!(config.find("/elsewhere").unwrap().is_none());
    }

    #[test]
    fn test_remote_keys_are_not_expanded() {
        assert_eq!(expand_location("db4:/var/backups/*").unwrap(), vec!["db4:/var/backups/*"]);
        assert_eq!(expand_location("/srv/backups").unwrap(), vec!["/srv/backups"]);
    }
}
