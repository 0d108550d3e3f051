// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration for the results sink.
//!
//! Two independent pieces live here:
//!
//! - [`BuildProperties`]: a snapshot of the build and environment properties
//!   that are stamped onto every indexed record. Resolved once and passed to
//!   the metadata extractor, so extraction never reads process state itself.
//! - [`SinkSettings`]: where and how to connect, loaded through the `config`
//!   crate from defaults, an optional file and `MICROBENCH_*` variables.
//!
//! # Example
//!
//! ```ignore
//! use microbench_sink::config::{BuildProperties, BuildProperty, SinkSettings};
//!
//! let properties = BuildProperties::from_env();
//! let name = properties.get(BuildProperty::ProjectName);
//!
//! let settings = SinkSettings::load(None)?;
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Value of any build property that was not provided.
pub const UNKNOWN: &str = "unknown";

/// Default sink connection string.
pub const DEFAULT_URI: &str = "http://localhost:9200";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Errors that can occur while loading sink settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Source could not be read or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
}

/// Build and environment properties recorded with each result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildProperty {
    /// Name of the project under test
    ProjectName,
    /// Version of the project under test
    ProjectVersion,
    /// Commit the benchmarks were built from
    GitCommitId,
    /// Operating system the benchmarks ran on
    OsName,
}

impl BuildProperty {
    /// All known properties.
    pub const ALL: [BuildProperty; 4] = [
        BuildProperty::ProjectName,
        BuildProperty::ProjectVersion,
        BuildProperty::GitCommitId,
        BuildProperty::OsName,
    ];

    /// Dotted property name, e.g. `project.name`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ProjectName => "project.name",
            Self::ProjectVersion => "project.version",
            Self::GitCommitId => "git.commit.id",
            Self::OsName => "os.name",
        }
    }

    /// Environment variable spelling of the property, e.g. `PROJECT_NAME`.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::ProjectName => "PROJECT_NAME",
            Self::ProjectVersion => "PROJECT_VERSION",
            Self::GitCommitId => "GIT_COMMIT_ID",
            Self::OsName => "OS_NAME",
        }
    }

    /// Look up a property by either of its spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|property| property.key() == name || property.env_var() == name)
    }
}

/// Immutable snapshot of [`BuildProperty`] values.
///
/// Missing properties read as [`UNKNOWN`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildProperties {
    values: HashMap<BuildProperty, String>,
}

impl BuildProperties {
    /// Snapshot with no properties set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a snapshot from name/value pairs.
    ///
    /// Names may use the dotted or the environment spelling; unrecognised
    /// names are ignored.
    pub fn from_map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let values = entries
            .into_iter()
            .filter_map(|(name, value)| {
                BuildProperty::from_name(name.as_ref()).map(|property| (property, value.into()))
            })
            .collect();

        Self { values }
    }

    /// Snapshot the process environment.
    ///
    /// The dotted spelling wins over the environment spelling. Properties set
    /// under neither read as [`UNKNOWN`].
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Snapshot the values `lookup` returns for each property name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let values = BuildProperty::ALL
            .into_iter()
            .filter_map(|property| {
                lookup(property.key())
                    .or_else(|| lookup(property.env_var()))
                    .map(|value| (property, value))
            })
            .collect();

        Self { values }
    }

    /// Set a property.
    pub fn with(mut self, property: BuildProperty, value: impl Into<String>) -> Self {
        self.values.insert(property, value.into());
        self
    }

    /// Value of `property`, or [`UNKNOWN`].
    pub fn get(&self, property: BuildProperty) -> &str {
        self.values
            .get(&property)
            .map(String::as_str)
            .unwrap_or(UNKNOWN)
    }

    /// Whether `property` was provided.
    pub fn contains(&self, property: BuildProperty) -> bool {
        self.values.contains_key(&property)
    }

    /// All properties with their resolved values, in [`BuildProperty::ALL`] order.
    pub fn resolved(&self) -> Vec<(&'static str, &str)> {
        BuildProperty::ALL
            .into_iter()
            .map(|property| (property.key(), self.get(property)))
            .collect()
    }
}

/// Connection settings for the sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkSettings {
    /// Connection string, e.g. `elastic://host:9200`
    pub uri: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_URI.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl SinkSettings {
    /// Prefix of environment variables that override settings.
    pub const ENV_PREFIX: &'static str = "MICROBENCH";

    /// Load settings from defaults, then `path` if given, then the environment.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = ::config::Config::builder()
            .set_default("uri", DEFAULT_URI)?
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS as i64)?;

        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(::config::Environment::with_prefix(Self::ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_properties_resolve_to_unknown() {
        let properties = BuildProperties::empty();

        for property in BuildProperty::ALL {
            assert_eq!(properties.get(property), "unknown");
            assert!(!properties.contains(property));
        }
    }

    #[test]
    fn test_from_map_accepts_both_spellings() {
        let properties = BuildProperties::from_map([
            ("project.name", "spring-data-jdbc"),
            ("PROJECT_VERSION", "3.2.0-SNAPSHOT"),
            ("unrelated.key", "ignored"),
        ]);

        assert_eq!(properties.get(BuildProperty::ProjectName), "spring-data-jdbc");
        assert_eq!(properties.get(BuildProperty::ProjectVersion), "3.2.0-SNAPSHOT");
        assert_eq!(properties.get(BuildProperty::GitCommitId), "unknown");
    }

    #[test]
    fn test_with_overrides_value() {
        let properties = BuildProperties::empty()
            .with(BuildProperty::GitCommitId, "abc123")
            .with(BuildProperty::GitCommitId, "def456");

        assert_eq!(properties.get(BuildProperty::GitCommitId), "def456");
    }

    #[test]
    fn test_unset_properties_read_as_unknown() {
        let properties = BuildProperties::from_lookup(|_| None);

        for property in BuildProperty::ALL {
            assert!(!properties.contains(property));
            assert_eq!(properties.get(property), UNKNOWN);
        }
    }

    #[test]
    fn test_lookup_prefers_dotted_name() {
        let properties = BuildProperties::from_lookup(|name| match name {
            "os.name" => Some("Linux".to_string()),
            "OS_NAME" => Some("ignored".to_string()),
            "GIT_COMMIT_ID" => Some("abc123".to_string()),
            _ => None,
        });

        assert_eq!(properties.get(BuildProperty::OsName), "Linux");
        assert_eq!(properties.get(BuildProperty::GitCommitId), "abc123");
        assert_eq!(properties.get(BuildProperty::ProjectName), UNKNOWN);
    }

    #[test]
    fn test_resolved_order() {
        let keys: Vec<&str> = BuildProperties::empty()
            .resolved()
            .into_iter()
            .map(|(key, _)| key)
            .collect();

        assert_eq!(keys, ["project.name", "project.version", "git.commit.id", "os.name"]);
    }

    #[test]
    fn test_property_names() {
        assert_eq!(BuildProperty::from_name("git.commit.id"), Some(BuildProperty::GitCommitId));
        assert_eq!(BuildProperty::from_name("OS_NAME"), Some(BuildProperty::OsName));
        assert_eq!(BuildProperty::from_name("os_name"), None);
    }

    #[test]
    fn test_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sink.toml");
        std::fs::write(&path, "uri = \"elastic://perf.example.com:9243\"\ntimeout_secs = 5\n").unwrap();

        let settings = SinkSettings::load(Some(&path)).unwrap();

        assert_eq!(settings.uri, "elastic://perf.example.com:9243");
        assert_eq!(settings.timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_settings_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(SinkSettings::load(Some(&path)).is_err());
    }
}
