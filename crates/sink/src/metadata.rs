// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Build and benchmark metadata attached to indexed results.
//!
//! The fields computed here turn a bare run result into a time-series point
//! that can be grouped by project, version, commit and benchmark.

use crate::config::{BuildProperties, BuildProperty};
use crate::error::{IngestError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use microbench_results::RunResult;
use serde_json::Value;

/// Record field names written by [`Metadata::to_fields`].
pub mod fields {
    /// Ingestion timestamp.
    pub const DATE: &str = "date";
    /// Project name.
    pub const PROJECT_NAME: &str = "project_name";
    /// Project version.
    pub const PROJECT_VERSION: &str = "project_version";
    /// Whether the version is a snapshot build.
    pub const SNAPSHOT: &str = "snapshot";
    /// Commit id.
    pub const GIT_COMMIT: &str = "git_commit";
    /// Benchmark class or group.
    pub const BENCHMARK_GROUP: &str = "benchmark_group";
    /// Benchmark method.
    pub const BENCHMARK_NAME: &str = "benchmark_name";
    /// Operating system.
    pub const OPERATING_SYSTEM: &str = "operating_system";
}

/// Metadata for one run result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    /// Time of ingestion
    pub date: DateTime<Utc>,
    /// Project name
    pub project_name: String,
    /// Project version
    pub project_version: String,
    /// Commit id
    pub git_commit_id: String,
    /// Operating system name
    pub operating_system: String,
    /// Second-to-last identifier segment
    pub benchmark_group: String,
    /// Last identifier segment
    pub benchmark_name: String,
}

impl Metadata {
    /// Derive metadata for `result`.
    ///
    /// Fails with [`IngestError::InvalidBenchmarkId`] when the identifier
    /// cannot be split into a group and a name.
    pub fn extract(result: &RunResult, properties: &BuildProperties, now: DateTime<Utc>) -> Result<Self> {
        let (group, name) = split_benchmark_id(&result.benchmark)?;

        Ok(Self {
            date: now,
            project_name: properties.get(BuildProperty::ProjectName).to_string(),
            project_version: properties.get(BuildProperty::ProjectVersion).to_string(),
            git_commit_id: properties.get(BuildProperty::GitCommitId).to_string(),
            operating_system: properties.get(BuildProperty::OsName).to_string(),
            benchmark_group: group.to_string(),
            benchmark_name: name.to_string(),
        })
    }

    /// Whether the project version denotes a snapshot build.
    pub fn is_snapshot(&self) -> bool {
        self.project_version.to_lowercase().contains("snapshot")
    }

    /// Record fields in write order.
    pub fn to_fields(&self) -> Vec<(&'static str, Value)> {
        vec![
            (
                fields::DATE,
                Value::String(self.date.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ),
            (fields::PROJECT_NAME, Value::String(self.project_name.clone())),
            (fields::PROJECT_VERSION, Value::String(self.project_version.clone())),
            (fields::SNAPSHOT, Value::Bool(self.is_snapshot())),
            (fields::GIT_COMMIT, Value::String(self.git_commit_id.clone())),
            (fields::BENCHMARK_GROUP, Value::String(self.benchmark_group.clone())),
            (fields::BENCHMARK_NAME, Value::String(self.benchmark_name.clone())),
            (fields::OPERATING_SYSTEM, Value::String(self.operating_system.clone())),
        ]
    }
}

/// Split `<package>.<group>.<name>` into `(group, name)`.
///
/// With a single separator the leading segment is the group. An identifier
/// without a separator, or with an empty group or name, is rejected.
pub fn split_benchmark_id(benchmark: &str) -> Result<(&str, &str)> {
    let invalid = || IngestError::InvalidBenchmarkId(benchmark.to_string());

    let (prefix, name) = benchmark.rsplit_once('.').ok_or_else(invalid)?;
    let group = prefix.rsplit_once('.').map_or(prefix, |(_, group)| group);

    if group.is_empty() || name.is_empty() {
        return Err(invalid());
    }

    Ok((group, name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use microbench_results::Metric;

    fn result(benchmark: &str) -> RunResult {
        RunResult::new(benchmark, "thrpt", Metric::new(100.0, 1.0, "ops/s"))
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_split_fully_qualified_id() {
        assert_eq!(
            split_benchmark_id("org.foo.jdbc.FindAllBenchmark.findAll").unwrap(),
            ("FindAllBenchmark", "findAll")
        );
    }

    #[test]
    fn test_split_two_segments() {
        assert_eq!(split_benchmark_id("Group.name").unwrap(), ("Group", "name"));
    }

    #[test]
    fn test_split_rejects_malformed_ids() {
        for id in ["findAll", "", "org.Group.", ".name", "org..name"] {
            let err = split_benchmark_id(id).unwrap_err();
            assert!(matches!(err, IngestError::InvalidBenchmarkId(ref bad) if bad == id), "{}", id);
        }
    }

    #[test]
    fn test_extract_without_properties() {
        let metadata = Metadata::extract(
            &result("org.foo.jdbc.FindAllBenchmark.findAll"),
            &BuildProperties::empty(),
            now(),
        )
        .unwrap();

        assert_eq!(metadata.project_name, "unknown");
        assert_eq!(metadata.project_version, "unknown");
        assert_eq!(metadata.git_commit_id, "unknown");
        assert_eq!(metadata.operating_system, "unknown");
        assert_eq!(metadata.benchmark_group, "FindAllBenchmark");
        assert_eq!(metadata.benchmark_name, "findAll");
        assert_eq!(metadata.date, now());
    }

    #[test]
    fn test_extract_with_properties() {
        let properties = BuildProperties::empty()
            .with(BuildProperty::ProjectName, "spring-data-mongodb")
            .with(BuildProperty::ProjectVersion, "4.1.0")
            .with(BuildProperty::GitCommitId, "9f2c1e0")
            .with(BuildProperty::OsName, "Linux");

        let metadata = Metadata::extract(&result("a.Convert.read"), &properties, now()).unwrap();

        assert_eq!(metadata.project_name, "spring-data-mongodb");
        assert_eq!(metadata.project_version, "4.1.0");
        assert_eq!(metadata.git_commit_id, "9f2c1e0");
        assert_eq!(metadata.operating_system, "Linux");
    }

    #[test]
    fn test_snapshot_detection() {
        let cases = [
            ("1.0.0-SNAPSHOT", true),
            ("1.0.0", false),
            ("1.0.0-snapshot-extra", true),
            ("unknown", false),
        ];

        for (version, expected) in cases {
            let properties = BuildProperties::empty().with(BuildProperty::ProjectVersion, version);
            let metadata = Metadata::extract(&result("a.B.c"), &properties, now()).unwrap();
            assert_eq!(metadata.is_snapshot(), expected, "{}", version);
        }
    }

    #[test]
    fn test_fields_order_and_values() {
        let metadata = Metadata::extract(&result("a.B.c"), &BuildProperties::empty(), now()).unwrap();
        let fields = metadata.to_fields();

        let keys: Vec<&str> = fields.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            [
                "date",
                "project_name",
                "project_version",
                "snapshot",
                "git_commit",
                "benchmark_group",
                "benchmark_name",
                "operating_system"
            ]
        );
        assert_eq!(fields[0].1, Value::String("2024-03-01T12:30:00.000Z".to_string()));
        assert_eq!(fields[3].1, Value::Bool(false));
    }
}
