// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Enriched records: a run result merged with its metadata.

use crate::error::{IngestError, Result};
use crate::metadata::{fields, Metadata};
use microbench_results::{jsonify_results, FormatError, RunResult};
use serde_json::{Map, Value};

/// Flat, ordered document ready for indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    fields: Map<String, Value>,
}

impl EnrichedRecord {
    /// Value of a field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// `project_name` if present and a string.
    pub fn project_name(&self) -> Option<&str> {
        self.fields.get(fields::PROJECT_NAME).and_then(Value::as_str)
    }

    /// Field names in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The underlying JSON object.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for EnrichedRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

/// Merge `result` with `metadata`.
///
/// The result goes through the canonical JSON array format and is read back
/// as an object; metadata fields then replace any field of the same name.
pub fn merge(result: &RunResult, metadata: &Metadata) -> Result<EnrichedRecord> {
    let json = jsonify_results(std::slice::from_ref(result))?;
    let mut documents: Vec<Value> = serde_json::from_str(&json).map_err(FormatError::Decode)?;

    if documents.len() != 1 {
        return Err(IngestError::UnexpectedFormat(format!(
            "expected one result object, found {}",
            documents.len()
        )));
    }

    let Value::Object(mut fields) = documents.remove(0) else {
        return Err(IngestError::UnexpectedFormat(
            "result is not a JSON object".to_string(),
        ));
    };

    for (key, value) in metadata.to_fields() {
        fields.insert(key.to_string(), value);
    }

    Ok(EnrichedRecord { fields })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BuildProperties, BuildProperty};
    use chrono::Utc;
    use microbench_results::Metric;
    use serde_json::json;

    fn metadata_for(result: &RunResult, properties: &BuildProperties) -> Metadata {
        Metadata::extract(result, properties, Utc::now()).unwrap()
    }

    #[test]
    fn test_merge_contains_result_and_metadata() {
        let result = RunResult::new(
            "org.example.jdbc.FindAllBenchmark.findAll",
            "thrpt",
            Metric::new(2048.0, 16.0, "ops/s"),
        )
        .with_param("rows", "100");
        let properties = BuildProperties::empty()
            .with(BuildProperty::ProjectName, "spring-data-jdbc")
            .with(BuildProperty::ProjectVersion, "3.2.0-SNAPSHOT");

        let record = merge(&result, &metadata_for(&result, &properties)).unwrap();

        assert_eq!(record.get("benchmark"), Some(&json!("org.example.jdbc.FindAllBenchmark.findAll")));
        assert_eq!(record.get("mode"), Some(&json!("thrpt")));
        assert_eq!(record.get("params"), Some(&json!({"rows": "100"})));
        assert_eq!(record.get("primaryMetric").unwrap()["score"], json!(2048.0));
        assert_eq!(record.project_name(), Some("spring-data-jdbc"));
        assert_eq!(record.get("snapshot"), Some(&json!(true)));
        assert_eq!(record.get("benchmark_group"), Some(&json!("FindAllBenchmark")));
        assert_eq!(record.get("benchmark_name"), Some(&json!("findAll")));
        assert_eq!(record.get("git_commit"), Some(&json!("unknown")));
        assert!(record.get("date").unwrap().is_string());
    }

    #[test]
    fn test_metadata_wins_on_collision() {
        let result = RunResult::new("a.B.c", "avgt", Metric::new(1.0, 0.1, "ns/op"))
            .with_extra("project_name", json!("raw-value"))
            .with_extra("custom", json!(42));
        let properties = BuildProperties::empty().with(BuildProperty::ProjectName, "real-project");

        let record = merge(&result, &metadata_for(&result, &properties)).unwrap();

        assert_eq!(record.project_name(), Some("real-project"));
        assert_eq!(record.get("custom"), Some(&json!(42)));
    }

    #[test]
    fn test_key_set_is_union_of_result_and_metadata() {
        let result = RunResult::new("a.B.c", "avgt", Metric::new(1.0, 0.1, "ns/op"));
        let raw = serde_json::to_value(&result).unwrap();
        let raw_keys = raw.as_object().unwrap().len();

        let record = merge(&result, &metadata_for(&result, &BuildProperties::empty())).unwrap();

        assert_eq!(record.len(), raw_keys + 8);
        let keys: Vec<&str> = record.keys().collect();
        assert_eq!(keys.first(), Some(&"benchmark"));
        assert_eq!(keys.last(), Some(&"operating_system"));
    }

    #[test]
    fn test_sample_mode_result_is_carried_over_unchanged() {
        let raw = json!({
            "jmhVersion": "1.37",
            "benchmark": "org.example.mongo.ConverterBenchmark.read",
            "mode": "sample",
            "threads": 1,
            "forks": 1,
            "jvm": "/usr/lib/jvm/bin/java",
            "jvmArgs": [],
            "jdkVersion": "17.0.9",
            "warmupIterations": 2,
            "warmupTime": "1 s",
            "warmupBatchSize": 1,
            "measurementIterations": 3,
            "measurementTime": "1 s",
            "measurementBatchSize": 1,
            "primaryMetric": {
                "score": 0.25,
                "scoreError": 0.5,
                "scoreConfidence": [0.1, 0.4],
                "scorePercentiles": {"0.0": 0.125, "50.0": 0.25, "100.0": 1.5},
                "scoreUnit": "us/op",
                "rawDataHistogram": [[[[0.125, 12], [0.25, 40]]]]
            },
            "secondaryMetrics": {
                "z.gc.count": {"score": 2.0, "scoreError": "NaN", "scoreConfidence": ["NaN", "NaN"],
                               "scorePercentiles": {}, "scoreUnit": "counts", "rawData": [[2.0]]},
                "a.gc.time": {"score": 3.0, "scoreError": "NaN", "scoreConfidence": ["NaN", "NaN"],
                              "scorePercentiles": {}, "scoreUnit": "ms", "rawData": [[3.0]]}
            }
        });
        let results = microbench_results::parse_results(&json!([raw.clone()]).to_string()).unwrap();
        let properties = BuildProperties::empty().with(BuildProperty::ProjectName, "spring-data-mongodb");

        let record = merge(&results[0], &metadata_for(&results[0], &properties)).unwrap();

        for (key, value) in raw.as_object().unwrap() {
            assert_eq!(record.get(key), Some(value), "field `{}` changed", key);
        }
        let labels: Vec<&String> = record.get("secondaryMetrics").unwrap().as_object().unwrap().keys().collect();
        assert_eq!(labels, ["z.gc.count", "a.gc.time"]);
    }
}
