//! Benchmark run result types.
//!
//! This module provides the [`RunResult`] struct, a typed view of one object
//! in the benchmark harness's JSON result array.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result of one completed benchmark measurement.
///
/// Field names follow the harness's JSON result format. Top-level fields this
/// struct does not know about are kept in [`RunResult::extra`] and written
/// back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
    /// Version of the harness that produced the result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jmh_version: Option<String>,
    /// Fully qualified benchmark identifier, `<package>.<group>.<name>`.
    pub benchmark: String,
    /// Benchmark mode (`thrpt`, `avgt`, `sample`, `ss`).
    pub mode: String,
    /// Worker threads per fork.
    #[serde(default = "one")]
    pub threads: u32,
    /// Number of forks.
    #[serde(default = "one")]
    pub forks: u32,
    /// Path of the VM binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm: Option<String>,
    /// Arguments passed to the VM; an empty list is kept as written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jvm_args: Option<Vec<String>>,
    /// Runtime version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jdk_version: Option<String>,
    /// VM name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_name: Option<String>,
    /// VM version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vm_version: Option<String>,
    /// Warmup iterations per fork.
    #[serde(default)]
    pub warmup_iterations: u32,
    /// Duration of one warmup iteration, e.g. `10 s`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warmup_time: Option<String>,
    /// Operations per warmup invocation.
    #[serde(default = "one")]
    pub warmup_batch_size: u32,
    /// Measurement iterations per fork.
    #[serde(default)]
    pub measurement_iterations: u32,
    /// Duration of one measurement iteration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement_time: Option<String>,
    /// Operations per measurement invocation.
    #[serde(default = "one")]
    pub measurement_batch_size: u32,
    /// Benchmark parameters, in declaration order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
    /// Primary score.
    pub primary_metric: Metric,
    /// Secondary scores keyed by label (profilers, grouped benchmarks), in
    /// the order the harness wrote them.
    #[serde(default)]
    pub secondary_metrics: Map<String, Value>,
    /// Top-level fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn one() -> u32 {
    1
}

impl RunResult {
    /// Create a result for a single-threaded, single-fork run.
    pub fn new(benchmark: impl Into<String>, mode: impl Into<String>, primary_metric: Metric) -> Self {
        Self {
            jmh_version: None,
            benchmark: benchmark.into(),
            mode: mode.into(),
            threads: 1,
            forks: 1,
            jvm: None,
            jvm_args: None,
            jdk_version: None,
            vm_name: None,
            vm_version: None,
            warmup_iterations: 0,
            warmup_time: None,
            warmup_batch_size: 1,
            measurement_iterations: 0,
            measurement_time: None,
            measurement_batch_size: 1,
            params: None,
            primary_metric,
            secondary_metrics: Map::new(),
            extra: Map::new(),
        }
    }

    /// Add a benchmark parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(Map::new)
            .insert(name.into(), Value::String(value.into()));
        self
    }

    /// Add an extra top-level field.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// A score with its error margin and distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Aggregated score.
    #[serde(with = "lenient_f64")]
    pub score: f64,
    /// Half-width of the confidence interval; `NaN` when undefined.
    #[serde(default = "nan", with = "lenient_f64")]
    pub score_error: f64,
    /// Lower and upper bound of the confidence interval.
    #[serde(default = "nan_pair", with = "lenient_f64::pair")]
    pub score_confidence: [f64; 2],
    /// Percentiles keyed by their rank, e.g. `"99.9"`.
    #[serde(default)]
    pub score_percentiles: Map<String, Value>,
    /// Unit of the score, e.g. `ops/s`.
    pub score_unit: String,
    /// Raw per-iteration scores, one array per fork. Sample mode writes
    /// `rawDataHistogram` instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<Vec<Vec<f64>>>,
    /// Fields not modelled above, e.g. `rawDataHistogram` in sample mode.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn nan() -> f64 {
    f64::NAN
}

fn nan_pair() -> [f64; 2] {
    [f64::NAN, f64::NAN]
}

impl Metric {
    /// Create a metric with a symmetric confidence interval.
    pub fn new(score: f64, score_error: f64, score_unit: impl Into<String>) -> Self {
        Self {
            score,
            score_error,
            score_confidence: [score - score_error, score + score_error],
            score_percentiles: Map::new(),
            score_unit: score_unit.into(),
            raw_data: None,
            extra: Map::new(),
        }
    }
}

/// Numbers that may be written as `"NaN"` or `"Infinity"` strings.
///
/// The harness emits non-finite scores as strings since JSON has no literal
/// for them.
mod lenient_f64 {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    impl Repr {
        fn into_f64(self) -> Result<f64, String> {
            match self {
                Repr::Number(value) => Ok(value),
                Repr::Text(text) => match text.as_str() {
                    "NaN" => Ok(f64::NAN),
                    "Infinity" => Ok(f64::INFINITY),
                    "-Infinity" => Ok(f64::NEG_INFINITY),
                    other => other
                        .parse::<f64>()
                        .map_err(|_| format!("invalid number `{}`", other)),
                },
            }
        }
    }

    struct Lenient(f64);

    impl Serialize for Lenient {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serialize(&self.0, serializer)
        }
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_infinite() {
            serializer.serialize_str(if *value > 0.0 { "Infinity" } else { "-Infinity" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Repr::deserialize(deserializer)?
            .into_f64()
            .map_err(D::Error::custom)
    }

    pub mod pair {
        use super::{Lenient, Repr};
        use serde::de::Error as _;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(value: &[f64; 2], serializer: S) -> Result<S::Ok, S::Error> {
            serializer.collect_seq(value.iter().map(|v| Lenient(*v)))
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
            let [low, high] = <[Repr; 2]>::deserialize(deserializer)?;
            Ok([
                low.into_f64().map_err(D::Error::custom)?,
                high.into_f64().map_err(D::Error::custom)?,
            ])
        }
    }
}
