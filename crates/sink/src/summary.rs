// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-record outcomes of a write.

use crate::error::IngestError;

/// Outcome of writing one run result.
#[derive(Debug)]
pub struct RecordOutcome {
    /// Benchmark identifier of the result
    pub benchmark: String,
    /// Target index, once it was known
    pub index: Option<String>,
    /// Failure, if any
    pub error: Option<IngestError>,
}

impl RecordOutcome {
    /// A record that was written.
    pub fn written(benchmark: impl Into<String>, index: Option<String>) -> Self {
        Self {
            benchmark: benchmark.into(),
            index,
            error: None,
        }
    }

    /// A record that failed.
    pub fn failed(benchmark: impl Into<String>, index: Option<String>, error: IngestError) -> Self {
        Self {
            benchmark: benchmark.into(),
            index,
            error: Some(error),
        }
    }

    /// Whether the record was written.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of one `write` call, in input order.
#[derive(Debug, Default)]
pub struct WriteSummary {
    /// One outcome per input result
    pub outcomes: Vec<RecordOutcome>,
    /// Failure to release the connection, if any
    pub close_error: Option<IngestError>,
}

impl WriteSummary {
    /// Append an outcome.
    pub fn push(&mut self, outcome: RecordOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of records written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Number of records that failed.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    /// Failed records.
    pub fn failures(&self) -> impl Iterator<Item = &RecordOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Whether every record was written and the connection closed cleanly.
    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.close_error.is_none()
    }
}
