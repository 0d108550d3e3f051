// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Results writers.
//!
//! [`ElasticResultsWriter`] enriches each run result with build metadata and
//! indexes it into the document store, one request per result. Writes are
//! best-effort: a failing record is logged and recorded in the
//! [`WriteSummary`], and the remaining records are still attempted.

use crate::config::{BuildProperties, DEFAULT_TIMEOUT_SECS};
use crate::connection::{ConnectionGuard, HttpConnector, SinkConnector};
use crate::endpoint::{self, SCHEME_ALIAS};
use crate::error::{IngestError, Result};
use crate::index::IndexRequest;
use crate::metadata::Metadata;
use crate::record;
use crate::summary::{RecordOutcome, WriteSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use microbench_results::{io, RunResult};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Destination for a finished benchmark run.
#[async_trait]
pub trait ResultsWriter: Send + Sync {
    /// Human-readable destination, for logs.
    fn target(&self) -> String;

    /// Write all results. Never fails as a whole; see the returned summary.
    async fn write(&self, results: &[RunResult]) -> WriteSummary;
}

/// Writer indexing results into a document store.
pub struct ElasticResultsWriter {
    uri: String,
    properties: BuildProperties,
    connector: Arc<dyn SinkConnector>,
}

impl ElasticResultsWriter {
    /// Create a writer for `uri`, with properties from the process environment.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            properties: BuildProperties::from_env(),
            connector: Arc::new(HttpConnector::default()),
        }
    }

    /// Use an explicit property snapshot.
    pub fn with_properties(mut self, properties: BuildProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Use a custom connector.
    pub fn with_connector(mut self, connector: impl SinkConnector + 'static) -> Self {
        self.connector = Arc::new(connector);
        self
    }

    /// Use the HTTP connector with a per-request timeout.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_connector(HttpConnector::new(timeout))
    }

    /// Build the index request for `result` as of `now`.
    pub fn index_request(&self, result: &RunResult, now: DateTime<Utc>) -> Result<IndexRequest> {
        let metadata = Metadata::extract(result, &self.properties, now)?;
        let record = record::merge(result, &metadata)?;
        IndexRequest::build(record)
    }
}

#[async_trait]
impl ResultsWriter for ElasticResultsWriter {
    fn target(&self) -> String {
        endpoint::resolve(&self.uri).base_url()
    }

    async fn write(&self, results: &[RunResult]) -> WriteSummary {
        let endpoint = endpoint::resolve(&self.uri);
        let mut summary = WriteSummary::default();

        info!(%endpoint, results = results.len(), "Indexing benchmark results");

        let mut guard = match ConnectionGuard::acquire(self.connector.as_ref(), &endpoint) {
            Ok(guard) => guard,
            Err(e) => {
                warn!(%endpoint, error = %e, "Could not open sink connection");
                for result in results {
                    summary.push(RecordOutcome::failed(
                        &result.benchmark,
                        None,
                        IngestError::Connect(e.to_string()),
                    ));
                }
                return summary;
            }
        };

        for result in results {
            let outcome = match self.index_request(result, Utc::now()) {
                Ok(request) => {
                    let index = Some(request.index().to_string());
                    match guard.connection().index(&request).await {
                        Ok(()) => RecordOutcome::written(&result.benchmark, index),
                        Err(e) => RecordOutcome::failed(&result.benchmark, index, e),
                    }
                }
                Err(e) => RecordOutcome::failed(&result.benchmark, None, e),
            };

            match &outcome.error {
                None => debug!(benchmark = %outcome.benchmark, index = ?outcome.index, "Indexed result"),
                Some(e) => warn!(benchmark = %outcome.benchmark, error = %e, "Failed to index result"),
            }
            summary.push(outcome);
        }

        if let Err(e) = guard.release() {
            error!(%endpoint, error = %e, "Failed to close sink connection");
            summary.close_error = Some(e);
        }

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "Finished indexing benchmark results"
        );

        summary
    }
}

/// Writer storing the run as `results.json` plus `summary.md` in a directory.
#[derive(Debug, Clone)]
pub struct FileResultsWriter {
    dir: PathBuf,
}

impl FileResultsWriter {
    /// Create a writer for `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ResultsWriter for FileResultsWriter {
    fn target(&self) -> String {
        self.dir.display().to_string()
    }

    async fn write(&self, results: &[RunResult]) -> WriteSummary {
        let mut summary = WriteSummary::default();

        match io::write_all_outputs(results, &self.dir) {
            Ok(()) => {
                info!(dir = %self.dir.display(), results = results.len(), "Wrote benchmark results");
                for result in results {
                    summary.push(RecordOutcome::written(&result.benchmark, None));
                }
            }
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Failed to write benchmark results");
                for result in results {
                    let error = std::io::Error::new(e.kind(), e.to_string());
                    summary.push(RecordOutcome::failed(&result.benchmark, None, error.into()));
                }
            }
        }

        summary
    }
}

/// Pick a writer for `uri`.
///
/// `elastic://`, `elastics://`, `http://` and `https://` select the
/// document store; `file://<dir>` or a plain path select the file writer.
pub fn writer_for_uri(uri: &str, properties: BuildProperties, timeout: Duration) -> Box<dyn ResultsWriter> {
    if let Some(dir) = uri.strip_prefix("file://") {
        return Box::new(FileResultsWriter::new(dir));
    }

    let store_schemes = [
        format!("{}://", SCHEME_ALIAS),
        format!("{}s://", SCHEME_ALIAS),
        "http://".to_string(),
        "https://".to_string(),
    ];
    if store_schemes.iter().any(|scheme| uri.starts_with(scheme.as_str())) {
        return Box::new(
            ElasticResultsWriter::new(uri)
                .with_properties(properties)
                .with_timeout(timeout),
        );
    }

    Box::new(FileResultsWriter::new(uri))
}

/// [`writer_for_uri`] with the default timeout.
pub fn default_writer_for_uri(uri: &str, properties: BuildProperties) -> Box<dyn ResultsWriter> {
    writer_for_uri(uri, properties, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
}
