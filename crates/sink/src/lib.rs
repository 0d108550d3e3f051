// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark results sink.
//!
//! Takes the results of a finished benchmark run, enriches every result with
//! build and environment metadata and indexes it into a document store, so
//! performance can be tracked across commits and releases.
//!
//! # Pipeline
//!
//! ```text
//! RunResult ──▶ Metadata ──▶ EnrichedRecord ──▶ IndexRequest ──▶ jmh_<project>
//! ```
//!
//! - [`endpoint`] - Connection string resolution with a fixed fallback
//! - [`config`] - Build property snapshot and sink settings
//! - [`metadata`] - Project, commit and benchmark identity fields
//! - [`record`] - Merging a result with its metadata
//! - [`index`] - Target index naming and write requests
//! - [`connection`] - Store connections and their scoped release
//! - [`writer`] - Results writers and the per-run summary
//!
//! # Example
//!
//! ```no_run
//! use microbench_sink::{BuildProperties, ElasticResultsWriter, ResultsWriter};
//!
//! # async fn publish(results: Vec<microbench_results::RunResult>) {
//! let writer = ElasticResultsWriter::new("elastic://localhost:9200")
//!     .with_properties(BuildProperties::from_env());
//!
//! let summary = writer.write(&results).await;
//! for failure in summary.failures() {
//!     eprintln!("{}: {:?}", failure.benchmark, failure.error);
//! }
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod connection;
pub mod endpoint;
pub mod error;
pub mod index;
pub mod metadata;
pub mod record;
pub mod summary;
pub mod writer;

pub use crate::config::{BuildProperties, BuildProperty, SinkSettings};
pub use connection::{ConnectionGuard, HttpConnector, SinkConnection, SinkConnector};
pub use endpoint::{resolve, Endpoint};
pub use error::{IngestError, Result};
pub use index::IndexRequest;
pub use metadata::Metadata;
pub use record::EnrichedRecord;
pub use summary::{RecordOutcome, WriteSummary};
pub use writer::{
    default_writer_for_uri, writer_for_uri, ElasticResultsWriter, FileResultsWriter, ResultsWriter,
};
