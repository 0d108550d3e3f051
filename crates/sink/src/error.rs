// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the results sink.

use microbench_results::FormatError;
use thiserror::Error;

/// Errors that can occur while ingesting a single benchmark result.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Benchmark identifier has no `<group>.<name>` suffix
    #[error("Invalid benchmark identifier: `{0}`")]
    InvalidBenchmarkId(String),

    /// Result could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] FormatError),

    /// Encoded result did not have the expected shape
    #[error("Unexpected result format: {0}")]
    UnexpectedFormat(String),

    /// Record carries no usable `project_name`
    #[error("Record has no project name")]
    MissingProjectName,

    /// Connection to the sink could not be opened
    #[error("Connection error: {0}")]
    Connect(String),

    /// Write attempted on a released connection
    #[error("Connection is closed")]
    ConnectionClosed,

    /// HTTP transport failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Store answered with a non-success status
    #[error("Index {index} rejected document with status {status}: {body}")]
    Rejected {
        /// Index the document was addressed to.
        index: String,
        /// HTTP status code of the response.
        status: u16,
        /// Response body, empty if it could not be read.
        body: String,
    },

    /// Local file output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
