// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Index write requests.

use crate::error::{IngestError, Result};
use crate::record::EnrichedRecord;
use reqwest::Url;
use serde_json::{Map, Value};

/// Prefix of every target index; the project name follows.
pub const INDEX_PREFIX: &str = "jmh_";

/// A single document write addressed to a target index.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    index: String,
    document: Map<String, Value>,
}

impl IndexRequest {
    /// Address `record` to `jmh_<project_name>`.
    pub fn build(record: EnrichedRecord) -> Result<Self> {
        let index = index_target(&record)?;
        Ok(Self {
            index,
            document: record.into_fields(),
        })
    }

    /// Target index name.
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Document body.
    pub fn document(&self) -> &Map<String, Value> {
        &self.document
    }

    /// Document endpoint `{base}/{index}/_doc`.
    ///
    /// The index name is one path segment, so `/`, `?` and `#` in a project
    /// name are percent-encoded rather than changing the target.
    pub fn url(&self, base: &Url) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| IngestError::Connect(format!("{} cannot be used as a base URL", base)))?
            .pop_if_empty()
            .push(&self.index)
            .push("_doc");
        Ok(url)
    }
}

/// Target index for `record`.
///
/// A missing, non-string or empty `project_name` is an error rather than
/// an index named after a placeholder.
pub fn index_target(record: &EnrichedRecord) -> Result<String> {
    match record.project_name() {
        Some(name) if !name.is_empty() => Ok(format!("{}{}", INDEX_PREFIX, name)),
        _ => Err(IngestError::MissingProjectName),
    }
}
