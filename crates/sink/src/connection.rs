// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Connections to the document store.
//!
//! A [`SinkConnector`] opens a [`SinkConnection`] for one ingestion run. The
//! connection is held by a [`ConnectionGuard`], which releases it exactly
//! once: explicitly through [`ConnectionGuard::release`], or on drop when a
//! run is abandoned mid-way.
//!
//! ```text
//! Closed ── open ──▶ Open ──index──▶ Open ── release ──▶ Closed
//! ```

use crate::config::DEFAULT_TIMEOUT_SECS;
use crate::endpoint::Endpoint;
use crate::error::{IngestError, Result};
use crate::index::IndexRequest;
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, error};

/// An open connection to the store.
#[async_trait]
pub trait SinkConnection: Send {
    /// Write one document.
    async fn index(&mut self, request: &IndexRequest) -> Result<()>;

    /// Release the connection. Further writes fail with
    /// [`IngestError::ConnectionClosed`].
    fn close(&mut self) -> Result<()>;
}

/// Opens connections to an endpoint.
pub trait SinkConnector: Send + Sync {
    /// Open a connection.
    fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn SinkConnection>>;
}

/// Connector for the store's HTTP document API.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    timeout: Duration,
}

impl HttpConnector {
    /// Create a connector with the given per-request timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl SinkConnector for HttpConnector {
    fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn SinkConnection>> {
        let base_url = Url::parse(&endpoint.base_url()).map_err(|e| IngestError::Connect(e.to_string()))?;
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| IngestError::Connect(e.to_string()))?;

        debug!(%endpoint, "Opened sink connection");

        Ok(Box::new(HttpConnection {
            client: Some(client),
            base_url,
        }))
    }
}

/// HTTP connection posting documents to `/{index}/_doc`.
#[derive(Debug)]
pub struct HttpConnection {
    client: Option<Client>,
    base_url: Url,
}

#[async_trait]
impl SinkConnection for HttpConnection {
    async fn index(&mut self, request: &IndexRequest) -> Result<()> {
        let client = self.client.as_ref().ok_or(IngestError::ConnectionClosed)?;
        let url = request.url(&self.base_url)?;

        let response = client.post(url).json(request.document()).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(IngestError::Rejected {
            index: request.index().to_string(),
            status: status.as_u16(),
            body,
        })
    }

    fn close(&mut self) -> Result<()> {
        match self.client.take() {
            Some(_) => {
                debug!(base_url = %self.base_url, "Closed sink connection");
                Ok(())
            }
            None => Err(IngestError::ConnectionClosed),
        }
    }
}

/// Scoped ownership of an open connection.
pub struct ConnectionGuard {
    connection: Box<dyn SinkConnection>,
    released: bool,
}

impl ConnectionGuard {
    /// Open a connection through `connector`.
    pub fn acquire(connector: &dyn SinkConnector, endpoint: &Endpoint) -> Result<Self> {
        Ok(Self {
            connection: connector.open(endpoint)?,
            released: false,
        })
    }

    /// The guarded connection.
    pub fn connection(&mut self) -> &mut dyn SinkConnection {
        self.connection.as_mut()
    }

    /// Close the connection and report the outcome.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.connection.close()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.connection.close() {
            error!(error = %e, "Failed to close abandoned sink connection");
        }
    }
}

#[cfg(test)]
use mockall::mock;

#[cfg(test)]
mock! {
    pub Connection {}

    #[async_trait]
    impl SinkConnection for Connection {
        async fn index(&mut self, request: &IndexRequest) -> Result<()>;
        fn close(&mut self) -> Result<()>;
    }
}

#[cfg(test)]
mock! {
    pub Connector {}

    impl SinkConnector for Connector {
        fn open(&self, endpoint: &Endpoint) -> Result<Box<dyn SinkConnection>>;
    }
}
