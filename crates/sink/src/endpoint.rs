// Copyright 2025 Data Microbenchmarks Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sink connection string resolution.
//!
//! Resolution never fails: anything that does not parse into a host and port
//! resolves to [`Endpoint::fallback`].

use reqwest::Url;
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// Scheme alias accepted in place of `http`.
pub const SCHEME_ALIAS: &str = "elastic";

/// Host used when the connection string cannot be resolved.
pub const DEFAULT_HOST: &str = "localhost";

/// Port used when the connection string cannot be resolved.
pub const DEFAULT_PORT: u16 = 9200;

/// Scheme used when the connection string cannot be resolved.
pub const DEFAULT_SCHEME: &str = "http";

/// Network location of the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Host name or address
    pub host: String,
    /// TCP port
    pub port: u16,
    /// URL scheme, `http` or `https`
    pub scheme: String,
}

impl Endpoint {
    /// Create a new endpoint.
    pub fn new(host: impl Into<String>, port: u16, scheme: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            scheme: scheme.into(),
        }
    }

    /// `http://localhost:9200`.
    pub fn fallback() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SCHEME)
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base_url())
    }
}

/// Resolve a connection string such as `elastic://host:9200`.
pub fn resolve(uri: &str) -> Endpoint {
    match try_resolve(uri) {
        Ok(endpoint) => endpoint,
        Err(reason) => {
            debug!(uri, %reason, "Unresolvable sink URI, using fallback endpoint");
            Endpoint::fallback()
        }
    }
}

fn try_resolve(uri: &str) -> std::result::Result<Endpoint, String> {
    let parsable = match uri.strip_prefix(SCHEME_ALIAS) {
        Some(rest) => Cow::Owned(format!("http{}", rest)),
        None => Cow::Borrowed(uri),
    };

    let url = Url::parse(&parsable).map_err(|e| e.to_string())?;
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or("missing host")?;
    let port = url.port_or_known_default().ok_or("missing port")?;

    Ok(Endpoint::new(host, port, url.scheme()))
}
