#![warn(missing_docs)]
//! # scam-shield-transport
//!
//! ## Purpose
//! Issues typed JSON requests to the analysis service and normalizes every
//! failure into one [`TransportError`].
//!
//! ## Responsibilities
//! - Resolve the service base address once at startup ([`ServiceConfig`]).
//! - Serialize request bodies as UTF-8 JSON with the matching content type.
//! - Treat only 2xx as success; surface the response body (or `HTTP <status>`)
//!   as the failure message.
//! - Decode success bodies into the caller's type; a decode failure is an
//!   error, never silently swallowed.
//!
//! ## Data flow
//! Orchestrator -> [`ApiClient::post_json`] / [`ApiClient::get_json`] ->
//! [`HttpTransport::execute`] -> [`HttpResponse`] -> decoded `T`.
//!
//! ## Ownership and lifetimes
//! [`ApiClient`] owns its config and shares the transport through `Arc`, so it
//! can be cloned into independent views without re-resolving configuration.
//!
//! ## Error model
//! Non-2xx statuses, network failures, and decode failures all map to
//! [`TransportError`]. There are no retries; callers resubmit explicitly.
//!
//! ## Security and privacy notes
//! Request and response bodies are never logged; only method, path, status,
//! and byte counts are.

use std::sync::Arc;

use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Environment variable holding the service base override.
pub const API_URL_ENV: &str = "SCAM_SHIELD_API_URL";

/// Origin used by [`ReqwestTransport`] when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Content type used for every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Where service paths are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiBase {
    /// Paths are sent relative to the client's own origin.
    SameOrigin,
    /// Paths are appended to this absolute base.
    Override(Url),
}

/// Service address configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    base: ApiBase,
}

impl ServiceConfig {
    /// Same-origin configuration.
    pub fn same_origin() -> Self {
        Self {
            base: ApiBase::SameOrigin,
        }
    }

    /// Builds configuration from an optional override value.
    ///
    /// Unset or blank overrides select same-origin.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the override is not an absolute `http` or
    /// `https` URL.
    pub fn from_override(value: Option<&str>) -> Result<Self, ConfigError> {
        match value.map(str::trim).filter(|value| !value.is_empty()) {
            None => Ok(Self::same_origin()),
            Some(raw) => Ok(Self {
                base: ApiBase::Override(validate_base_url(raw)?),
            }),
        }
    }

    /// Reads [`API_URL_ENV`] from the process environment.
    ///
    /// # Errors
    /// Same as [`ServiceConfig::from_override`].
    pub fn from_env() -> Result<Self, ConfigError> {
        let value = std::env::var(API_URL_ENV).ok();
        Self::from_override(value.as_deref())
    }

    /// Resolved base.
    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    /// Returns the request target for `path`.
    ///
    /// Overrides are concatenated with the path so a base with a path prefix
    /// keeps it.
    pub fn resolve(&self, path: &str) -> String {
        match &self.base {
            ApiBase::SameOrigin => path.to_string(),
            ApiBase::Override(base) => {
                format!("{}{}", base.as_str().trim_end_matches('/'), path)
            }
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::same_origin()
    }
}

/// Validates a service base or origin URL.
///
/// # Errors
/// Returns [`ConfigError::InvalidBaseUrl`] for unparsable values and
/// [`ConfigError::UnsupportedScheme`] for anything other than `http`/`https`.
pub fn validate_base_url(raw: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|error| ConfigError::InvalidBaseUrl(format!("{raw}: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

/// HTTP method subset used by the service contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Transport-level request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute URL or same-origin path.
    pub url: String,
    /// Content type of `body`, when present.
    pub content_type: Option<&'static str>,
    /// Encoded body.
    pub body: Option<Vec<u8>>,
}

/// Transport-level response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Body text; empty when the body was missing or unreadable.
    pub body: String,
}

impl HttpResponse {
    /// `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstract HTTP transport used by [`ApiClient`].
pub trait HttpTransport: Send + Sync {
    /// Executes one request.
    ///
    /// Implementations return `Ok` for every response that arrived, whatever
    /// its status; status handling belongs to [`ApiClient`].
    ///
    /// # Errors
    /// Returns [`TransportError::Network`] when no response arrived.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Typed JSON client over an [`HttpTransport`].
#[derive(Clone)]
pub struct ApiClient {
    config: ServiceConfig,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Creates a client with resolved configuration.
    pub fn new(config: ServiceConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Posts `body` as JSON to `path` and decodes the JSON response.
    ///
    /// # Errors
    /// Returns [`TransportError`] for encode failures, network failures,
    /// non-2xx statuses, and undecodable response bodies.
    pub fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let encoded = serde_json::to_vec(body).map_err(TransportError::Encode)?;
        self.dispatch(HttpRequest {
            method: HttpMethod::Post,
            url: self.config.resolve(path),
            content_type: Some(JSON_CONTENT_TYPE),
            body: Some(encoded),
        })
    }

    /// Fetches `path` and decodes the JSON response.
    ///
    /// # Errors
    /// Returns [`TransportError`] for network failures, non-2xx statuses, and
    /// undecodable response bodies.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        self.dispatch(HttpRequest {
            method: HttpMethod::Get,
            url: self.config.resolve(path),
            content_type: None,
            body: None,
        })
    }

    fn dispatch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, TransportError> {
        debug!(
            target: "transport",
            "request method={:?} url={} body_bytes={}",
            request.method,
            request.url,
            request.body.as_ref().map_or(0, Vec::len)
        );

        let response = self.transport.execute(&request).inspect_err(|error| {
            warn!(target: "transport", "network_failure url={} error={error}", request.url);
        })?;

        if !response.is_success() {
            warn!(
                target: "transport",
                "status_failure url={} status={}",
                request.url,
                response.status
            );
            return Err(TransportError::Status {
                status: response.status,
                message: failure_message(response.status, &response.body),
            });
        }

        debug!(
            target: "transport",
            "response url={} status={} body_bytes={}",
            request.url,
            response.status,
            response.body.len()
        );
        serde_json::from_str(&response.body).map_err(TransportError::Decode)
    }
}

/// Message surfaced for a failed status: the body text, or `HTTP <status>`
/// when the body is blank.
pub fn failure_message(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

/// Blocking `reqwest` transport.
///
/// Same-origin paths are resolved against the configured origin.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
    origin: Url,
}

impl ReqwestTransport {
    /// Creates a transport with the client's default timeouts.
    ///
    /// # Errors
    /// Returns [`TransportError::Network`] when the HTTP client cannot be
    /// initialized.
    pub fn new(origin: Url) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|error| TransportError::Network(error.to_string()))?;
        Ok(Self { client, origin })
    }

    /// Origin used for same-origin paths.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    fn absolute_url(&self, target: &str) -> Result<Url, TransportError> {
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self
                .origin
                .join(target)
                .map_err(|error| TransportError::Network(format!("invalid url {target}: {error}"))),
            Err(error) => Err(TransportError::Network(format!(
                "invalid url {target}: {error}"
            ))),
        }
    }
}

impl HttpTransport for ReqwestTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = self.absolute_url(&request.url)?;
        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        }
        .header(reqwest::header::ACCEPT, JSON_CONTENT_TYPE);

        if let Some(content_type) = request.content_type {
            builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder
            .send()
            .map_err(|error| TransportError::Network(error.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_else(|error| {
            debug!(target: "transport", "body_unreadable status={status} error={error}");
            String::new()
        });

        Ok(HttpResponse { status, body })
    }
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Non-2xx response. Displays the message verbatim.
    #[error("{message}")]
    Status {
        /// Status code.
        status: u16,
        /// Response body text, or `HTTP <status>`.
        message: String,
    },
    /// No response arrived.
    #[error("network failure: {0}")]
    Network(String),
    /// Success body was not the expected JSON.
    #[error("response decode failure: {0}")]
    Decode(#[source] serde_json::Error),
    /// Request body could not be encoded.
    #[error("request encode failure: {0}")]
    Encode(#[source] serde_json::Error),
}

impl TransportError {
    /// Status code, for status failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Base URL could not be parsed as an absolute URL.
    #[error("invalid service base url: {0}")]
    InvalidBaseUrl(String),
    /// Base URL uses a scheme other than http/https.
    #[error("service base url must use http or https, got {0}")]
    UnsupportedScheme(String),
}
