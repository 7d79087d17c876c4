//! HTTP transport adapters
//!
//! A transport performs one HTTP exchange and hands back a [`ResponseEnvelope`]. Two
//! seams exist, one per client mode: [`AsyncTransport`] for the non-blocking client and
//! [`BlockingTransport`] for the blocking one. Both have a `reqwest` implementation;
//! tests plug in their own.
//!
//! [`perform`] and [`perform_blocking`] wrap a raw transport with the behavior every
//! call shares: request logging, timeout enforcement, connection error mapping and the
//! debug mode that fails every call with a synthesized server error. [`check_status`]
//! turns a received status code into the matching [`StatusError`].

use std::collections::BTreeMap;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde::de::IgnoredAny;

use crate::api::Method;
use crate::error::Error;
use crate::error::ErrorDetail;
use crate::error::StatusError;

// =============================================================================
// Request / Response
// =============================================================================

/// A fully resolved HTTP request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    /// Request headers, lower-cased names.
    pub headers: BTreeMap<String, String>,
    /// JSON body, for POST requests.
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// Creates a request without headers or body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Sets a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The normalized representation of an HTTP response.
///
/// Header names are lower-cased. The body is kept as raw bytes; [`json`](Self::json)
/// and [`decode`](Self::decode) parse it on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    status: u16,
    headers: BTreeMap<String, String>,
    body: Vec<u8>,
}

impl ResponseEnvelope {
    /// Creates a new envelope.
    pub fn new(status: u16, headers: BTreeMap<String, String>, body: impl Into<Vec<u8>>) -> Self {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Creates a JSON envelope with no headers.
    pub fn json_body(status: u16, body: &serde_json::Value) -> Self {
        Self::new(status, BTreeMap::new(), body.to_string())
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Returns the HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns all headers.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Returns a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    /// Returns the raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, Error> {
        serde_json::from_slice(&self.body)
            .map_err(|e| Error::decode(e.to_string(), Some(self.text())))
    }

    /// Decodes the body into a model.
    ///
    /// Some mirror endpoints answer in plain text; a body that is not JSON at all is
    /// decoded as a JSON string holding the text.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, Error> {
        match serde_json::from_slice::<T>(&self.body) {
            Ok(value) => Ok(value),
            Err(e) => {
                let text = self.text();
                if serde_json::from_slice::<IgnoredAny>(&self.body).is_err() {
                    let plain = serde_json::Value::String(text.trim().to_string());
                    if let Ok(value) = serde_json::from_value(plain) {
                        return Ok(value);
                    }
                }
                Err(Error::decode(e.to_string(), Some(text)))
            }
        }
    }
}

// =============================================================================
// Transport traits
// =============================================================================

/// Low-level failures before a response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The connection could not be established or was dropped.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Any other transport failure (invalid URL, TLS, body read).
    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Transport used by the non-blocking client.
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    /// Sends a request and returns the response, whatever its status.
    async fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<ResponseEnvelope, TransportError>;
}

/// Transport used by the blocking client.
pub trait BlockingTransport: Send + Sync {
    /// Sends a request and returns the response, whatever its status.
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<ResponseEnvelope, TransportError>;
}

// =============================================================================
// reqwest implementations
// =============================================================================

/// Non-blocking transport backed by [`reqwest::Client`].
///
/// The HTTP client is created on first use unless one is supplied.
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    client: OnceLock<reqwest::Client>,
}

impl ReqwestTransport {
    /// Creates a transport that builds its HTTP client lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport using a pre-configured HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(client);
        Self { client: cell }
    }

    fn client(&self) -> Result<&reqwest::Client, TransportError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::Client::builder().build()?;
        Ok(self.client.get_or_init(|| client))
    }
}

#[async_trait]
impl AsyncTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<ResponseEnvelope, TransportError> {
        let client = self.client()?;
        let mut builder = client
            .request(request.method.to_reqwest(), &request.url)
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;
        Ok(ResponseEnvelope::new(status, headers, body.to_vec()))
    }
}

/// Blocking transport backed by [`reqwest::blocking::Client`].
///
/// The HTTP client is created on first use unless one is supplied.
#[derive(Debug, Default)]
pub struct BlockingReqwestTransport {
    client: OnceLock<reqwest::blocking::Client>,
}

impl BlockingReqwestTransport {
    /// Creates a transport that builds its HTTP client lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport using a pre-configured HTTP client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(client);
        Self { client: cell }
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, TransportError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl BlockingTransport for BlockingReqwestTransport {
    fn send(&self, request: &HttpRequest, timeout: Duration) -> Result<ResponseEnvelope, TransportError> {
        let client = self.client()?;
        let mut builder = client
            .request(request.method.to_reqwest(), &request.url)
            .timeout(timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let body = response.bytes()?;
        Ok(ResponseEnvelope::new(status, headers, body.to_vec()))
    }
}

fn collect_headers(headers: &reqwest::header::HeaderMap) -> BTreeMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

// =============================================================================
// Shared adapter behavior
// =============================================================================

/// Performs a request through a non-blocking transport.
///
/// The timeout is enforced here as well as handed to the transport, so a transport that
/// ignores it still surfaces [`StatusError::NotResponding`].
pub async fn perform(
    transport: &dyn AsyncTransport,
    request: &HttpRequest,
    timeout: Duration,
    error_debug: bool,
) -> Result<ResponseEnvelope, Error> {
    debug!("{} {}", request.method, request.url);
    if error_debug {
        return Err(synthesized_server_error(request).into());
    }

    match tokio::time::timeout(timeout, transport.send(request, timeout)).await {
        Ok(result) => result.map_err(|e| map_transport_error(e, timeout)),
        Err(_) => Err(StatusError::NotResponding { timeout }.into()),
    }
}

/// Performs a request through a blocking transport.
pub fn perform_blocking(
    transport: &dyn BlockingTransport,
    request: &HttpRequest,
    timeout: Duration,
    error_debug: bool,
) -> Result<ResponseEnvelope, Error> {
    debug!("{} {}", request.method, request.url);
    if error_debug {
        return Err(synthesized_server_error(request).into());
    }

    transport
        .send(request, timeout)
        .map_err(|e| map_transport_error(e, timeout))
}

/// Maps a received response to an error by status code.
///
/// | Status      | Error                         |
/// |-------------|-------------------------------|
/// | 2xx         | none, envelope returned       |
/// | 400         | [`StatusError::BadRequest`]   |
/// | 401, 403    | [`StatusError::Unauthorized`] |
/// | 404         | [`StatusError::NotFound`]     |
/// | 417         | [`StatusError::NotTracked`]   |
/// | 429         | [`StatusError::Ratelimit`]    |
/// | 500 and up  | [`StatusError::Server`]       |
/// | other       | [`StatusError::Unexpected`]   |
pub fn check_status(envelope: ResponseEnvelope, request: &HttpRequest) -> Result<ResponseEnvelope, StatusError> {
    let status = envelope.status();
    debug!("{} {} returned {}", request.method, request.url, status);
    if envelope.is_success() {
        return Ok(envelope);
    }

    let detail = ErrorDetail::new(status, request.method.as_str(), &request.url).with_body(envelope.body());
    Err(match status {
        400 => StatusError::BadRequest(detail),
        401 | 403 => StatusError::Unauthorized(detail),
        404 => StatusError::NotFound(detail),
        417 => StatusError::NotTracked(detail),
        429 => StatusError::Ratelimit(detail),
        s if s >= 500 => StatusError::Server(detail),
        _ => StatusError::Unexpected(detail),
    })
}

fn map_transport_error(err: TransportError, timeout: Duration) -> Error {
    match err {
        TransportError::Timeout => StatusError::NotResponding { timeout }.into(),
        TransportError::Connect(message) | TransportError::Other(message) => {
            StatusError::Network { message }.into()
        }
    }
}

fn synthesized_server_error(request: &HttpRequest) -> StatusError {
    let mut detail = ErrorDetail::new(500, request.method.as_str(), &request.url);
    detail.message = Some("error debug mode is enabled".to_string());
    StatusError::Server(detail)
}
