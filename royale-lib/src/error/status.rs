//! Status error types

use std::fmt;
use std::time::Duration;

/// Details of an HTTP error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDetail {
    /// HTTP status code.
    pub status: u16,
    /// HTTP method of the failed request.
    pub method: String,
    /// URL of the failed request.
    pub url: String,
    /// Canonical reason phrase for the status, or the API's `reason` field.
    pub reason: String,
    /// Error message reported by the API, if any.
    pub message: Option<String>,
}

impl ErrorDetail {
    /// Creates a new error detail.
    pub fn new(status: u16, method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            status,
            method: method.into(),
            url: url.into(),
            reason: reason_phrase(status).to_string(),
            message: None,
        }
    }

    /// Extracts `reason` and `message` (or `error`) from an error body.
    ///
    /// Bodies that are not JSON objects become the message verbatim.
    pub fn with_body(mut self, body: &[u8]) -> Self {
        match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(serde_json::Value::Object(obj)) => {
                if let Some(reason) = obj.get("reason").and_then(|v| v.as_str()) {
                    self.reason = reason.to_string();
                }
                self.message = obj
                    .get("message")
                    .or_else(|| obj.get("error"))
                    .and_then(|v| match v {
                        serde_json::Value::String(s) => Some(s.clone()),
                        serde_json::Value::Null => None,
                        other => Some(other.to_string()),
                    });
            }
            _ => {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if !text.is_empty() {
                    self.message = Some(text);
                }
            }
        }
        self
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.reason, self.status)?;
        if let Some(message) = &self.message {
            write!(f, ": {}", message)?;
        }
        Ok(())
    }
}

/// Errors tied to an HTTP exchange with the API.
///
/// Each received status code maps to exactly one variant; see
/// [`check_status`](crate::transport::check_status).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// No response arrived within the timeout.
    #[error("API request timed out after {timeout:?}")]
    NotResponding {
        /// The timeout that elapsed.
        timeout: Duration,
    },

    /// The connection failed before a response was received.
    #[error("Network error: {message}")]
    Network {
        /// Description of the connection failure.
        message: String,
    },

    /// HTTP 400.
    #[error("Bad request: {0}")]
    BadRequest(ErrorDetail),

    /// HTTP 401 or 403: the token is invalid or not allowed from this address.
    #[error("Unauthorized: {0}")]
    Unauthorized(ErrorDetail),

    /// HTTP 404: the player, clan or tournament does not exist.
    #[error("Not found: {0}")]
    NotFound(ErrorDetail),

    /// HTTP 417: the mirror does not track the requested entity.
    #[error("Not tracked: {0}")]
    NotTracked(ErrorDetail),

    /// HTTP 429: the server rejected the request for exceeding the rate limit.
    #[error("Rate limited: {0}")]
    Ratelimit(ErrorDetail),

    /// HTTP 5xx: the API is down or in maintenance.
    #[error("Server error: {0}")]
    Server(ErrorDetail),

    /// Any other non-success status.
    #[error("Unexpected response: {0}")]
    Unexpected(ErrorDetail),
}

impl StatusError {
    /// Returns the HTTP status code for this error.
    ///
    /// Timeouts report 504 and connection failures 503, matching what a gateway would
    /// have returned.
    pub fn code(&self) -> u16 {
        match self {
            Self::NotResponding { .. } => 504,
            Self::Network { .. } => 503,
            Self::BadRequest(d)
            | Self::Unauthorized(d)
            | Self::NotFound(d)
            | Self::NotTracked(d)
            | Self::Ratelimit(d)
            | Self::Server(d)
            | Self::Unexpected(d) => d.status,
        }
    }

    /// Returns the response details, if a response was received.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            Self::NotResponding { .. } | Self::Network { .. } => None,
            Self::BadRequest(d)
            | Self::Unauthorized(d)
            | Self::NotFound(d)
            | Self::NotTracked(d)
            | Self::Ratelimit(d)
            | Self::Server(d)
            | Self::Unexpected(d) => Some(d),
        }
    }
}

/// Canonical reason phrase for the status codes the API uses.
pub(crate) fn reason_phrase(status: u16) -> &'static str {
    match status {
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        417 => "Expectation Failed",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_reads_official_error_body() {
        let body = br#"{"reason":"notFound","message":"Player not found"}"#;
        let detail = ErrorDetail::new(404, "GET", "https://x/players/%23ABC").with_body(body);
        assert_eq!(detail.reason, "notFound");
        assert_eq!(detail.message.as_deref(), Some("Player not found"));
        assert_eq!(detail.to_string(), "notFound (404): Player not found");
    }

    #[test]
    fn test_detail_reads_mirror_error_body() {
        let body = br#"{"error":true,"status":417,"message":"Clan not tracked"}"#;
        let detail = ErrorDetail::new(417, "GET", "https://x/clan/ABC/history").with_body(body);
        assert_eq!(detail.reason, "Expectation Failed");
        assert_eq!(detail.message.as_deref(), Some("Clan not tracked"));
    }

    #[test]
    fn test_detail_keeps_plain_text_body() {
        let detail = ErrorDetail::new(503, "GET", "https://x/version").with_body(b"maintenance\n");
        assert_eq!(detail.message.as_deref(), Some("maintenance"));
    }

    #[test]
    fn test_codes() {
        let d = ErrorDetail::new(429, "GET", "u");
        assert_eq!(StatusError::Ratelimit(d).code(), 429);
        assert_eq!(
            StatusError::NotResponding {
                timeout: Duration::from_secs(1)
            }
            .code(),
            504
        );
    }
}
