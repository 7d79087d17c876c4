//! Error types
//!
//! All fallible operations return [`Error`]. Its variants follow the taxonomy of the
//! remote API: [`RequestError`] for input rejected before anything is sent,
//! [`StatusError`] for failures tied to an HTTP exchange, and
//! [`Error::RatelimitDetected`] when the local guard refuses to send at all.

mod cache;
mod field;
mod status;
mod tag;

pub use cache::*;
pub use field::*;
pub use status::*;
pub use tag::*;

use std::time::Duration;

use crate::api::ApiVariant;
use crate::config::Mode;

/// The error type for every client operation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request was rejected before it reached the network.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The HTTP exchange failed or returned an error status.
    #[error(transparent)]
    Status(#[from] StatusError),

    /// The local rate-limit guard refused the call; no request was sent.
    #[error("Rate limit exhausted, resets in {retry_after:?}")]
    RatelimitDetected {
        /// Time left until the provider resets the quota.
        retry_after: Duration,
    },

    /// An operation for one client mode was invoked on a client of the other mode.
    #[error("Operation requires a {expected} client, but this client is {actual}")]
    ModeMismatch {
        /// The mode the operation needs.
        expected: Mode,
        /// The mode the client was built with.
        actual: Mode,
    },

    /// The response body did not match the expected model.
    #[error("Response decode error: {message}")]
    Decode {
        /// Description of the decode error.
        message: String,
        /// Raw response body, if it was valid UTF-8.
        body: Option<String>,
    },

    /// A cache administration call failed.
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl Error {
    /// Creates a new decode error.
    pub fn decode(message: impl Into<String>, body: Option<String>) -> Self {
        Self::Decode {
            message: message.into(),
            body,
        }
    }

    /// Creates an invalid parameter error.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Request(RequestError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        })
    }

    /// Returns the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status(status) => Some(status.code()),
            _ => None,
        }
    }

    /// Returns the status error, if this is one.
    pub fn as_status(&self) -> Option<&StatusError> {
        match self {
            Self::Status(status) => Some(status),
            _ => None,
        }
    }
}

impl From<TagError> for Error {
    fn from(err: TagError) -> Self {
        Self::Request(RequestError::InvalidTag(err))
    }
}

/// Errors for requests rejected locally because their input is malformed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// A tag could not be normalized.
    #[error(transparent)]
    InvalidTag(#[from] TagError),

    /// A query parameter was missing or out of range.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The request targets a different API than the client is configured for.
    #[error("Request targets the {requested} API, but the client is configured for {configured}")]
    VariantMismatch {
        /// The API the request was built for.
        requested: ApiVariant,
        /// The API the client talks to.
        configured: ApiVariant,
    },
}
