//! Clients for both call styles.

mod blocking;
mod nonblocking;
mod pages;
mod pipeline;

pub use blocking::*;
pub use nonblocking::*;
pub use pages::*;

use crate::api::ApiVariant;
use crate::config::ClientConfig;
use crate::config::Mode;
use crate::error::Error;

/// A client of either mode, chosen by [`ClientConfig::mode`].
///
/// Use this when the mode is a runtime setting; otherwise construct
/// [`BlockingClient`] or [`AsyncClient`] directly.
///
/// # Example
///
/// ```ignore
/// use royale_lib::{Client, ClientConfig, Mode};
/// use royale_lib::api::OfficialApi;
///
/// let client = Client::new(ClientConfig::new(token).with_mode(Mode::NonBlocking))?;
/// let cards = client.nonblocking()?.get_all_cards().await?;
///
/// // The blocking handle is not available on a non-blocking client.
/// assert!(client.blocking().is_err());
/// ```
#[derive(Debug, Clone)]
pub enum Client {
    /// A blocking client.
    Blocking(BlockingClient),
    /// A non-blocking client.
    NonBlocking(AsyncClient),
}

impl Client {
    /// Creates a client of the configured mode.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        Ok(match config.mode {
            Mode::Blocking => Self::Blocking(BlockingClient::new(config)?),
            Mode::NonBlocking => Self::NonBlocking(AsyncClient::new(config)?),
        })
    }

    /// Returns the client's mode.
    pub fn mode(&self) -> Mode {
        match self {
            Self::Blocking(_) => Mode::Blocking,
            Self::NonBlocking(_) => Mode::NonBlocking,
        }
    }

    /// Returns the API this client talks to.
    pub fn variant(&self) -> ApiVariant {
        match self {
            Self::Blocking(client) => client.variant(),
            Self::NonBlocking(client) => client.variant(),
        }
    }

    /// Returns the blocking client, or [`Error::ModeMismatch`] if this one is non-blocking.
    pub fn blocking(&self) -> Result<&BlockingClient, Error> {
        match self {
            Self::Blocking(client) => Ok(client),
            Self::NonBlocking(_) => Err(Error::ModeMismatch {
                expected: Mode::Blocking,
                actual: Mode::NonBlocking,
            }),
        }
    }

    /// Returns the non-blocking client, or [`Error::ModeMismatch`] if this one is blocking.
    pub fn nonblocking(&self) -> Result<&AsyncClient, Error> {
        match self {
            Self::NonBlocking(client) => Ok(client),
            Self::Blocking(_) => Err(Error::ModeMismatch {
                expected: Mode::NonBlocking,
                actual: Mode::Blocking,
            }),
        }
    }

    /// Removes every cached response.
    pub fn clear_cache(&self) -> Result<(), Error> {
        match self {
            Self::Blocking(client) => client.clear_cache(),
            Self::NonBlocking(client) => client.clear_cache(),
        }
    }
}

impl From<BlockingClient> for Client {
    fn from(client: BlockingClient) -> Self {
        Self::Blocking(client)
    }
}

impl From<AsyncClient> for Client {
    fn from(client: AsyncClient) -> Self {
        Self::NonBlocking(client)
    }
}
