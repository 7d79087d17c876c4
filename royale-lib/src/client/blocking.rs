//! Blocking client

use std::sync::Arc;

use super::pipeline::ClientCore;
use super::pipeline::Step;
use super::pages::BlockingPages;
use crate::api::ApiVariant;
use crate::api::Execute;
use crate::api::Page;
use crate::api::Request;
use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::model::Model;
use crate::rate_limit::RateLimitState;
use crate::response::Response;
use crate::transport::BlockingReqwestTransport;
use crate::transport::BlockingTransport;
use crate::transport::perform_blocking;

/// Client whose calls run to completion on the calling thread.
///
/// From async code, run calls inside `tokio::task::spawn_blocking` or use
/// [`AsyncClient`](crate::AsyncClient). A call made directly on a runtime worker thread
/// stalls that worker, and the default `reqwest` transport panics there.
///
/// # Example
///
/// ```ignore
/// use royale_lib::{BlockingClient, ClientConfig};
/// use royale_lib::api::OfficialApi;
///
/// let client = BlockingClient::new(ClientConfig::new(token))?;
/// let clan = client.get_clan("#8L9L9GL")?;
/// println!("{} members", clan.member_list.len());
/// ```
#[derive(Clone)]
pub struct BlockingClient {
    inner: Arc<BlockingClientInner>,
}

struct BlockingClientInner {
    core: ClientCore,
    transport: Arc<dyn BlockingTransport>,
}

impl BlockingClient {
    /// Creates a client sending requests with `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = match config.blocking_http_client.clone() {
            Some(client) => BlockingReqwestTransport::with_client(client),
            None => BlockingReqwestTransport::new(),
        };
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client sending requests through a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn BlockingTransport>) -> Result<Self, Error> {
        Self::from_parts(config, transport, Arc::new(SystemClock))
    }

    /// Creates a client with a custom transport and clock.
    pub fn from_parts(
        config: ClientConfig,
        transport: Arc<dyn BlockingTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        Ok(Self {
            inner: Arc::new(BlockingClientInner {
                core: ClientCore::new(&config, clock)?,
                transport,
            }),
        })
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.inner.core.base_url()
    }

    /// Returns the API this client talks to.
    pub fn variant(&self) -> ApiVariant {
        self.inner.core.variant()
    }

    /// Returns the last quota reported by the server.
    pub fn rate_limit(&self) -> RateLimitState {
        self.inner.core.rate_limit()
    }

    /// Removes every cached response. Does nothing without a cache.
    pub fn clear_cache(&self) -> Result<(), Error> {
        self.inner.core.clear_cache()
    }

    /// Iterates over every item of a paginated endpoint, fetching pages as needed.
    pub fn paginate<T: Model>(&self, request: Request<Page<T>>) -> BlockingPages<'_, T> {
        BlockingPages::new(self, request)
    }
}

impl Execute for BlockingClient {
    type Output<T: Model> = Result<Response<T>, Error>;

    fn fetch<T: Model>(&self, request: Request<T>, bypass_cache: bool) -> Self::Output<T> {
        let (descriptor, timeout) = request.into_parts();
        let core = &self.inner.core;
        let (envelope, status) = match core.begin(&descriptor, timeout, bypass_cache)? {
            Step::Hit(entry) => core.hit(entry),
            Step::Send(prepared) => {
                let envelope = perform_blocking(
                    self.inner.transport.as_ref(),
                    &prepared.http,
                    prepared.timeout,
                    core.error_debug(),
                )?;
                core.finish(prepared, envelope)?
            }
        };
        core.respond(&envelope, status, descriptor, timeout)
    }

    fn fail<T: Model>(&self, error: Error) -> Self::Output<T> {
        Err(error)
    }
}

impl std::fmt::Debug for BlockingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingClient")
            .field("base_url", &self.base_url())
            .field("variant", &self.variant())
            .finish_non_exhaustive()
    }
}
