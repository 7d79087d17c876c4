//! Non-blocking client

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;

use super::pipeline::ClientCore;
use super::pipeline::Step;
use super::pages::Pages;
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
use crate::transport::AsyncTransport;
use crate::transport::ReqwestTransport;
use crate::transport::perform;

/// Client whose calls return futures.
///
/// This client is cheap to clone (uses `Arc` internally); clones share the cache and
/// the rate-limit guard. Returned futures are `Send + 'static`, so they can be spawned.
///
/// # Example
///
/// ```ignore
/// use royale_lib::{AsyncClient, ClientConfig};
/// use royale_lib::api::OfficialApi;
///
/// let client = AsyncClient::new(ClientConfig::new(token))?;
/// let player = client.get_player("#2P0LYQ").await?;
/// println!("{}", player.name);
/// ```
#[derive(Clone)]
pub struct AsyncClient {
    inner: Arc<AsyncClientInner>,
}

struct AsyncClientInner {
    core: ClientCore,
    transport: Arc<dyn AsyncTransport>,
}

impl AsyncClient {
    /// Creates a client sending requests with `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let transport = match config.http_client.clone() {
            Some(client) => ReqwestTransport::with_client(client),
            None => ReqwestTransport::new(),
        };
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client sending requests through a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn AsyncTransport>) -> Result<Self, Error> {
        Self::from_parts(config, transport, Arc::new(SystemClock))
    }

    /// Creates a client with a custom transport and clock.
    pub fn from_parts(
        config: ClientConfig,
        transport: Arc<dyn AsyncTransport>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, Error> {
        Ok(Self {
            inner: Arc::new(AsyncClientInner {
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

    /// Walks a paginated endpoint page by page, following `after` cursors.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use royale_lib::api::{official, Paging};
    ///
    /// let mut pages = client.paginate(official::clan_members("#8L9L9GL", &Paging::new().limit(20))?);
    /// while let Some(page) = pages.next().await {
    ///     for member in page? {
    ///         println!("{}", member.name);
    ///     }
    /// }
    /// ```
    pub fn paginate<T: Model>(&self, request: Request<Page<T>>) -> Pages<T> {
        Pages::new(self.clone(), request)
    }
}

impl Execute for AsyncClient {
    type Output<T: Model> = BoxFuture<'static, Result<Response<T>, Error>>;

    fn fetch<T: Model>(&self, request: Request<T>, bypass_cache: bool) -> Self::Output<T> {
        let inner = Arc::clone(&self.inner);
        async move {
            let (descriptor, timeout) = request.into_parts();
            let core = &inner.core;
            let (envelope, status) = match core.begin(&descriptor, timeout, bypass_cache)? {
                Step::Hit(entry) => core.hit(entry),
                Step::Send(prepared) => {
                    let envelope = perform(
                        inner.transport.as_ref(),
                        &prepared.http,
                        prepared.timeout,
                        core.error_debug(),
                    )
                    .await?;
                    core.finish(prepared, envelope)?
                }
            };
            core.respond(&envelope, status, descriptor, timeout)
        }
        .boxed()
    }

    fn fail<T: Model>(&self, error: Error) -> Self::Output<T> {
        futures::future::ready(Err(error)).boxed()
    }
}

impl std::fmt::Debug for AsyncClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncClient")
            .field("base_url", &self.base_url())
            .field("variant", &self.variant())
            .finish_non_exhaustive()
    }
}
