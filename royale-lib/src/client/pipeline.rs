//! Request pipeline shared by both clients.
//!
//! A call goes through [`ClientCore::begin`] (variant check, cache lookup, guard check)
//! and, when it has to reach the network, [`ClientCore::finish`] (quota observation,
//! status mapping, cache write). Only the transport call between the two differs per
//! mode. Nothing is mutated before a response has arrived, so an abandoned future
//! leaves the cache and the guard as they were.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::api::ApiVariant;
use crate::api::RequestDescriptor;
use crate::cache::CacheEntry;
use crate::cache::ResponseCache;
use crate::clock::Clock;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::error::RequestError;
use crate::model::KeyStyle;
use crate::model::Model;
use crate::rate_limit::RateLimitGuard;
use crate::rate_limit::RateLimitState;
use crate::response::CacheStatus;
use crate::response::Response;
use crate::transport::HttpRequest;
use crate::transport::ResponseEnvelope;
use crate::transport::check_status;

/// A request ready for the transport.
pub(crate) struct Prepared {
    pub(crate) http: HttpRequest,
    pub(crate) timeout: Duration,
    cache_key: Option<String>,
}

/// What to do after [`ClientCore::begin`].
pub(crate) enum Step {
    /// Serve a fresh cache entry.
    Hit(CacheEntry),
    /// Send the request.
    Send(Prepared),
}

pub(crate) struct ClientCore {
    base_url: String,
    variant: ApiVariant,
    headers: BTreeMap<String, String>,
    timeout: Duration,
    cache: Option<ResponseCache>,
    guard: RateLimitGuard,
    clock: Arc<dyn Clock>,
    key_style: KeyStyle,
    error_debug: bool,
}

impl ClientCore {
    /// Builds the pipeline, opening the configured cache.
    pub(crate) fn new(config: &ClientConfig, clock: Arc<dyn Clock>) -> Result<Self, Error> {
        let cache = config.cache.as_ref().map(|c| c.open()).transpose()?;

        let mut headers = BTreeMap::new();
        headers.insert("authorization".to_string(), format!("Bearer {}", config.token));
        headers.insert("user-agent".to_string(), config.user_agent_header());
        headers.insert("accept".to_string(), "application/json".to_string());

        Ok(Self {
            base_url: config.base_url().trim_end_matches('/').to_string(),
            variant: config.variant,
            headers,
            timeout: config.timeout,
            cache,
            guard: RateLimitGuard::new(),
            clock,
            key_style: config.key_style,
            error_debug: config.error_debug,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn variant(&self) -> ApiVariant {
        self.variant
    }

    pub(crate) fn error_debug(&self) -> bool {
        self.error_debug
    }

    pub(crate) fn rate_limit(&self) -> RateLimitState {
        self.guard.snapshot()
    }

    pub(crate) fn clear_cache(&self) -> Result<(), Error> {
        if let Some(cache) = &self.cache {
            cache.clear()?;
        }
        Ok(())
    }

    /// Validates a request and decides whether it needs the network.
    pub(crate) fn begin(
        &self,
        descriptor: &RequestDescriptor,
        timeout: Option<Duration>,
        bypass_cache: bool,
    ) -> Result<Step, Error> {
        if descriptor.variant() != self.variant {
            return Err(RequestError::VariantMismatch {
                requested: descriptor.variant(),
                configured: self.variant,
            }
            .into());
        }

        let now = self.clock.now();
        let cache_key = match &self.cache {
            Some(_) if descriptor.is_cacheable() => Some(descriptor.cache_key(&self.base_url)),
            _ => None,
        };

        if !bypass_cache {
            if let (Some(cache), Some(key)) = (&self.cache, &cache_key) {
                if let Some(entry) = cache.lookup(key, now) {
                    return Ok(Step::Hit(entry));
                }
            }
        }

        if !descriptor.is_guard_exempt() {
            self.guard.check(now)?;
        }

        let mut http = HttpRequest::new(descriptor.method(), descriptor.url(&self.base_url));
        for (name, value) in &self.headers {
            http = http.with_header(name, value);
        }
        if let Some(body) = descriptor.body() {
            http = http.with_body(body.clone());
        }

        Ok(Step::Send(Prepared {
            http,
            timeout: timeout.unwrap_or(self.timeout),
            cache_key,
        }))
    }

    /// Turns a served cache entry into an envelope and its status.
    pub(crate) fn hit(&self, entry: CacheEntry) -> (ResponseEnvelope, CacheStatus) {
        let ttl = self.cache.as_ref().map(ResponseCache::ttl).unwrap_or_default();
        let status = CacheStatus::Hit {
            cached_at: entry.stored_at,
            expires_at: entry.expires_at(ttl),
        };
        (entry.envelope, status)
    }

    /// Records a received response and maps its status.
    pub(crate) fn finish(
        &self,
        prepared: Prepared,
        envelope: ResponseEnvelope,
    ) -> Result<(ResponseEnvelope, CacheStatus), Error> {
        let now = self.clock.now();
        self.guard.observe(&envelope, now);
        let envelope = check_status(envelope, &prepared.http)?;

        let status = match (&self.cache, prepared.cache_key) {
            (Some(cache), Some(key)) => {
                let entry = cache.store(&key, envelope.clone(), now);
                CacheStatus::Miss {
                    cached_at: entry.stored_at,
                    expires_at: entry.expires_at(cache.ttl()),
                }
            }
            _ => CacheStatus::None,
        };
        Ok((envelope, status))
    }

    /// Decodes an accepted envelope into the response handed to the caller.
    pub(crate) fn respond<T: Model>(
        &self,
        envelope: &ResponseEnvelope,
        cache: CacheStatus,
        origin: RequestDescriptor,
        timeout: Option<Duration>,
    ) -> Result<Response<T>, Error> {
        let mut data: T = envelope.decode()?;
        data.apply_key_style(self.key_style);
        debug!("{} {} decoded ({:?})", origin.method(), origin.path(), cache);
        Ok(Response::new(data, cache, origin).with_timeout(timeout))
    }
}
