//! Response wrapper with cache status

use std::time::Duration;

use chrono::DateTime;
use chrono::Utc;

use crate::api::Request;
use crate::api::RequestDescriptor;

/// A decoded API response with cache status information.
///
/// Every operation returns this wrapper so callers can tell whether the data came from
/// the cache, and so the originating request can be re-issued with
/// [`Execute::refresh`](crate::Execute::refresh).
///
/// # Example
///
/// ```ignore
/// let response = client.get_player("#2P0LYQ")?;
///
/// if response.is_cached() {
///     println!("Data from cache, cached at {:?}", response.cached_at());
/// }
///
/// let player = response.into_inner();
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    /// Information about whether this response came from cache.
    pub cache: CacheStatus,
    origin: RequestDescriptor,
    timeout: Option<Duration>,
}

impl<T> Response<T> {
    /// Creates a response for the request that produced it.
    pub fn new(data: T, cache: CacheStatus, origin: RequestDescriptor) -> Self {
        Self {
            data,
            cache,
            origin,
            timeout: None,
        }
    }

    pub(crate) fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns `true` if this response came from the cache.
    pub fn is_cached(&self) -> bool {
        self.cache.is_hit()
    }

    /// Returns `true` if this was a fresh fetch (cache miss or cache disabled).
    pub fn is_fresh(&self) -> bool {
        !self.is_cached()
    }

    /// Returns when the data was cached, if applicable.
    pub fn cached_at(&self) -> Option<DateTime<Utc>> {
        match &self.cache {
            CacheStatus::None => None,
            CacheStatus::Miss { cached_at, .. } | CacheStatus::Hit { cached_at, .. } => Some(*cached_at),
        }
    }

    /// Returns when the cached data expires, if applicable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        match &self.cache {
            CacheStatus::None => None,
            CacheStatus::Miss { expires_at, .. } | CacheStatus::Hit { expires_at, .. } => Some(*expires_at),
        }
    }

    /// Returns the request that produced this response.
    pub fn origin(&self) -> &RequestDescriptor {
        &self.origin
    }

    /// Returns a request that fetches the same data again.
    pub fn request(&self) -> Request<T> {
        let request = Request::new(self.origin.clone());
        match self.timeout {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    /// Returns a reference to the inner data.
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Consumes the response and returns the inner data.
    pub fn into_inner(self) -> T {
        self.data
    }

    /// Maps the inner data using the provided function.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Response<U> {
        Response {
            data: f(self.data),
            cache: self.cache,
            origin: self.origin,
            timeout: self.timeout,
        }
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

/// Cache status for a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Cache was disabled or bypassed for this request.
    None,
    /// Cache miss - data was freshly fetched and is now cached.
    Miss {
        /// When the data was cached.
        cached_at: DateTime<Utc>,
        /// When the cached data will expire.
        expires_at: DateTime<Utc>,
    },
    /// Cache hit - data was returned from cache.
    Hit {
        /// When the data was originally cached.
        cached_at: DateTime<Utc>,
        /// When the cached data will expire.
        expires_at: DateTime<Utc>,
    },
}

impl CacheStatus {
    /// Returns `true` if this is a cache hit.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit { .. })
    }

    /// Returns `true` if this is a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(self, Self::Miss { .. })
    }

    /// Returns `true` if caching was not involved.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiVariant;

    #[test]
    fn test_request_rebuilds_origin_with_timeout() {
        let origin = RequestDescriptor::get(ApiVariant::Official, "/cards");
        let response = Response::new(3u32, CacheStatus::None, origin.clone())
            .with_timeout(Some(Duration::from_secs(30)));

        let request = response.request();
        assert_eq!(request.descriptor(), &origin);
        assert_eq!(request.timeout_override(), Some(Duration::from_secs(30)));
        assert!(response.is_fresh());
        assert_eq!(*response, 3);
    }

    #[test]
    fn test_map_keeps_cache_status() {
        let now = Utc::now();
        let status = CacheStatus::Hit {
            cached_at: now,
            expires_at: now,
        };
        let origin = RequestDescriptor::get(ApiVariant::Mirror, "/version");
        let response = Response::new("4.1.2".to_string(), status, origin).map(|v| v.len());
        assert!(response.is_cached());
        assert_eq!(response.cached_at(), Some(now));
        assert_eq!(response.into_inner(), 5);
    }
}
