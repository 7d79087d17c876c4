//! Request descriptors

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

/// Which API a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ApiVariant {
    /// The official API at `api.clashroyale.com`.
    #[default]
    Official,
    /// The RoyaleAPI community mirror at `api.royaleapi.com`.
    Mirror,
}

impl ApiVariant {
    /// Returns the default base URL for this API.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::Official => "https://api.clashroyale.com/v1",
            Self::Mirror => "https://api.royaleapi.com",
        }
    }
}

impl fmt::Display for ApiVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Official => f.write_str("official"),
            Self::Mirror => f.write_str("RoyaleAPI"),
        }
    }
}

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Returns the method name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    pub(crate) fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything needed to issue a request, independent of client configuration.
///
/// Query parameters are kept sorted so the derived cache key does not depend on the
/// order they were added in.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: Method,
    path: String,
    query: BTreeMap<String, String>,
    variant: ApiVariant,
    body: Option<serde_json::Value>,
}

impl RequestDescriptor {
    /// Creates a GET request for a path relative to the API base URL.
    pub fn get(variant: ApiVariant, path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: BTreeMap::new(),
            variant,
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post(variant: ApiVariant, path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: BTreeMap::new(),
            variant,
            body: Some(body),
        }
    }

    /// Sets a query parameter, replacing any previous value.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sets several query parameters.
    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Removes a query parameter.
    pub fn without_query(mut self, key: &str) -> Self {
        self.query.remove(key);
        self
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Returns the path relative to the base URL.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query parameters.
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// Returns the API this request targets.
    pub fn variant(&self) -> ApiVariant {
        self.variant
    }

    /// Returns the JSON body, if any.
    pub fn body(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Builds the absolute URL against a base URL.
    pub fn url(&self, base_url: &str) -> String {
        let mut url = format!("{}{}", base_url.trim_end_matches('/'), self.path);
        if !self.query.is_empty() {
            let query = self
                .query
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Returns the cache key for this request against a base URL.
    pub fn cache_key(&self, base_url: &str) -> String {
        format!("{} {}", self.method, self.url(base_url))
    }

    /// Returns `true` if responses to this request may be cached.
    ///
    /// Only reads are cached. Token verification always goes to the network, so the
    /// mirror's `?token=` query never lands in a cache key.
    pub fn is_cacheable(&self) -> bool {
        self.method == Method::Get && !self.is_token_verification()
    }

    fn is_token_verification(&self) -> bool {
        self.variant == ApiVariant::Mirror && self.path.starts_with("/player/") && self.path.ends_with("/verify")
    }

    /// Returns `true` if this request bypasses the local rate-limit guard.
    ///
    /// The mirror's quota report must stay reachable while the quota is exhausted.
    pub fn is_guard_exempt(&self) -> bool {
        self.variant == ApiVariant::Mirror && self.path == "/auth/stats"
    }
}

/// A typed request: a descriptor plus the model its response decodes into.
///
/// Build one with the functions in [`official`](crate::api::official) or
/// [`mirror`](crate::api::mirror), then hand it to a client.
///
/// # Example
///
/// ```ignore
/// use std::time::Duration;
/// use royale_lib::api::official;
///
/// let request = official::player("#2P0LYQ")?.timeout(Duration::from_secs(30));
/// let player = client.execute(request)?;
/// ```
pub struct Request<T> {
    descriptor: RequestDescriptor,
    timeout: Option<Duration>,
    _model: PhantomData<fn() -> T>,
}

impl<T> Request<T> {
    /// Wraps a descriptor.
    pub fn new(descriptor: RequestDescriptor) -> Self {
        Self {
            descriptor,
            timeout: None,
            _model: PhantomData,
        }
    }

    /// Overrides the client timeout for this request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the descriptor.
    pub fn descriptor(&self) -> &RequestDescriptor {
        &self.descriptor
    }

    /// Returns the per-request timeout override, if set.
    pub fn timeout_override(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns a copy of this request continuing after a pagination cursor.
    pub(crate) fn after(&self, cursor: &str) -> Self {
        Self {
            descriptor: self
                .descriptor
                .clone()
                .without_query("before")
                .with_query("after", cursor),
            timeout: self.timeout,
            _model: PhantomData,
        }
    }

    pub(crate) fn into_parts(self) -> (RequestDescriptor, Option<Duration>) {
        (self.descriptor, self.timeout)
    }
}

impl<T> Clone for Request<T> {
    fn clone(&self) -> Self {
        Self {
            descriptor: self.descriptor.clone(),
            timeout: self.timeout,
            _model: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Request<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("descriptor", &self.descriptor)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_base_path_and_sorted_query() {
        let descriptor = RequestDescriptor::get(ApiVariant::Official, "/clans")
            .with_query("name", "royal guards")
            .with_query("limit", "5");
        assert_eq!(
            descriptor.url("https://api.clashroyale.com/v1/"),
            "https://api.clashroyale.com/v1/clans?limit=5&name=royal%20guards"
        );
    }

    #[test]
    fn test_cache_key_ignores_parameter_order() {
        let a = RequestDescriptor::get(ApiVariant::Mirror, "/top/clans")
            .with_query("max", "10")
            .with_query("page", "2");
        let b = RequestDescriptor::get(ApiVariant::Mirror, "/top/clans")
            .with_params([("page", "2"), ("max", "10")]);
        assert_eq!(a.cache_key("https://x"), b.cache_key("https://x"));
        assert_eq!(a.cache_key("https://x"), "GET https://x/top/clans?max=10&page=2");
    }

    #[test]
    fn test_after_replaces_cursors() {
        let request: Request<()> = Request::new(
            RequestDescriptor::get(ApiVariant::Official, "/clans/%23ABC/members")
                .with_query("before", "b1")
                .with_query("limit", "2"),
        );
        let next = request.after("a1");
        let query = next.descriptor().query();
        assert_eq!(query.get("after").map(String::as_str), Some("a1"));
        assert!(!query.contains_key("before"));
        assert_eq!(query.get("limit").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_only_mirror_auth_stats_is_guard_exempt() {
        assert!(RequestDescriptor::get(ApiVariant::Mirror, "/auth/stats").is_guard_exempt());
        assert!(!RequestDescriptor::get(ApiVariant::Official, "/auth/stats").is_guard_exempt());
        assert!(!RequestDescriptor::get(ApiVariant::Mirror, "/version").is_guard_exempt());
    }

    #[test]
    fn test_posts_are_not_cacheable() {
        let post = RequestDescriptor::post(
            ApiVariant::Official,
            "/players/%23ABC/verifytoken",
            serde_json::json!({"token": "t"}),
        );
        assert!(!post.is_cacheable());
        assert!(RequestDescriptor::get(ApiVariant::Official, "/cards").is_cacheable());
    }

    #[test]
    fn test_mirror_token_check_is_not_cacheable() {
        let verify = RequestDescriptor::get(ApiVariant::Mirror, "/player/2P0LYQ/verify").with_query("token", "secret");
        assert!(!verify.is_cacheable());
        assert!(RequestDescriptor::get(ApiVariant::Mirror, "/player/2P0LYQ").is_cacheable());
    }
}
