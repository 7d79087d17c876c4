//! Client configuration

use std::fmt;
use std::time::Duration;

use crate::api::ApiVariant;
use crate::cache::CacheConfig;
use crate::model::KeyStyle;

/// How a client runs its calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Calls run to completion on the calling thread.
    #[default]
    Blocking,
    /// Calls return futures.
    NonBlocking,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blocking => f.write_str("blocking"),
            Self::NonBlocking => f.write_str("non-blocking"),
        }
    }
}

/// Construction parameters shared by both clients.
///
/// Only the token is required; everything else has a default.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use royale_lib::{ApiVariant, ClientConfig, Mode};
/// use royale_lib::cache::CacheConfig;
///
/// let config = ClientConfig::new("my-token")
///     .with_mode(Mode::NonBlocking)
///     .with_variant(ApiVariant::Mirror)
///     .with_timeout(Duration::from_secs(5))
///     .with_cache(CacheConfig::in_memory().with_ttl(Duration::from_secs(60)));
///
/// assert_eq!(config.base_url(), "https://api.royaleapi.com");
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    /// API token sent as a bearer token.
    pub token: String,
    /// Blocking or non-blocking.
    pub mode: Mode,
    /// Which API the client talks to.
    pub variant: ApiVariant,
    /// Overrides the variant's default base URL.
    pub base_url: Option<String>,
    /// Pre-configured HTTP client for the non-blocking client.
    pub http_client: Option<reqwest::Client>,
    /// Pre-configured HTTP client for the blocking client.
    pub blocking_http_client: Option<reqwest::blocking::Client>,
    /// Default per-call timeout.
    pub timeout: Duration,
    /// Response cache; `None` disables caching.
    pub cache: Option<CacheConfig>,
    /// Naming convention of [`Record`](crate::model::Record) keys.
    pub key_style: KeyStyle,
    /// Fails every call with a synthesized server error instead of sending it.
    pub error_debug: bool,
    /// Appended to the library's `User-Agent`.
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// The default per-call timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a blocking, uncached configuration for the official API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            mode: Mode::default(),
            variant: ApiVariant::default(),
            base_url: None,
            http_client: None,
            blocking_http_client: None,
            timeout: Self::DEFAULT_TIMEOUT,
            cache: None,
            key_style: KeyStyle::default(),
            error_debug: false,
            user_agent: None,
        }
    }

    /// Sets the client mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the API variant.
    pub fn with_variant(mut self, variant: ApiVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Overrides the base URL, e.g. for a proxy.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Uses a pre-configured non-blocking HTTP client.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Uses a pre-configured blocking HTTP client.
    pub fn with_blocking_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.blocking_http_client = Some(client);
        self
    }

    /// Sets the default per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables response caching.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the naming convention of record keys.
    pub fn with_key_style(mut self, style: KeyStyle) -> Self {
        self.key_style = style;
        self
    }

    /// Makes every call fail with a synthesized server error.
    pub fn with_error_debug(mut self, enabled: bool) -> Self {
        self.error_debug = enabled;
        self
    }

    /// Appends a suffix to the `User-Agent` header.
    pub fn with_user_agent(mut self, suffix: impl Into<String>) -> Self {
        self.user_agent = Some(suffix.into());
        self
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.variant.default_base_url())
    }

    /// Returns the full `User-Agent` header value.
    pub fn user_agent_header(&self) -> String {
        let base = concat!("royale-lib/", env!("CARGO_PKG_VERSION"));
        match &self.user_agent {
            Some(suffix) => format!("{} {}", base, suffix),
            None => base.to_string(),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("token", &"<redacted>")
            .field("mode", &self.mode)
            .field("variant", &self.variant)
            .field("base_url", &self.base_url())
            .field("timeout", &self.timeout)
            .field("cache", &self.cache)
            .field("key_style", &self.key_style)
            .field("error_debug", &self.error_debug)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("t");
        assert_eq!(config.mode, Mode::Blocking);
        assert_eq!(config.variant, ApiVariant::Official);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.cache.is_none());
        assert_eq!(config.base_url(), "https://api.clashroyale.com/v1");
    }

    #[test]
    fn test_base_url_override() {
        let config = ClientConfig::new("t").with_base_url("https://proxy.royaleapi.dev/v1");
        assert_eq!(config.base_url(), "https://proxy.royaleapi.dev/v1");
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("secret-token");
        assert!(!format!("{:?}", config).contains("secret-token"));
    }

    #[test]
    fn test_user_agent_suffix() {
        let config = ClientConfig::new("t").with_user_agent("my-bot/2.0");
        let header = config.user_agent_header();
        assert!(header.starts_with("royale-lib/"));
        assert!(header.ends_with(" my-bot/2.0"));
    }
}
