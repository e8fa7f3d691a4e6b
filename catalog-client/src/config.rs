//! Client configuration

/// Default backend when `BACKEND_API_URL` is unset
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/v1";

/// Key the access token is persisted under
pub const DEFAULT_TOKEN_KEY: &str = "accessToken";

/// Client configuration for connecting to the catalog backend
///
/// # Environment
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | BACKEND_API_URL | http://localhost:5000/api/v1 | backend base URL |
/// | CATALOG_HTTP_TIMEOUT | 30 | request timeout (seconds) |
/// | CATALOG_CACHE_TTL | 30 | list read cache lifetime (seconds) |
/// | CATALOG_TOKEN_KEY | accessToken | token store key |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://shop.example.com/api/v1")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Lifetime of cached list reads, in seconds (0 disables the cache)
    pub cache_ttl: u64,

    /// Name the access token is stored under
    pub token_key: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            cache_ttl: 30,
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// Missing or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::new(DEFAULT_BASE_URL);
        Self {
            base_url: std::env::var("BACKEND_API_URL").unwrap_or(defaults.base_url),
            timeout: std::env::var("CATALOG_HTTP_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.timeout),
            cache_ttl: std::env::var("CATALOG_CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_ttl),
            token_key: std::env::var("CATALOG_TOKEN_KEY").unwrap_or(defaults.token_key),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the list cache lifetime
    pub fn with_cache_ttl(mut self, seconds: u64) -> Self {
        self.cache_ttl = seconds;
        self
    }

    /// Set the token store key
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    /// Create an HTTP gateway from this configuration
    pub fn build_gateway(&self) -> crate::ClientResult<crate::HttpGateway> {
        crate::HttpGateway::new(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
