//! Client configuration types.

use fofa_core::{FofaError, Result};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Public FOFA server
pub const DEFAULT_SERVER: &str = "https://fofa.info";

/// API version path segment
pub const DEFAULT_API_VERSION: &str = "v1";

/// Environment variable holding a complete account URL
pub const ENV_CLIENT_URL: &str = "FOFA_CLIENT_URL";
/// Environment variable holding the server base URL
pub const ENV_SERVER: &str = "FOFA_SERVER";
/// Environment variable holding the account email
pub const ENV_EMAIL: &str = "FOFA_EMAIL";
/// Environment variable holding the API key
pub const ENV_KEY: &str = "FOFA_KEY";

/// Account credentials and server location.
///
/// The usual textual form is a single URL carrying everything:
/// `https://fofa.info/?email=me@example.com&key=XXXX&version=v1`.
/// A parsed URL is kept as written and handed back by [`url`](Self::url)
/// until one of its parts is changed.
#[derive(Clone)]
pub struct AccountConfig {
    server: String,
    email: String,
    key: String,
    version: String,
    account_debug: bool,
    source: Option<String>,
}

impl PartialEq for AccountConfig {
    fn eq(&self, other: &Self) -> bool {
        self.server == other.server
            && self.email == other.email
            && self.key == other.key
            && self.version == other.version
            && self.account_debug == other.account_debug
    }
}

impl Eq for AccountConfig {}

impl AccountConfig {
    /// Credentials against the public server
    #[must_use]
    pub fn new(email: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            email: email.into(),
            key: key.into(),
            version: DEFAULT_API_VERSION.to_string(),
            account_debug: false,
            source: None,
        }
    }

    /// Parse an account URL.
    ///
    /// `email`, `key` and `version` are read from the query string; missing
    /// credentials stay empty and missing version defaults to `v1`.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input).map_err(|e| FofaError::InvalidUrl(format!("{e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FofaError::InvalidUrl(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(FofaError::InvalidUrl("missing host".into()));
        }

        let mut config = Self::new("", "");
        for (name, value) in url.query_pairs() {
            match name.as_ref() {
                "email" => config.email = value.into_owned(),
                "key" => config.key = value.into_owned(),
                "version" if !value.is_empty() => config.version = value.into_owned(),
                _ => {}
            }
        }

        let mut server = url;
        server.set_query(None);
        server.set_fragment(None);
        config.server = server.as_str().trim_end_matches('/').to_string();
        config.source = Some(input.to_string());

        Ok(config)
    }

    /// Resolve the account the way the command line does.
    ///
    /// A non-empty `explicit` URL wins. Otherwise `FOFA_CLIENT_URL` is used
    /// when set, and failing that the account is assembled from
    /// `FOFA_SERVER`, `FOFA_EMAIL` and `FOFA_KEY` on top of the defaults.
    /// `env` is a lookup function so callers decide where variables come
    /// from.
    pub fn resolve<F>(explicit: Option<&str>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
            return Self::parse(url);
        }
        if let Some(url) = lookup(ENV_CLIENT_URL) {
            return Self::parse(&url);
        }

        let server = lookup(ENV_SERVER).unwrap_or_else(|| DEFAULT_SERVER.to_string());
        let mut config = Self::parse(&server)?;
        config.source = None;
        if let Some(email) = lookup(ENV_EMAIL) {
            config.email = email;
        }
        if let Some(key) = lookup(ENV_KEY) {
            config.key = key;
        }
        Ok(config)
    }

    /// Resolve from the process environment only
    pub fn from_env() -> Result<Self> {
        Self::resolve(None, |name| std::env::var(name).ok())
    }

    /// Point at a different server (e.g. a mock in tests)
    pub fn with_server(mut self, server: &str) -> Result<Self> {
        let parsed = Self::parse(server)?;
        self.server = parsed.server;
        self.source = None;
        Ok(self)
    }

    /// Set the API version segment
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self.source = None;
        self
    }

    /// Keep request URLs (and so credentials) in transport error messages
    #[must_use]
    pub const fn with_account_debug(mut self, enabled: bool) -> Self {
        self.account_debug = enabled;
        self
    }

    /// Server base URL without a trailing slash
    #[must_use]
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Account email
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// API key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// API version segment
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Whether credentials may appear in error messages
    #[must_use]
    pub const fn account_debug(&self) -> bool {
        self.account_debug
    }

    /// Returns true if both email and key are set
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.email.is_empty() && !self.key.is_empty()
    }

    /// Base for endpoint paths, e.g. `https://fofa.info/api/v1`
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("{}/api/{}", self.server, self.version)
    }

    /// The full account URL, credentials included.
    ///
    /// Returns the parsed input unchanged when there is one; otherwise the
    /// URL is rendered from the parts.
    #[must_use]
    pub fn url(&self) -> String {
        if let Some(source) = &self.source {
            return source.clone();
        }
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("email", &self.email)
            .append_pair("key", &self.key)
            .append_pair("version", &self.version)
            .finish();
        format!("{}/?{query}", self.server)
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field("server", &self.server)
            .field("email", &self.email)
            .field("key", &"<redacted>")
            .field("version", &self.version)
            .field("account_debug", &self.account_debug)
            .finish()
    }
}

/// Backoff policy for callers that choose to retry a failed page.
///
/// The client never retries on its own; see
/// `NextPaginator::next_page_with_retry`.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
        }
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set initial backoff duration
    #[must_use]
    pub const fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set maximum backoff duration
    #[must_use]
    pub const fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate backoff for a given attempt (0-based)
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(attempt))
            .min(self.max_backoff)
    }
}

/// Client-side request rate limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,

    /// Requests allowed in a burst
    pub burst_size: u32,
}

impl RateLimitConfig {
    /// Create a rate limit
    #[must_use]
    pub const fn new(requests_per_second: u32, burst_size: u32) -> Self {
        Self {
            requests_per_second,
            burst_size,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(2, 1)
    }
}
