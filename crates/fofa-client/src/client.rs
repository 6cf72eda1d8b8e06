//! Main FOFA API client implementation.

use crate::api::{AccountApi, HostApi, SearchApi};
use crate::config::{AccountConfig, RateLimitConfig};
use crate::events::{ClientEvent, EventSink, TracingSink};
use fofa_core::{Envelope, FofaError, Result};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client as HttpClient;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest error body kept in a protocol error message
const MAX_ERROR_BODY: usize = 512;

type Limiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Main FOFA API client
///
/// Cheap to clone; clones share the connection pool, rate limiter and
/// event sink.
#[derive(Clone)]
pub struct FofaClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    account: AccountConfig,
    api_base: String,
    limiter: Option<Limiter>,
    events: Arc<dyn EventSink>,
}

impl FofaClient {
    /// Create a new client for the given account using default settings
    pub fn new(account: AccountConfig) -> Result<Self> {
        FofaClientBuilder::new(account).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(account: AccountConfig) -> FofaClientBuilder {
        FofaClientBuilder::new(account)
    }

    /// Access search endpoints (`search/all`, `search/stats`, `search/next`)
    #[must_use]
    pub fn search(&self) -> SearchApi<'_> {
        SearchApi::new(self)
    }

    /// Access host aggregation endpoints
    #[must_use]
    pub fn host(&self) -> HostApi<'_> {
        HostApi::new(self)
    }

    /// Access account endpoints
    #[must_use]
    pub fn account(&self) -> AccountApi<'_> {
        AccountApi::new(self)
    }

    /// The account this client authenticates as
    #[must_use]
    pub fn account_config(&self) -> &AccountConfig {
        &self.inner.account
    }

    pub(crate) fn emit(&self, event: &ClientEvent<'_>) {
        self.inner.events.event(event);
    }

    /// Perform one GET request and unwrap the response envelope.
    ///
    /// Credentials are always sent first. No retries happen here.
    pub(crate) async fn get_envelope(&self, path: &str, params: &[(&str, &str)]) -> Result<Envelope> {
        if let Some(limiter) = &self.inner.limiter {
            limiter.until_ready().await;
        }

        self.emit(&ClientEvent::Request { path });
        let result = self.execute(path, params).await;
        if let Err(error) = &result {
            self.emit(&ClientEvent::Error { path, error });
        }
        result
    }

    async fn execute(&self, path: &str, params: &[(&str, &str)]) -> Result<Envelope> {
        let url = self.build_url(path, params);

        let response = self
            .inner
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(FofaError::Protocol {
                status: Some(status.as_u16()),
                message: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Envelope::from_slice(&body)
    }

    /// Build a URL with query parameters (credentials first)
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        query
            .append_pair("email", self.inner.account.email())
            .append_pair("key", self.inner.account.key());
        for (key, value) in params {
            query.append_pair(key, value);
        }

        format!("{}{}?{}", self.inner.api_base, path, query.finish())
    }

    /// Map a reqwest failure, dropping the URL unless account debugging is on
    fn transport_error(&self, error: reqwest::Error) -> FofaError {
        let timeout = error.is_timeout();
        let error = if self.inner.account.account_debug() {
            error
        } else {
            error.without_url()
        };
        FofaError::Transport {
            message: error.to_string(),
            timeout,
        }
    }
}

impl std::fmt::Debug for FofaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FofaClient")
            .field("account", &self.inner.account)
            .field("rate_limited", &self.inner.limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a [`FofaClient`]
pub struct FofaClientBuilder {
    account: AccountConfig,
    timeout: Duration,
    user_agent: String,
    rate_limit: Option<RateLimitConfig>,
    events: Arc<dyn EventSink>,
}

impl FofaClientBuilder {
    /// Create a new builder for the given account
    #[must_use]
    pub fn new(account: AccountConfig) -> Self {
        Self {
            account,
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("fofa-rust/{}", env!("CARGO_PKG_VERSION")),
            rate_limit: None,
            events: Arc::new(TracingSink),
        }
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Throttle outgoing requests
    #[must_use]
    pub const fn rate_limit(mut self, config: RateLimitConfig) -> Self {
        self.rate_limit = Some(config);
        self
    }

    /// Replace the default `tracing` event sink
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.events = sink;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<FofaClient> {
        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| FofaError::Config(format!("failed to build HTTP client: {e}")))?;

        let limiter = self.rate_limit.map(|config| {
            let quota = Quota::per_second(
                NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN),
            )
            .allow_burst(NonZeroU32::new(config.burst_size).unwrap_or(NonZeroU32::MIN));
            RateLimiter::direct(quota)
        });

        Ok(FofaClient {
            inner: Arc::new(ClientInner {
                http,
                api_base: self.account.api_base(),
                account: self.account,
                limiter,
                events: self.events,
            }),
        })
    }

    /// Build the client and check the account against `info/my`.
    ///
    /// Fails when the server is unreachable or rejects the credentials, so a
    /// bad key surfaces here instead of on the first search. The request
    /// goes through the configured event sink like any other.
    pub async fn connect(self) -> Result<FofaClient> {
        let client = self.build()?;
        client.account().info().await?;
        Ok(client)
    }
}
