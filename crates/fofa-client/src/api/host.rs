//! Host aggregation endpoints.

use crate::FofaClient;
use fofa_core::{HostInfo, Result};

/// Host API endpoints
pub struct HostApi<'a> {
    client: &'a FofaClient,
}

impl<'a> HostApi<'a> {
    pub(crate) const fn new(client: &'a FofaClient) -> Self {
        Self { client }
    }

    /// Get the aggregated view of an IP or domain
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let host = client.host().lookup("1.1.1.1").await?;
    /// println!("Ports: {:?}", host.port);
    /// ```
    pub async fn lookup(&self, target: &str) -> Result<HostInfo> {
        self.target(target).send().await
    }

    /// Host lookup with options
    #[must_use]
    pub fn target(&self, target: impl Into<String>) -> HostRequestBuilder<'a> {
        HostRequestBuilder::new(self.client, target.into())
    }
}

/// Builder for host requests with options
pub struct HostRequestBuilder<'a> {
    client: &'a FofaClient,
    target: String,
    detail: bool,
}

impl<'a> HostRequestBuilder<'a> {
    const fn new(client: &'a FofaClient, target: String) -> Self {
        Self {
            client,
            target,
            detail: false,
        }
    }

    /// Ask for per-port detail
    #[must_use]
    pub const fn detail(mut self, detail: bool) -> Self {
        self.detail = detail;
        self
    }

    /// Execute the request
    pub async fn send(self) -> Result<HostInfo> {
        let segment: String = url::form_urlencoded::byte_serialize(self.target.as_bytes()).collect();

        let mut params = Vec::new();
        if self.detail {
            params.push(("detail", "true"));
        }

        self.client
            .get_envelope(&format!("/host/{segment}"), &params)
            .await?
            .into_typed()
    }
}
