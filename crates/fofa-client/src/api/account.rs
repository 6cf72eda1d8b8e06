//! Account API endpoints.

use crate::FofaClient;
use fofa_core::{AccountInfo, Result};

/// Account API endpoints
pub struct AccountApi<'a> {
    client: &'a FofaClient,
}

impl<'a> AccountApi<'a> {
    pub(crate) const fn new(client: &'a FofaClient) -> Self {
        Self { client }
    }

    /// Get membership tier and remaining quota (`info/my`)
    pub async fn info(&self) -> Result<AccountInfo> {
        self.client.get_envelope("/info/my", &[]).await?.into_typed()
    }
}
