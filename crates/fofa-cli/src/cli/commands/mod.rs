//! Command implementations.

pub mod account;
pub mod config;
pub mod dump;
pub mod host;
pub mod search;
pub mod stats;

use fofa::{AccountConfig, FofaClient};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved account
    pub account: AccountConfig,

    /// Output format
    pub output_format: OutputFormat,

    /// Config file in use
    pub config_path: PathBuf,

    /// Verbose output
    pub verbose: bool,
}

impl Context {
    /// Create a FOFA client, failing early if no credentials are known.
    pub fn client(&self) -> anyhow::Result<FofaClient> {
        if !self.account.has_credentials() {
            anyhow::bail!(
                "FOFA credentials required.\n\n\
                 Set them with one of:\n  \
                 1. --url 'https://fofa.info/?email=<EMAIL>&key=<KEY>&version=v1'\n  \
                 2. FOFA_CLIENT_URL, or FOFA_EMAIL and FOFA_KEY environment variables\n  \
                 3. fofa config set url '<URL>'"
            );
        }
        Ok(FofaClient::new(self.account.clone())?)
    }
}
