//! fofa - command-line client for the FOFA search API

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    fofa_cli::run().await
}
