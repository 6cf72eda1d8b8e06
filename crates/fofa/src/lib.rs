//! Rust client for the FOFA cyberspace search API.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fofa::{AccountConfig, FofaClient};
//! use fofa::futures_util::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> fofa::Result<()> {
//!     let client = FofaClient::new(AccountConfig::from_env()?)?;
//!
//!     // One page of results
//!     let page = client.search()
//!         .query(r#"port="80""#)
//!         .fields(["ip", "port", "title"])
//!         .size(10)
//!         .send()
//!         .await?;
//!     println!("{} matches", page.total());
//!
//!     // Every row of a cursor search
//!     let mut rows = std::pin::pin!(client.search()
//!         .next(r#"title="nginx""#)
//!         .fields(["host", "ip"])
//!         .paginate()
//!         .into_rows());
//!     while let Some(row) = rows.next().await {
//!         println!("{:?}", row?.values());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - Uses rustls for TLS
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS

#![doc(html_root_url = "https://docs.rs/fofa/0.3.0")]

// Re-export core types
pub use fofa_core::*;

// Re-export client
pub use fofa_client::{
    api, events, AccountConfig, ClientEvent, EventSink, FofaClient, FofaClientBuilder,
    NextPaginator, NoopSink, PaginatorState, RateLimitConfig, RetryConfig, TracingSink,
    DEFAULT_API_VERSION, DEFAULT_SERVER, ENV_CLIENT_URL, ENV_EMAIL, ENV_KEY, ENV_SERVER,
};

// Re-export runtime for convenience
pub use futures_util;
pub use serde;
pub use serde_json;
pub use tokio;
