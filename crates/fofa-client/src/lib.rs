//! HTTP client for the FOFA search API.
//!
//! This crate provides the main [`FofaClient`] and the cursor
//! [`NextPaginator`](api::NextPaginator) that turns `search/next` into one
//! lazy sequence of rows.

#![doc(html_root_url = "https://docs.rs/fofa-client/0.3.0")]

mod client;
mod config;
pub mod api;
pub mod events;

pub use api::{NextPaginator, PaginatorState};
pub use client::{FofaClient, FofaClientBuilder};
pub use config::*;
pub use events::{ClientEvent, EventSink, NoopSink, TracingSink};
pub use fofa_core::{FofaError, Result};
