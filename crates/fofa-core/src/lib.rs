//! Core types, errors and response decoding for the FOFA API client.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Types**: [`Page`], [`ResultRow`], [`FieldList`], [`CursorToken`] and
//!   the stats/host/account payloads
//! - **Errors**: the [`FofaError`] taxonomy, including the mapping of the
//!   server's bracketed error codes
//! - **Decoding**: [`Envelope`] unwrapping and [`decode_page`], which
//!   normalizes the shapes the `results` field arrives in
//!
//! # Example
//!
//! ```rust
//! use fofa_core::{Envelope, FieldList};
//!
//! let body = br#"{"error":false,"size":1,"results":[["94.130.128.248","80"]]}"#;
//! let page = Envelope::from_slice(body)
//!     .and_then(|env| env.into_page(&FieldList::parse("ip,port")))
//!     .unwrap();
//! assert_eq!(page.rows[0].get(1), Some("80"));
//! ```

#![doc(html_root_url = "https://docs.rs/fofa-core/0.3.0")]

mod decode;
mod envelope;
mod error;
pub mod types;

pub use decode::decode_page;
pub use envelope::Envelope;
pub use error::{FofaError, Result};
pub use types::*;
