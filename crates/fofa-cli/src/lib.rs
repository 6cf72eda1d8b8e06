//! # fofa-cli
//!
//! Command-line interface for the FOFA cyberspace search engine.
//!
//! ## Features
//!
//! - **Search**: one page from `search/all`, or several with `--limit`
//! - **Dump**: every row of a query through cursor pagination, resumable
//! - **Stats and host**: aggregations and per-host summaries
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod output;

pub use cli::run;
