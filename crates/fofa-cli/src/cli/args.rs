//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Command-line client for the FOFA cyberspace search engine
///
/// Search assets, dump large result sets, aggregate and look up hosts.
///
/// The account is read from --url, then FOFA_CLIENT_URL, then
/// FOFA_SERVER/FOFA_EMAIL/FOFA_KEY, then the `url` key of the config file.
#[derive(Parser, Debug)]
#[command(name = "fofa")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Account URL, e.g. https://fofa.info/?email=you@example.com&key=KEY&version=v1
    #[arg(short = 'u', long, env = "FOFA_CLIENT_URL", global = true, hide_env_values = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print request URLs (with credentials) in transport errors
    #[arg(long, global = true)]
    pub account_debug: bool,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a search and print one page of results
    Search(SearchArgs),

    /// Stream every result of a query using cursor pagination
    Dump(DumpArgs),

    /// Aggregate a query by one or more fields
    Stats(StatsArgs),

    /// Show the aggregated view of an IP or domain
    Host(HostArgs),

    /// Show account information and remaining quota
    Account,

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Search command
// ============================================================================

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// FOFA query (e.g., 'port="80" && country="CN"')
    pub query: String,

    /// Comma-separated output fields
    #[arg(short, long, default_value = "ip,port")]
    pub fields: String,

    /// Rows per page
    #[arg(short, long, default_value = "100")]
    pub size: u32,

    /// Page number (1-indexed)
    #[arg(short, long, default_value = "1")]
    pub page: u32,

    /// Collect rows across pages until this many are gathered
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Search all data, not only the most recent year
    #[arg(long)]
    pub full: bool,
}

// ============================================================================
// Dump command
// ============================================================================

#[derive(Args, Debug)]
pub struct DumpArgs {
    /// FOFA query
    pub query: String,

    /// Comma-separated output fields
    #[arg(short, long, default_value = "ip,port")]
    pub fields: String,

    /// Rows per request
    #[arg(short, long, default_value = "1000")]
    pub batch_size: u32,

    /// Stop after this many rows
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Search all data, not only the most recent year
    #[arg(long)]
    pub full: bool,

    /// Resume from a cursor printed by an earlier run
    #[arg(long, value_name = "TOKEN")]
    pub cursor: Option<String>,

    /// Retries per page on network errors
    #[arg(long, default_value = "3")]
    pub retries: u32,

    /// Write rows to this file instead of stdout (`~` is expanded)
    #[arg(long = "out", value_name = "FILE")]
    pub out: Option<String>,
}

// ============================================================================
// Stats command
// ============================================================================

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// FOFA query
    pub query: String,

    /// Fields to aggregate by (e.g., title, country, port)
    #[arg(short, long, value_delimiter = ',', default_value = "title")]
    pub fields: Vec<String>,

    /// Buckets per field
    #[arg(short, long)]
    pub size: Option<u32>,
}

// ============================================================================
// Host command
// ============================================================================

#[derive(Args, Debug)]
pub struct HostArgs {
    /// IP address or domain to look up
    pub target: String,

    /// Include per-port detail
    #[arg(long)]
    pub detail: bool,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (url, output_format)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_stats_fields_split_on_commas() {
        let cli = Cli::try_parse_from(["fofa", "stats", "port=80", "-f", "title,country"]).unwrap();
        match cli.command {
            Commands::Stats(args) => assert_eq!(args.fields, ["title", "country"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["fofa", "account", "-o", "json", "-v"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.verbose);
    }
}
