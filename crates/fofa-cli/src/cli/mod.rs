//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use fofa::{AccountConfig, ENV_CLIENT_URL, ENV_EMAIL, ENV_KEY, ENV_SERVER};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration
    let config_path = Config::path(cli.config.as_deref())?;
    let config = Config::load(&config_path)?;

    // Determine output format
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    // Account from flag, environment, or config file
    let account = resolve_account(cli.url.as_deref(), &config, |name| std::env::var(name).ok())?
        .with_account_debug(cli.account_debug);

    // Create context for commands
    let ctx = commands::Context {
        account,
        output_format,
        config_path,
        verbose: cli.verbose,
    };

    // Dispatch to appropriate command
    match cli.command {
        Commands::Search(args) => commands::search::execute(ctx, args).await,
        Commands::Dump(args) => commands::dump::execute(ctx, args).await,
        Commands::Stats(args) => commands::stats::execute(ctx, args).await,
        Commands::Host(args) => commands::host::execute(ctx, args).await,
        Commands::Account => commands::account::execute(ctx).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
    }
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        "fofa_client=debug,fofa_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Pick the account: `--url` (or `FOFA_CLIENT_URL`, which clap folds into
/// it), then the split environment variables, then the config file.
fn resolve_account<F>(explicit: Option<&str>, config: &Config, env: F) -> Result<AccountConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let from_env = [ENV_CLIENT_URL, ENV_SERVER, ENV_EMAIL, ENV_KEY]
        .iter()
        .any(|name| env(name).is_some_and(|v| !v.trim().is_empty()));

    let explicit = explicit
        .filter(|u| !u.trim().is_empty())
        .or_else(|| if from_env { None } else { config.url.as_deref() });

    Ok(AccountConfig::resolve(explicit, env)?)
}
