//! `fofa config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;
use fofa::AccountConfig;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load(&ctx.config_path)?;

    // Never print the key
    let url = config
        .url
        .as_deref()
        .map(AccountConfig::parse)
        .transpose()?
        .map(|a| format!("{} ({})", a.server(), a.email()));

    match ctx.output_format {
        OutputFormat::Json => {
            let shown = serde_json::json!({
                "url": url,
                "output_format": config.output_format,
            });
            println!("{}", serde_json::to_string_pretty(&shown)?);
        }
        _ => {
            println!("{}", "Current Configuration:".bold());
            println!();
            println!(
                "  {} {}",
                "url:".bold(),
                url.unwrap_or_else(|| "(not set)".dimmed().to_string())
            );
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
        }
    }

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;

    match key {
        "url" => {
            let account = AccountConfig::parse(value)?;
            if !account.has_credentials() {
                anyhow::bail!("URL must carry both email and key");
            }
            config.url = Some(value.to_string());
            println!("{} account URL set.", "Success:".green().bold());
        }
        "output_format" | "output" => {
            config.output_format = Some(value.parse()?);
            println!("{} Output format set to {}.", "Success:".green().bold(), value.cyan());
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 url              - Account URL with email and key\n  \
                 output_format    - Default output format (pretty/json/csv/yaml)"
            );
        }
    }

    config.save(&ctx.config_path)?;

    Ok(())
}
