//! `fofa account` - Account and quota information.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::output::{print_structured, OutputFormat};

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let info = client.account().info().await?;

    match ctx.output_format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
            writer.write_record(["email", "vip_level", "fcoin", "remain_api_query", "remain_api_data"])?;
            writer.write_record([
                info.email.clone(),
                info.vip_level.to_string(),
                info.fcoin.to_string(),
                info.remain_api_query.to_string(),
                info.remain_api_data.to_string(),
            ])?;
            writer.flush()?;
        }
        OutputFormat::Pretty => {
            println!("{}", "Account".bold().underline());
            println!();
            println!("  {} {}", "Email:".bold(), info.email);
            if let Some(name) = &info.username {
                println!("  {} {}", "Username:".bold(), name);
            }
            println!("  {} {}", "Membership:".bold(), info.vip_level);
            println!("  {} {}", "F coins:".bold(), info.fcoin);

            let query_color = if info.remain_api_query > 50 {
                "green"
            } else if info.remain_api_query > 0 {
                "yellow"
            } else {
                "red"
            };
            println!(
                "  {} {}",
                "Queries left:".bold(),
                info.remain_api_query.to_string().color(query_color)
            );
            println!("  {} {}", "Rows left:".bold(), info.remain_api_data);

            if !info.has_query_quota() {
                println!();
                println!("{}", "Query quota exhausted; searches will fail until it resets".yellow());
            }
        }
        format => print_structured(format, &info)?,
    }

    Ok(())
}
