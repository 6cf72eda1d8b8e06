//! `fofa host` - Aggregated view of an IP or domain.

use anyhow::Result;
use colored::Colorize;
use fofa::HostInfo;

use super::Context;
use crate::cli::args::HostArgs;
use crate::output::{print_structured, OutputFormat};

pub async fn execute(ctx: Context, args: HostArgs) -> Result<()> {
    let client = ctx.client()?;
    let host = client.host().target(&args.target).detail(args.detail).send().await?;

    match ctx.output_format {
        OutputFormat::Pretty => print_host_pretty(&host),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
            writer.write_record(["host", "ip", "asn", "org", "country", "ports"])?;
            let ports: Vec<String> = host.port.iter().map(ToString::to_string).collect();
            let ports = ports.join(";");
            let asn = host.asn.map(|a| a.to_string()).unwrap_or_default();
            writer.write_record([
                host.host.as_str(),
                host.ip.as_str(),
                asn.as_str(),
                host.org.as_deref().unwrap_or(""),
                host.country_code.as_deref().unwrap_or(""),
                ports.as_str(),
            ])?;
            writer.flush()?;
        }
        format => print_structured(format, &host)?,
    }

    Ok(())
}

fn print_host_pretty(host: &HostInfo) {
    println!("{} {}", "Host:".bold(), host.host.cyan().bold());
    println!();

    if !host.ip.is_empty() && host.ip != host.host {
        println!("  {} {}", "IP:".bold(), host.ip);
    }
    if let Some(org) = &host.org {
        println!("  {} {}", "Organization:".bold(), org);
    }
    if let Some(asn) = host.asn {
        println!("  {} AS{}", "ASN:".bold(), asn);
    }
    if let Some(country) = &host.country_name {
        let code = host.country_code.as_deref().unwrap_or("");
        println!("  {} {} {}", "Country:".bold(), country, code.dimmed());
    }

    let lists = [
        ("Ports:", host.port.iter().map(ToString::to_string).collect::<Vec<_>>()),
        ("Protocols:", host.protocol.clone()),
        ("Products:", host.product.clone()),
        ("Categories:", host.category.clone()),
    ];
    for (label, values) in lists {
        if !values.is_empty() {
            println!("  {} {}", label.bold(), values.join(", "));
        }
    }

    if let Some(update) = &host.update_time {
        println!();
        println!("{}", format!("Last updated: {update}").dimmed());
    }
}
