//! `fofa stats` - Aggregate a query by field.

use anyhow::Result;
use colored::Colorize;
use fofa::StatsResult;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::cli::args::StatsArgs;
use crate::output::{print_structured, OutputFormat};

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "Value")]
    name: String,
    #[tabled(rename = "Code")]
    name_code: String,
}

pub async fn execute(ctx: Context, args: StatsArgs) -> Result<()> {
    let client = ctx.client()?;

    let mut builder = client.search().stats(&args.query).fields(args.fields.iter().cloned());
    if let Some(size) = args.size {
        builder = builder.size(size);
    }
    let stats = builder.send().await?;

    match ctx.output_format {
        OutputFormat::Pretty => print_stats_pretty(&stats, &args),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout().lock());
            writer.write_record(["dimension", "value", "count"])?;
            for (dimension, buckets) in sorted(&stats) {
                for bucket in buckets {
                    let count = bucket.count.to_string();
                    writer.write_record([dimension, bucket.name.as_str(), count.as_str()])?;
                }
            }
            writer.flush()?;
        }
        format => print_structured(format, &stats)?,
    }

    Ok(())
}

/// Dimensions in name order, skipping empty ones
fn sorted(stats: &StatsResult) -> Vec<(&str, &[fofa::AggBucket])> {
    let mut dims: Vec<_> = stats
        .aggs
        .iter()
        .filter(|(_, buckets)| !buckets.is_empty())
        .map(|(name, buckets)| (name.as_str(), buckets.as_slice()))
        .collect();
    dims.sort_by_key(|(name, _)| *name);
    dims
}

fn print_stats_pretty(stats: &StatsResult, args: &StatsArgs) {
    println!("{} {}", "Query:".bold(), args.query.dimmed());
    if let Some(updated) = &stats.last_update_time {
        println!("{} {}", "Last update:".bold(), updated);
    }

    let mut distinct: Vec<_> = stats.distinct.iter().collect();
    distinct.sort();
    for (name, count) in distinct {
        println!("{} {} {}", "Distinct".bold(), name.yellow(), count.to_string().cyan());
    }

    for (dimension, buckets) in sorted(stats) {
        println!();
        println!("{} {}:", "Field:".bold(), dimension.yellow());
        let rows: Vec<BucketRow> = buckets
            .iter()
            .map(|b| BucketRow {
                count: b.count,
                name: b.name.chars().take(60).collect(),
                name_code: b.name_code.clone().unwrap_or_default(),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
}
