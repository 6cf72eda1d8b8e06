//! `fofa search` - Run a page-number search.

use anyhow::Result;
use colored::Colorize;
use fofa::{FieldList, SearchResults};

use super::Context;
use crate::cli::args::SearchArgs;
use crate::output::{OutputFormat, RowWriter};

pub async fn execute(ctx: Context, args: SearchArgs) -> Result<()> {
    let client = ctx.client()?;
    let fields = FieldList::parse(&args.fields);

    // Build the search request
    let builder = client
        .search()
        .query(&args.query)
        .fields(fields.as_slice())
        .size(args.size)
        .page(args.page)
        .full(args.full);

    let results = match args.limit {
        Some(limit) => builder.fetch(limit).await?,
        None => builder.send().await?,
    };

    let pretty = ctx.output_format == OutputFormat::Pretty;
    if pretty {
        print_summary(&results, &args);
    }

    let more = args.limit.is_none() && results.total() > results.len() as u64;
    let stdout = std::io::stdout().lock();
    let mut writer = RowWriter::new(ctx.output_format, results.fields.clone(), stdout)?;
    for row in results.rows {
        writer.write(row)?;
    }
    writer.finish()?;

    if pretty && more {
        println!();
        println!(
            "{}",
            format!(
                "Tip: Use --page {} or `fofa dump` to see more results",
                args.page + 1
            )
            .dimmed()
        );
    }
    Ok(())
}

fn print_summary(results: &SearchResults, args: &SearchArgs) {
    println!("{} {}", "Total Results:".bold(), results.total().to_string().cyan());
    println!("{} {}", "Query:".bold(), args.query.dimmed());
    if let Some(mode) = &results.mode {
        println!("{} {}", "Mode:".bold(), mode);
    }
    println!();

    if results.is_empty() {
        println!("{}", "No results.".dimmed());
    }
}
