//! `fofa dump` - Stream a whole result set through `search/next`.

use anyhow::{Context as _, Result};
use colored::Colorize;
use fofa::{CursorToken, FieldList, FofaError, RetryConfig};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;
use tracing::{info, warn};

use super::Context;
use crate::cli::args::DumpArgs;
use crate::output::{OutputFormat, RowWriter};

pub async fn execute(ctx: Context, args: DumpArgs) -> Result<()> {
    let out: Box<dyn Write> = match &args.out {
        Some(path) => {
            let path = shellexpand::tilde(path).into_owned();
            let file = File::create(&path).with_context(|| format!("creating {path}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    // Dumps stream; a table would have to buffer everything
    let format = match ctx.output_format {
        OutputFormat::Pretty => OutputFormat::Csv,
        other => other,
    };

    let client = ctx.client()?;
    let fields = FieldList::parse(&args.fields);
    let mut request = client
        .search()
        .next(&args.query)
        .fields(fields.as_slice())
        .size(args.batch_size)
        .full(args.full);
    if let Some(cursor) = &args.cursor {
        request = request.cursor(cursor.as_str());
    }
    let mut pager = request.paginate();

    let retry = RetryConfig::new()
        .max_retries(args.retries)
        .initial_backoff(Duration::from_secs(1));
    let limit = args.limit.unwrap_or(usize::MAX);

    let pb = progress_bar(args.out.is_some() || ctx.verbose);
    let mut writer = RowWriter::new(format, pager.fields().clone(), out)?;
    let mut written = 0usize;
    let mut sized = false;
    // Set when the limit cut a page short: the cursor that page was fetched
    // with, and how many of its rows were written
    let mut cut: Option<(Option<CursorToken>, usize)> = None;

    while written < limit {
        let before = pager.cursor().cloned();
        let page = match pager.next_page_with_retry(&retry).await {
            Ok(Some(page)) => page,
            Ok(None) => break,
            Err(e) => {
                pb.abandon();
                if let Some(cursor) = pager.cursor() {
                    eprintln!(
                        "{} resume with --cursor '{}'",
                        "Interrupted:".yellow().bold(),
                        cursor
                    );
                }
                return Err(finish_after_error(writer, e));
            }
        };

        if !sized {
            pb.set_length(page.total().min(limit as u64));
            sized = true;
        }

        let available = page.len();
        let take = available.min(limit - written);
        for row in page.rows.into_iter().take(take) {
            writer.write(row)?;
            written += 1;
        }
        if take < available {
            cut = Some((before, take));
        }
        pb.set_position(written as u64);
    }
    writer.finish()?;
    pb.finish_and_clear();

    info!(rows = written, pages = pager.pages_fetched(), "dump finished");
    match cut {
        Some((Some(cursor), skip)) => warn!(
            cursor = %cursor,
            "stopped at limit partway through a page; resume with this cursor and skip the first {skip} rows"
        ),
        Some((None, skip)) => warn!(
            "stopped at limit partway through the first page; rerun without --cursor and skip the first {skip} rows"
        ),
        None if written >= limit && !pager.state().is_terminal() => {
            if let Some(cursor) = pager.cursor() {
                warn!(cursor = %cursor, "stopped at limit; more results are available");
            }
        }
        None => {}
    }
    Ok(())
}

/// Flush rows written before a failure; a flush error is logged so it
/// cannot replace the error that stopped the dump.
fn finish_after_error<W: Write>(writer: RowWriter<W>, error: FofaError) -> anyhow::Error {
    if let Err(flush) = writer.finish() {
        warn!(error = %flush, "could not flush rows written before the failure");
    }
    error.into()
}

/// Progress on stderr; shown when rows go to a file or with `--verbose`.
fn progress_bar(visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  {spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} rows {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
