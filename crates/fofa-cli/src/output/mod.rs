//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use fofa::{FieldList, ResultRow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::Write;
use std::str::FromStr;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output; rows are written one object per line
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {s}\n\
                 Valid formats: pretty, json, csv, yaml"
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Writes result rows incrementally in one format.
///
/// CSV and JSON rows are written as they arrive so a long dump can be
/// piped. Pretty and YAML output are buffered and rendered by
/// [`RowWriter::finish`].
pub struct RowWriter<W: Write> {
    format: OutputFormat,
    fields: FieldList,
    out: RowSink<W>,
    buffered: Vec<ResultRow>,
}

enum RowSink<W: Write> {
    Csv(csv::Writer<W>),
    Plain(W),
}

impl<W: Write> RowWriter<W> {
    /// Create a writer; CSV output gets its header immediately.
    pub fn new(format: OutputFormat, fields: FieldList, out: W) -> Result<Self> {
        let out = if format == OutputFormat::Csv {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(fields.as_slice())?;
            RowSink::Csv(writer)
        } else {
            RowSink::Plain(out)
        };

        Ok(Self {
            format,
            fields,
            out,
            buffered: Vec::new(),
        })
    }

    /// Write one row.
    pub fn write(&mut self, row: ResultRow) -> Result<()> {
        match (&mut self.out, self.format) {
            (RowSink::Csv(writer), _) => writer.write_record(row.values())?,
            (RowSink::Plain(out), OutputFormat::Json) => {
                serde_json::to_writer(&mut *out, &row_object(&self.fields, &row))?;
                writeln!(out)?;
            }
            (RowSink::Plain(_), _) => self.buffered.push(row),
        }
        Ok(())
    }

    /// Flush and render anything buffered.
    pub fn finish(self) -> Result<()> {
        match self.out {
            RowSink::Csv(mut writer) => writer.flush()?,
            RowSink::Plain(mut out) => {
                match self.format {
                    OutputFormat::Pretty if !self.buffered.is_empty() => {
                        writeln!(out, "{}", table(&self.fields, &self.buffered))?;
                    }
                    OutputFormat::Yaml => {
                        let rows: Vec<_> = self
                            .buffered
                            .iter()
                            .map(|r| row_object(&self.fields, r))
                            .collect();
                        serde_yaml::to_writer(&mut out, &rows)?;
                    }
                    _ => {}
                }
                out.flush()?;
            }
        }
        Ok(())
    }
}

/// Pair each value with its field name.
fn row_object(fields: &FieldList, row: &ResultRow) -> Map<String, Value> {
    fields
        .as_slice()
        .iter()
        .zip(row.values())
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect()
}

/// Render rows as a rounded table with field names as the header.
pub fn table(fields: &FieldList, rows: &[ResultRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(fields.as_slice().iter().cloned());
    for row in rows {
        builder.push_record(row.values().iter().cloned());
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Print any serializable value in a machine-readable format.
pub fn print_structured<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    match format {
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        _ => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
