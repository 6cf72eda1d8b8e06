//! Search payload decoding.
//!
//! `results` arrives in one of three shapes:
//!
//! - a list of bare strings (single-field requests, and some multi-field
//!   responses the server flattens)
//! - a list of row tuples (`[["1.1.1.1","80"], ...]`)
//! - something that is not a list at all, which the server sometimes sends
//!   with `error: false` when it mishandles the size parameter
//!
//! The shape is resolved once per payload through [`RawResults`].

use crate::envelope::kind_of;
use crate::{CursorToken, FieldList, FofaError, Page, ResultRow, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawResults {
    Rows(Vec<RawRow>),
    Other(Value),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRow {
    Flat(String),
    Tuple(Vec<Value>),
}

impl From<RawRow> for ResultRow {
    fn from(raw: RawRow) -> Self {
        match raw {
            RawRow::Flat(value) => Self::new(vec![value]),
            RawRow::Tuple(values) => Self::new(values.into_iter().map(cell_text).collect()),
        }
    }
}

/// Render one tuple cell as text; strings pass through untouched.
fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode a successful search payload into a [`Page`].
///
/// `size` is the server's estimate of all matches, not the row count of
/// this page.
pub fn decode_page(mut payload: Map<String, Value>, fields: &FieldList) -> Result<Page> {
    let results = payload
        .remove("results")
        .ok_or_else(|| FofaError::MalformedResults("payload has no `results` field".into()))?;

    let rows = match serde_json::from_value::<RawResults>(results)? {
        RawResults::Rows(rows) => rows.into_iter().map(ResultRow::from).collect(),
        RawResults::Other(value) => {
            return Err(FofaError::MalformedResults(match &value {
                Value::Array(_) => "`results` contains rows that are neither strings nor lists".into(),
                other => format!("`results` is {}, expected a list", kind_of(other)),
            }));
        }
    };

    Ok(Page {
        rows,
        size: payload.get("size").and_then(Value::as_u64).unwrap_or(0),
        page: payload
            .get("page")
            .and_then(Value::as_u64)
            .and_then(|p| u32::try_from(p).ok()),
        mode: string_field(&payload, "mode"),
        query: string_field(&payload, "query"),
        next: next_token(&payload)?,
        fields: fields.clone(),
    })
}

/// The `next` cursor. Absent or `null` means no cursor; any value that is
/// not a string breaks the contract and must not read as exhaustion.
fn next_token(payload: &Map<String, Value>) -> Result<Option<CursorToken>> {
    match payload.get("next") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(token)) => Ok(Some(CursorToken::from(token.clone()))),
        Some(other) => Err(FofaError::MalformedResults(format!(
            "`next` is {}, expected a string",
            kind_of(other)
        ))),
    }
}

fn string_field(payload: &Map<String, Value>, key: &str) -> Option<String> {
    payload.get(key).and_then(Value::as_str).map(String::from)
}
