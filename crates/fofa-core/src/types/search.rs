use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields requested when the caller does not pick any
pub const DEFAULT_FIELDS: [&str; 2] = ["ip", "port"];

/// Ordered list of output fields requested from the search endpoints.
///
/// The order decides the column order of every [`ResultRow`] returned for
/// the request. An empty list falls back to [`DEFAULT_FIELDS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldList(Vec<String>);

impl FieldList {
    /// Build a field list, trimming names and dropping blanks
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let fields: Vec<String> = fields
            .into_iter()
            .map(|f| f.as_ref().trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        if fields.is_empty() {
            Self::default()
        } else {
            Self(fields)
        }
    }

    /// Parse a comma-separated list such as `host,ip,port`
    #[must_use]
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    /// Number of requested fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; an empty list is replaced by the defaults
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Position of a field in each row
    #[must_use]
    pub fn index_of(&self, field: &str) -> Option<usize> {
        self.0.iter().position(|f| f == field)
    }

    /// The field names in request order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Wire form: comma-joined field names
    #[must_use]
    pub fn to_param(&self) -> String {
        self.0.join(",")
    }
}

impl Default for FieldList {
    fn default() -> Self {
        Self(DEFAULT_FIELDS.iter().map(|f| (*f).to_string()).collect())
    }
}

impl fmt::Display for FieldList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

/// One result row; values follow the order of the request's [`FieldList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultRow(Vec<String>);

impl ResultRow {
    /// Build a row from its values
    #[must_use]
    pub fn new(values: Vec<String>) -> Self {
        Self(values)
    }

    /// Value at a column index
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Value of a named field, resolved against the request's field list
    #[must_use]
    pub fn field(&self, fields: &FieldList, name: &str) -> Option<&str> {
        fields.index_of(name).and_then(|i| self.get(i))
    }

    /// Number of values in the row
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the row has no values
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All values in column order
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.0
    }

    /// Take ownership of the values
    #[must_use]
    pub fn into_values(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for ResultRow {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl<const N: usize> From<[&str; N]> for ResultRow {
    fn from(values: [&str; N]) -> Self {
        Self(values.iter().map(|v| (*v).to_string()).collect())
    }
}

/// Opaque continuation token issued by `search/next`.
///
/// The token is forwarded exactly as received. An empty token marks the end
/// of the result set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CursorToken(String);

impl CursorToken {
    /// Wrap a token string
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the server signalled there are no more pages
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CursorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CursorToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for CursorToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// One page of search results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Rows in this page
    pub rows: Vec<ResultRow>,

    /// Total server-estimated number of matches for the query
    pub size: u64,

    /// Page number echoed by `search/all`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Search mode reported by the server (e.g. `extended`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Query echoed by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    /// Continuation token (only on `search/next`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<CursorToken>,

    /// Fields the rows were requested with
    pub fields: FieldList,
}

/// Results of a page-number search on `search/all`
pub type SearchResults = Page;

impl Page {
    /// Returns true if there are no rows in this page
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows in this page
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Total number of matches, as estimated by the server
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.size
    }

    /// Returns true if this page carries an exhausted (empty) cursor
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next.as_ref().map_or(true, CursorToken::is_exhausted)
    }

    /// Collect one named column across all rows
    #[must_use]
    pub fn column(&self, name: &str) -> Vec<&str> {
        self.fields.index_of(name).map_or_else(Vec::new, |i| {
            self.rows.iter().filter_map(|r| r.get(i)).collect()
        })
    }
}
