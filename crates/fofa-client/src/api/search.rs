//! Search API endpoints.

use super::{encode_query, NextRequestBuilder};
use crate::events::ClientEvent;
use crate::FofaClient;
use fofa_core::{FieldList, Page, Result, SearchResults, StatsResult};

/// Rows per page when the caller does not choose
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page the server accepts on `search/all`
pub const MAX_PAGE_SIZE: u32 = 10_000;

const SEARCH_ALL: &str = "/search/all";
const SEARCH_STATS: &str = "/search/stats";

/// Search API endpoints
pub struct SearchApi<'a> {
    client: &'a FofaClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) const fn new(client: &'a FofaClient) -> Self {
        Self { client }
    }

    /// Page-number search on `search/all`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let page = client.search()
    ///     .query(r#"port="80""#)
    ///     .fields(["ip", "port"])
    ///     .size(10)
    ///     .send()
    ///     .await?;
    /// println!("{} of {} rows", page.len(), page.size);
    /// ```
    #[must_use]
    pub fn query(&self, query: impl Into<String>) -> SearchRequestBuilder<'a> {
        SearchRequestBuilder::new(self.client, query.into())
    }

    /// Aggregations over a query on `search/stats`
    #[must_use]
    pub fn stats(&self, query: impl Into<String>) -> StatsRequestBuilder<'a> {
        StatsRequestBuilder::new(self.client, query.into())
    }

    /// Cursor search on `search/next`
    #[must_use]
    pub fn next(&self, query: impl Into<String>) -> NextRequestBuilder<'a> {
        NextRequestBuilder::new(self.client, query.into())
    }
}

/// Builder for `search/all` requests
pub struct SearchRequestBuilder<'a> {
    client: &'a FofaClient,
    query: String,
    fields: FieldList,
    size: u32,
    page: u32,
    full: bool,
}

impl<'a> SearchRequestBuilder<'a> {
    fn new(client: &'a FofaClient, query: String) -> Self {
        Self {
            client,
            query,
            fields: FieldList::default(),
            size: DEFAULT_PAGE_SIZE,
            page: 1,
            full: false,
        }
    }

    /// Set the output fields; an empty list keeps the defaults
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fields = FieldList::new(fields);
        self
    }

    /// Set rows per page
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Set the page number (1-indexed)
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Search all data instead of the most recent year only
    #[must_use]
    pub const fn full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    /// Execute the search for the configured page
    pub async fn send(self) -> Result<SearchResults> {
        let qbase64 = encode_query(&self.query);
        fetch_page(self.client, &qbase64, &self.fields, self.size, self.page, self.full).await
    }

    /// Walk pages from the configured one until `limit` rows are collected.
    ///
    /// Stops early on a short page or when the server's total is reached.
    /// The returned page carries every collected row and the last total.
    pub async fn fetch(self, limit: usize) -> Result<SearchResults> {
        let qbase64 = encode_query(&self.query);
        let per_page = u32::try_from(limit)
            .unwrap_or(u32::MAX)
            .min(self.size)
            .clamp(1, MAX_PAGE_SIZE);

        let mut collected = Page {
            rows: Vec::new(),
            size: 0,
            page: None,
            mode: None,
            query: None,
            next: None,
            fields: self.fields.clone(),
        };
        if limit == 0 {
            return Ok(collected);
        }

        let mut page_no = self.page.max(1);
        loop {
            let page = fetch_page(self.client, &qbase64, &self.fields, per_page, page_no, self.full)
                .await?;
            let short = page.len() < per_page as usize;

            collected.size = page.size;
            collected.page = Some(page_no);
            collected.mode = page.mode;
            collected.query = page.query;
            collected.rows.extend(page.rows);

            let reached_total = collected.rows.len() as u64 >= collected.size;
            if short || reached_total || collected.rows.len() >= limit {
                break;
            }
            page_no += 1;
        }

        collected.rows.truncate(limit);
        Ok(collected)
    }
}

async fn fetch_page(
    client: &FofaClient,
    qbase64: &str,
    fields: &FieldList,
    size: u32,
    page: u32,
    full: bool,
) -> Result<Page> {
    let fields_param = fields.to_param();
    let size_str = size.to_string();
    let page_str = page.to_string();
    let params = [
        ("qbase64", qbase64),
        ("fields", fields_param.as_str()),
        ("size", size_str.as_str()),
        ("page", page_str.as_str()),
        ("full", if full { "true" } else { "false" }),
    ];

    let page = client
        .get_envelope(SEARCH_ALL, &params)
        .await?
        .into_page(fields);

    match &page {
        Ok(p) => client.emit(&ClientEvent::PageFetched {
            path: SEARCH_ALL,
            rows: p.len(),
            total: p.size,
            exhausted: true,
        }),
        Err(error) => client.emit(&ClientEvent::Error {
            path: SEARCH_ALL,
            error,
        }),
    }
    page
}

/// Builder for `search/stats` requests
pub struct StatsRequestBuilder<'a> {
    client: &'a FofaClient,
    query: String,
    fields: Vec<String>,
    size: Option<u32>,
}

impl<'a> StatsRequestBuilder<'a> {
    const fn new(client: &'a FofaClient, query: String) -> Self {
        Self {
            client,
            query,
            fields: Vec::new(),
            size: None,
        }
    }

    /// Add an aggregation dimension (e.g. `title`, `country`)
    #[must_use]
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Add multiple aggregation dimensions
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Set the number of buckets per dimension
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    /// Execute the stats request
    pub async fn send(self) -> Result<StatsResult> {
        let qbase64 = encode_query(&self.query);
        let mut params = vec![("qbase64", qbase64.as_str())];

        let fields_str = self.fields.join(",");
        if !self.fields.is_empty() {
            params.push(("fields", &fields_str));
        }

        let size_str = self.size.map(|s| s.to_string());
        if let Some(size) = &size_str {
            params.push(("size", size));
        }

        self.client
            .get_envelope(SEARCH_STATS, &params)
            .await?
            .into_typed()
    }
}
