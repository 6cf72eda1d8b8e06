//! Cursor search on `search/next`.
//!
//! Every response carries a `next` token that must be sent back verbatim
//! to get the following page; an empty token ends the result set. The
//! [`NextPaginator`] hides that protocol and hands out pages (or, through
//! [`NextPaginator::into_rows`], single rows) until the server says stop.
//!
//! Pages are fetched strictly one after another. A paginator is
//! forward-only: once it is exhausted or has failed it yields nothing more,
//! and reading the same results again takes a fresh paginator.

use super::encode_query;
use super::search::DEFAULT_PAGE_SIZE;
use crate::config::RetryConfig;
use crate::events::ClientEvent;
use crate::FofaClient;
use fofa_core::{CursorToken, FieldList, FofaError, Page, ResultRow, Result};
use futures_util::stream::{self, Stream};
use std::collections::VecDeque;

const SEARCH_NEXT: &str = "/search/next";

/// Builder for cursor searches
pub struct NextRequestBuilder<'a> {
    client: &'a FofaClient,
    query: String,
    fields: FieldList,
    size: u32,
    full: bool,
    cursor: Option<CursorToken>,
}

impl<'a> NextRequestBuilder<'a> {
    pub(crate) fn new(client: &'a FofaClient, query: String) -> Self {
        Self {
            client,
            query,
            fields: FieldList::default(),
            size: DEFAULT_PAGE_SIZE,
            full: false,
            cursor: None,
        }
    }

    /// Set the output fields for every page of this search
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

    /// Search all data instead of the most recent year only
    #[must_use]
    pub const fn full(mut self, full: bool) -> Self {
        self.full = full;
        self
    }

    /// Resume from a token returned by an earlier page
    #[must_use]
    pub fn cursor(mut self, token: impl Into<CursorToken>) -> Self {
        self.cursor = Some(token.into());
        self
    }

    /// Turn the request into a paginator; nothing is sent yet
    #[must_use]
    pub fn paginate(self) -> NextPaginator {
        NextPaginator {
            client: self.client.clone(),
            qbase64: encode_query(&self.query),
            fields: self.fields,
            size: self.size.to_string(),
            full: self.full,
            cursor: self.cursor,
            state: PaginatorState::Start,
            pages_fetched: 0,
            rows_fetched: 0,
            total: None,
        }
    }
}

/// Where a [`NextPaginator`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// Nothing fetched yet
    Start,
    /// A request is in flight (or was dropped while in flight)
    Fetching,
    /// At least one page delivered and a cursor for the next one is known
    HasPage,
    /// The server returned an empty cursor; terminal
    Exhausted,
    /// A request failed or was cancelled; terminal
    Failed,
}

impl PaginatorState {
    /// Returns true for states that yield no more pages
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Exhausted | Self::Failed)
    }
}

/// Lazy, forward-only walk over a cursor search.
///
/// The field list and query are fixed when the paginator is built.
#[derive(Debug)]
pub struct NextPaginator {
    client: FofaClient,
    qbase64: String,
    fields: FieldList,
    size: String,
    full: bool,
    cursor: Option<CursorToken>,
    state: PaginatorState,
    pages_fetched: usize,
    rows_fetched: usize,
    total: Option<u64>,
}

impl NextPaginator {
    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` once the paginator is exhausted or has failed. An
    /// error is returned exactly once and moves the paginator to
    /// [`PaginatorState::Failed`]; rows from earlier pages stay valid.
    /// If a previous call was dropped mid-request the paginator fails with
    /// [`FofaError::Cancelled`].
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        self.step(None).await
    }

    /// Like [`next_page`](Self::next_page), but re-sends the same cursor on
    /// retryable errors, backing off per `retry`, before giving up.
    pub async fn next_page_with_retry(&mut self, retry: &RetryConfig) -> Result<Option<Page>> {
        self.step(Some(retry)).await
    }

    async fn step(&mut self, retry: Option<&RetryConfig>) -> Result<Option<Page>> {
        match self.state {
            PaginatorState::Exhausted | PaginatorState::Failed => return Ok(None),
            PaginatorState::Fetching => {
                self.state = PaginatorState::Failed;
                return Err(FofaError::Cancelled);
            }
            PaginatorState::Start | PaginatorState::HasPage => {}
        }

        self.state = PaginatorState::Fetching;
        let mut attempt = 0;
        let result = loop {
            match self.fetch().await {
                Err(e) if e.is_retryable() && retry.is_some_and(|r| attempt < r.max_retries) => {
                    if let Some(r) = retry {
                        tokio::time::sleep(r.backoff_for(attempt)).await;
                    }
                    attempt += 1;
                }
                other => break other,
            }
        };

        match result {
            Ok(page) => {
                self.advance(&page);
                Ok(Some(page))
            }
            Err(e) => {
                self.state = PaginatorState::Failed;
                Err(e)
            }
        }
    }

    /// One request with the current cursor; does not touch the state.
    async fn fetch(&self) -> Result<Page> {
        let fields_param = self.fields.to_param();
        let mut params = vec![
            ("qbase64", self.qbase64.as_str()),
            ("fields", fields_param.as_str()),
            ("size", self.size.as_str()),
            ("full", if self.full { "true" } else { "false" }),
        ];
        if let Some(cursor) = &self.cursor {
            params.push(("next", cursor.as_str()));
        }

        let page = self
            .client
            .get_envelope(SEARCH_NEXT, &params)
            .await?
            .into_page(&self.fields);

        if let Err(error) = &page {
            self.client.emit(&ClientEvent::Error {
                path: SEARCH_NEXT,
                error,
            });
        }
        page
    }

    /// Record a delivered page and move to the next state.
    ///
    /// A missing `next` field is treated like an empty one.
    fn advance(&mut self, page: &Page) {
        self.pages_fetched += 1;
        self.rows_fetched += page.len();
        self.total = Some(page.size);

        match &page.next {
            Some(token) if !token.is_exhausted() => {
                self.cursor = Some(token.clone());
                self.state = PaginatorState::HasPage;
            }
            _ => self.state = PaginatorState::Exhausted,
        }

        self.client.emit(&ClientEvent::PageFetched {
            path: SEARCH_NEXT,
            rows: page.len(),
            total: page.size,
            exhausted: self.state == PaginatorState::Exhausted,
        });
    }

    /// Current lifecycle state
    #[must_use]
    pub const fn state(&self) -> PaginatorState {
        self.state
    }

    /// Token the next request will carry; after a failure, the token of the
    /// request that failed. `None` before the first page of a fresh search.
    #[must_use]
    pub const fn cursor(&self) -> Option<&CursorToken> {
        self.cursor.as_ref()
    }

    /// Fields every page is requested with
    #[must_use]
    pub const fn fields(&self) -> &FieldList {
        &self.fields
    }

    /// Pages delivered so far
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Rows delivered so far across all pages
    #[must_use]
    pub const fn rows_fetched(&self) -> usize {
        self.rows_fetched
    }

    /// Total match estimate from the most recent page
    #[must_use]
    pub const fn total(&self) -> Option<u64> {
        self.total
    }

    /// Stream of pages; ends after the last page or after one error
    pub fn into_pages(self) -> impl Stream<Item = Result<Page>> {
        stream::unfold(self, |mut pager| async move {
            match pager.next_page().await {
                Ok(Some(page)) => Some((Ok(page), pager)),
                Ok(None) => None,
                Err(e) => Some((Err(e), pager)),
            }
        })
    }

    /// Stream of rows across all pages.
    ///
    /// Rows arrive in server order. A failure is yielded once as the last
    /// item, after every row of the pages that did arrive.
    pub fn into_rows(self) -> impl Stream<Item = Result<ResultRow>> {
        stream::unfold(
            (self, VecDeque::new()),
            |(mut pager, mut buffer): (Self, VecDeque<ResultRow>)| async move {
                loop {
                    if let Some(row) = buffer.pop_front() {
                        return Some((Ok(row), (pager, buffer)));
                    }
                    match pager.next_page().await {
                        Ok(Some(page)) => buffer.extend(page.rows),
                        Ok(None) => return None,
                        Err(e) => return Some((Err(e), (pager, buffer))),
                    }
                }
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccountConfig;

    fn paginator() -> NextPaginator {
        let account = AccountConfig::new("a@a.com", "11111")
            .with_server("http://127.0.0.1:9")
            .unwrap();
        let client = FofaClient::new(account).unwrap();
        client.search().next("title=\"x\"").fields(["host", "ip"]).paginate()
    }

    fn page_with_next(next: Option<&str>, rows: usize) -> Page {
        Page {
            rows: (0..rows).map(|i| ResultRow::from(vec![i.to_string()])).collect(),
            size: 100,
            page: None,
            mode: None,
            query: None,
            next: next.map(CursorToken::from),
            fields: FieldList::parse("host,ip"),
        }
    }

    #[test]
    fn test_fresh_paginator_has_no_cursor() {
        let pager = paginator();
        assert_eq!(pager.state(), PaginatorState::Start);
        assert!(pager.cursor().is_none());
        assert_eq!(pager.fields().to_param(), "host,ip");
    }

    #[test]
    fn test_advance_keeps_token_verbatim() {
        let mut pager = paginator();
        pager.advance(&page_with_next(Some(" 0x2A/next=="), 10));
        assert_eq!(pager.state(), PaginatorState::HasPage);
        assert_eq!(pager.cursor().map(CursorToken::as_str), Some(" 0x2A/next=="));
        assert_eq!(pager.rows_fetched(), 10);
        assert_eq!(pager.total(), Some(100));
    }

    #[test]
    fn test_empty_or_missing_token_exhausts() {
        let mut pager = paginator();
        pager.advance(&page_with_next(Some(""), 3));
        assert_eq!(pager.state(), PaginatorState::Exhausted);
        assert!(pager.state().is_terminal());

        let mut pager = paginator();
        pager.advance(&page_with_next(None, 0));
        assert_eq!(pager.state(), PaginatorState::Exhausted);
    }

    #[tokio::test]
    async fn test_dropped_request_fails_paginator() {
        let mut pager = paginator();
        pager.state = PaginatorState::Fetching;

        let err = pager.next_page().await.unwrap_err();
        assert!(matches!(err, FofaError::Cancelled));
        assert_eq!(pager.state(), PaginatorState::Failed);
        assert!(pager.next_page().await.unwrap().is_none());
    }
}
