//! Integration tests for cursor pagination on `search/next`

mod common;

use common::{account_for, client, hits, start};
use fofa_client::{FofaClient, FofaError, PaginatorState, RateLimitConfig, RetryConfig};
use futures_util::StreamExt;
use std::pin::pin;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const NEXT: &str = "/api/v1/search/next";

#[tokio::test]
async fn test_walks_every_page_then_stops() {
    let server = start().await;
    let client = client(&server);
    let mut pager = client.search().next(r#"title="百度""#).paginate();

    let mut pages = 0;
    while let Some(page) = pager.next_page().await.unwrap() {
        pages += 1;
        assert_eq!(page.len(), 10);
        assert_eq!(page.size, 100);
    }

    assert_eq!(pages, 10);
    assert_eq!(pager.state(), PaginatorState::Exhausted);
    assert_eq!(pager.rows_fetched(), 100);
    assert_eq!(pager.total(), Some(100));
    assert_eq!(hits(&server, NEXT).await, 10);

    // exhausted paginators never go back to the server
    assert!(pager.next_page().await.unwrap().is_none());
    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(hits(&server, NEXT).await, 10);
}

#[tokio::test]
async fn test_rows_arrive_in_server_order() {
    let server = start().await;
    let client = client(&server);

    let rows: Vec<_> = client
        .search()
        .next("port=80")
        .paginate()
        .into_rows()
        .collect()
        .await;

    assert_eq!(rows.len(), 100);
    let rows: Vec<_> = rows.into_iter().map(Result::unwrap).collect();
    assert_eq!(rows[0].values(), ["1.1.1.1", "81"]);
    assert_eq!(rows[9].values(), ["1.1.1.1", "90"]);
    assert_eq!(rows[10].values(), ["2.2.2.2", "82"]);
    assert_eq!(rows[99].values(), ["10.10.10.10", "99"]);
}

#[tokio::test]
async fn test_fields_shape_every_row() {
    let server = start().await;
    let client = client(&server);

    let mut pages = pin!(client
        .search()
        .next("port=80")
        .fields(["host", "ip", "port"])
        .paginate()
        .into_pages());

    let mut seen = 0;
    while let Some(page) = pages.next().await {
        let page = page.unwrap();
        assert_eq!(page.fields.to_param(), "host,ip,port");
        for row in &page.rows {
            assert_eq!(row.len(), 3);
            let ip = row.field(&page.fields, "ip").unwrap();
            assert_eq!(row.field(&page.fields, "host"), Some(format!("http://{ip}").as_str()));
        }
        seen += page.len();
    }
    assert_eq!(seen, 100);
}

#[tokio::test]
async fn test_same_start_gives_same_rows() {
    let server = start().await;
    let client = client(&server);

    let first: Vec<_> = client
        .search()
        .next("port=80")
        .cursor("7")
        .paginate()
        .into_rows()
        .map(Result::unwrap)
        .collect()
        .await;
    let second: Vec<_> = client
        .search()
        .next("port=80")
        .cursor("7")
        .paginate()
        .into_rows()
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(first.len(), 40);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cursor_is_forwarded_verbatim() {
    let server = start().await;
    Mock::given(method("GET"))
        .and(path(NEXT))
        .and(query_param("next", "a+b/c=="))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"error":false,"size":1,"results":[["192.0.2.1","22"]],"next":""}"#,
        ))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut pager = client.search().next("port=22").cursor("a+b/c==").paginate();

    let page = pager.next_page().await.unwrap().unwrap();
    assert_eq!(page.rows[0].values(), ["192.0.2.1", "22"]);
    assert!(page.is_last());
    assert_eq!(pager.state(), PaginatorState::Exhausted);
}

#[tokio::test]
async fn test_first_request_has_no_cursor() {
    let server = start().await;
    let client = client(&server);
    let mut pager = client.search().next("port=80").paginate();

    pager.next_page().await.unwrap();
    pager.next_page().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let cursors: Vec<Option<String>> = requests
        .iter()
        .map(|r| {
            r.url
                .query_pairs()
                .find(|(k, _)| k == "next")
                .map(|(_, v)| v.into_owned())
        })
        .collect();
    assert_eq!(cursors, [None, Some("2".to_string())]);
    assert_eq!(pager.cursor().map(|c| c.as_str()), Some("3"));
}

#[tokio::test]
async fn test_failure_keeps_earlier_rows() {
    let server = start().await;
    Mock::given(method("GET"))
        .and(path(NEXT))
        .and(query_param("next", "3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let items: Vec<_> = client
        .search()
        .next("port=80")
        .paginate()
        .into_rows()
        .collect()
        .await;

    assert_eq!(items.len(), 21);
    assert!(items[..20].iter().all(Result::is_ok));
    assert!(matches!(
        items[20],
        Err(FofaError::Protocol {
            status: Some(500),
            ..
        })
    ));
    assert_eq!(hits(&server, NEXT).await, 3);
}

#[tokio::test]
async fn test_failed_paginator_stays_failed() {
    let server = start().await;
    let client = FofaClient::new(account_for(&server, "b@b.com", "bad")).unwrap();
    let mut pager = client.search().next("port=80").paginate();

    let err = pager.next_page().await.unwrap_err();
    assert!(err.is_auth_error());
    assert_eq!(pager.state(), PaginatorState::Failed);
    assert!(pager.next_page().await.unwrap().is_none());
    assert_eq!(hits(&server, NEXT).await, 1);
}

#[tokio::test]
async fn test_non_string_cursor_fails_instead_of_ending() {
    let server = start().await;
    Mock::given(method("GET"))
        .and(path(NEXT))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"error":false,"size":100,"results":[["1.1.1.1","80"]],"next":2}"#,
        ))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut pager = client.search().next("port=80").paginate();

    let err = pager.next_page().await.unwrap_err();
    assert!(matches!(err, FofaError::MalformedResults(_)));
    assert_eq!(pager.state(), PaginatorState::Failed);
    assert!(pager.next_page().await.unwrap().is_none());
}

#[tokio::test]
async fn test_dropped_request_cancels() {
    let server = start().await;
    Mock::given(method("GET"))
        .and(path(NEXT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"error":false,"size":0,"results":[],"next":""}"#)
                .set_delay(Duration::from_secs(2)),
        )
        .with_priority(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let mut pager = client.search().next("port=80").paginate();

    let timed_out = tokio::time::timeout(Duration::from_millis(100), pager.next_page()).await;
    assert!(timed_out.is_err());
    assert_eq!(pager.state(), PaginatorState::Fetching);

    let err = pager.next_page().await.unwrap_err();
    assert!(matches!(err, FofaError::Cancelled));
    assert_eq!(pager.state(), PaginatorState::Failed);
}

#[tokio::test]
async fn test_retry_resends_same_cursor() {
    let server = start().await;
    Mock::given(method("GET"))
        .and(path(NEXT))
        .and(query_param("next", "2"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .with_priority(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let client = FofaClient::builder(account_for(&server, "b@b.com", "22222"))
        .timeout(Duration::from_millis(300))
        .build()
        .unwrap();
    let retry = RetryConfig::new()
        .max_retries(2)
        .initial_backoff(Duration::from_millis(10));
    let mut pager = client.search().next("port=80").paginate();

    pager.next_page_with_retry(&retry).await.unwrap();
    let second = pager.next_page_with_retry(&retry).await.unwrap().unwrap();
    assert_eq!(second.rows[0].values(), ["2.2.2.2", "82"]);
    assert_eq!(pager.state(), PaginatorState::HasPage);
}

#[tokio::test]
async fn test_without_retry_timeout_fails() {
    let server = start().await;
    Mock::given(method("GET"))
        .and(path(NEXT))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .with_priority(1)
        .mount(&server)
        .await;

    let client = FofaClient::builder(account_for(&server, "b@b.com", "22222"))
        .timeout(Duration::from_millis(200))
        .build()
        .unwrap();
    let mut pager = client.search().next("port=80").paginate();

    let err = pager.next_page().await.unwrap_err();
    assert!(matches!(err, FofaError::Transport { timeout: true, .. }));
    assert_eq!(hits(&server, NEXT).await, 1);
}

#[tokio::test]
async fn test_rate_limited_client_still_completes() {
    let server = start().await;
    let client = FofaClient::builder(account_for(&server, "b@b.com", "22222"))
        .rate_limit(RateLimitConfig::new(100, 5))
        .build()
        .unwrap();

    let count = client
        .search()
        .next("port=80")
        .cursor("8")
        .paginate()
        .into_rows()
        .count()
        .await;
    assert_eq!(count, 30);
}
