//! Common test utilities: an in-process fake of the FOFA API.

#![allow(dead_code)]

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fofa_client::{AccountConfig, ClientEvent, EventSink, FofaClient, NoopSink};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// (email, key, vip_level)
pub const ACCOUNTS: &[(&str, &str, i64)] = &[
    ("a@a.com", "11111", 0),
    ("b@b.com", "22222", 1),
    ("c@c.com", "33333", 2),
    ("d@d.com", "44444", 3),
    ("g@g.com", "77777", 11),
];

const ACCOUNT_INVALID: &str = r#"{"error":true,"errmsg":"[-700] Account Invalid"}"#;

/// Responds the way the live service does for a handful of canned queries
pub struct FakeFofa;

impl Respond for FakeFofa {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let params: HashMap<String, String> = request.url.query_pairs().into_owned().collect();
        let body = route(request.url.path(), &params);
        ResponseTemplate::new(200).set_body_raw(body, "application/json")
    }
}

fn param<'a>(params: &'a HashMap<String, String>, name: &str) -> &'a str {
    params.get(name).map_or("", String::as_str)
}

fn account(params: &HashMap<String, String>) -> Option<(&'static str, &'static str, i64)> {
    ACCOUNTS
        .iter()
        .copied()
        .find(|(email, key, _)| *email == param(params, "email") && *key == param(params, "key"))
}

fn route(path: &str, params: &HashMap<String, String>) -> String {
    match path {
        "/api/v1/info/my" => match account(params) {
            Some((email, key, level)) => json!({
                "email": email, "key": key, "isvip": level > 0, "vip_level": level,
                "fcoin": 10, "remain_api_query": 10, "remain_api_data": 100
            })
            .to_string(),
            None => ACCOUNT_INVALID.to_string(),
        },
        "/api/v1/search/all" => search_all(params),
        "/api/v1/search/stats" => search_stats(params),
        "/api/v1/search/next" => search_next(params),
        "/api/v1/host/1.1.1.1" | "/api/v1/host/fofa.info" => json!({
            "error": false, "host": "1.1.1.1", "ip": "1.1.1.1", "asn": 6805,
            "org": "Telefonica Germany", "country_name": "Germany", "country_code": "DE",
            "protocol": ["sip", "http", "https"], "port": [5060, 8089, 7170, 443],
            "category": ["CMS"], "product": ["Synology-WebStation"],
            "update_time": "2022-05-24 12:00:00"
        })
        .to_string(),
        _ => r#"{"error":true,"errmsg":"[404] not found"}"#.to_string(),
    }
}

fn search_all(params: &HashMap<String, String>) -> String {
    let Some((_, _, level)) = account(params) else {
        return ACCOUNT_INVALID.to_string();
    };

    let query = STANDARD
        .decode(param(params, "qbase64"))
        .ok()
        .and_then(|q| String::from_utf8(q).ok())
        .unwrap_or_default();
    if query.is_empty() {
        return r#"{"error":true,"errmsg":"[-4] Params Error"}"#.to_string();
    }
    if level != 3 && param(params, "fields").contains("fid") {
        return r#"{"error":true,"errmsg":"[820001] 没有权限搜索fid字段"}"#.to_string();
    }
    if param(params, "size") == "0" {
        return r#"{"error":true,"errmsg":"[51] The Size value `0` must be between 1 and 10000"}"#
            .to_string();
    }

    match query.as_str() {
        "aaa=bbb" => r#"{"error":true,"errmsg":"[820000] FOFA Query Syntax Incorrect"}"#.to_string(),
        "port=100000" => json!({
            "error": false, "size": 0, "page": 1, "mode": "extended",
            "query": "port=\"100000\"", "results": []
        })
        .to_string(),
        "port=100001" => json!({
            "error": false, "size": 0, "page": 1, "mode": "extended",
            "query": "port=\"100000\"", "results": "test"
        })
        .to_string(),
        "port=50000" => json!({
            "error": false, "size": 9, "page": 1, "mode": "extended", "query": "port=\"50000\"",
            "results": ["118.190.75.134", "34.83.32.116", "117.4.67.26", ":0", ":0", ":0",
                        "176.198.13.22", "81.174.169.62", "23.42.6.133"]
        })
        .to_string(),
        "port=80" => port_80(params),
        "port=5354" => {
            let mut results = vec![json!(["94.130.128.248", "5453"])];
            if param(params, "full") == "true" {
                results.push(json!(["94.130.128.124", "5453"]));
            }
            json!({"error": false, "size": 12_345_678, "page": 1, "results": results}).to_string()
        }
        "paged" => paged(params),
        _ => json!({"error": false, "size": 0, "page": 1, "results": []}).to_string(),
    }
}

fn port_80(params: &HashMap<String, String>) -> String {
    if param(params, "fields") == "host" {
        return json!({
            "error": false, "size": 470_262_270, "page": 1, "mode": "extended",
            "query": "port=\"80\"",
            "results": ["118.190.75.134", "34.83.32.116", "117.4.67.26", ":0", ":0", ":0",
                        "176.198.13.22", "81.174.169.62", "23.42.6.133",
                        "webdisk.dutadamaijawatengah.id"]
        })
        .to_string();
    }

    let size: usize = param(params, "size").parse().unwrap_or(0);
    if size == 1 {
        return json!({
            "error": false, "size": 12_345_678, "page": 1, "mode": "extended",
            "query": "port=\"80\"", "results": [["94.130.128.248", "80"]]
        })
        .to_string();
    }

    let results: Vec<Value> = (0..size)
        .map(|i| json!([format!("10.0.{}.{}", i / 256, i % 256), "80"]))
        .collect();
    json!({
        "error": false, "size": 470_293_950, "page": 1, "mode": "extended",
        "query": "port=\"80\"", "results": results
    })
    .to_string()
}

/// 25 matches served in pages of `size`, used for page-number walking
fn paged(params: &HashMap<String, String>) -> String {
    const TOTAL: usize = 25;
    let size: usize = param(params, "size").parse().unwrap_or(10);
    let page: usize = param(params, "page").parse().unwrap_or(1);

    let start = (page - 1) * size;
    let results: Vec<Value> = (start..TOTAL.min(start + size))
        .map(|i| json!([format!("192.0.2.{i}"), "443"]))
        .collect();
    json!({"error": false, "size": TOTAL, "page": page, "results": results}).to_string()
}

fn search_stats(params: &HashMap<String, String>) -> String {
    if account(params).is_none() {
        return ACCOUNT_INVALID.to_string();
    }
    if param(params, "size") == "0" {
        return r#"{"error":true,"errmsg":"[51] The Size value `0` must be between 5 and 10000"}"#
            .to_string();
    }

    let title = json!([
        {"code": "cG9ydD0iODAiICYmIHRpdGxlPT0iMzAxIE1vdmVkIFBlcm1hbmVudGx5Ig==",
         "count": 25_983_408, "name": "301 Moved Permanently"},
        {"code": "cG9ydD0iODAiICYmIHRpdGxlPT0iNTAyIEJhZCBHYXRld2F5Ig==",
         "count": 25_233_607, "name": "502 Bad Gateway"}
    ]);
    let countries = if param(params, "fields") == "title" {
        json!([])
    } else {
        json!([{
            "code": "cG9ydD0iODAiICYmIGNvdW50cnk9IkNOIg==", "count": 36_835_641,
            "name": "China", "name_code": "CN",
            "regions": [{"code": "cG9ydD0iODAiICYmIHJlZ2lvbj0iQmVpamluZyI=",
                         "count": 4_846_156, "name": "Beijing"}]
        }])
    };

    json!({
        "error": false,
        "distinct": {"ip": 144_828_930, "title": 33_994_578},
        "aggs": {"countries": countries, "title": title},
        "lastupdatetime": "2022-05-18 20:00:00"
    })
    .to_string()
}

/// Ten pages of ten rows; the token is the page number as text
fn search_next(params: &HashMap<String, String>) -> String {
    if account(params).is_none() {
        return ACCOUNT_INVALID.to_string();
    }

    let token = match param(params, "next") {
        "" => "1",
        other => other,
    };
    let i: u32 = token.parse().unwrap_or(0);
    let with_host = param(params, "fields") == "host,ip,port";

    let results: Vec<Vec<String>> = (0..10)
        .map(|j| {
            let mut row = vec![format!("{i}.{i}.{i}.{i}"), (80 + i + j).to_string()];
            if with_host {
                row.insert(0, format!("http://{i}.{i}.{i}.{i}"));
            }
            row
        })
        .collect();

    let next = if i == 10 { String::new() } else { (i + 1).to_string() };
    json!({
        "error": false, "size": 100, "mode": "extended", "query": "title=\"百度\"",
        "results": results, "next": next
    })
    .to_string()
}

/// Start the fake API
pub async fn start() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(FakeFofa)
        .mount(&server)
        .await;
    server
}

/// Account URL for the fake server
pub fn account_for(server: &MockServer, email: &str, key: &str) -> AccountConfig {
    AccountConfig::parse(&format!("{}/?email={email}&key={key}&version=v1", server.uri()))
        .expect("valid account url")
}

/// Client authenticated as a known-good account
pub fn client(server: &MockServer) -> FofaClient {
    FofaClient::builder(account_for(server, "b@b.com", "22222"))
        .event_sink(Arc::new(NoopSink))
        .build()
        .expect("client builds")
}

/// Number of requests the server saw on a path
pub async fn hits(server: &MockServer, path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .count()
}

/// Event sink that keeps a rendered line per event
#[derive(Default)]
pub struct RecordingSink {
    pub lines: Mutex<Vec<String>>,
}

impl EventSink for RecordingSink {
    fn event(&self, event: &ClientEvent<'_>) {
        let line = match event {
            ClientEvent::Request { path } => format!("request {path}"),
            ClientEvent::PageFetched {
                path,
                rows,
                total,
                exhausted,
            } => format!("page {path} rows={rows} total={total} exhausted={exhausted}"),
            ClientEvent::Error { path, error } => format!("error {path} {error}"),
        };
        self.lines.lock().unwrap().push(line);
    }
}
