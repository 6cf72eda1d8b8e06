//! API endpoint modules.

mod account;
mod host;
mod next;
mod search;

pub use account::AccountApi;
pub use host::{HostApi, HostRequestBuilder};
pub use next::{NextPaginator, NextRequestBuilder, PaginatorState};
pub use search::{
    SearchApi, SearchRequestBuilder, StatsRequestBuilder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Queries travel base64-encoded in the `qbase64` parameter
pub(crate) fn encode_query(query: &str) -> String {
    STANDARD.encode(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query() {
        assert_eq!(encode_query("port=\"80\""), "cG9ydD0iODAi");
        assert_eq!(encode_query(""), "");
    }
}
