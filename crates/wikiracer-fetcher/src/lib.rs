//! Component C from spec.md §4.C: builds MediaWiki `action=query&prop=links`
//! URLs and parses the resulting JSON into child titles plus an optional
//! pagination cursor. Does no I/O itself — the scheduler owns the actual
//! HTTP GET, this crate only builds the request and reads the body.

mod parse;

pub use parse::{parse, ContinueCursor, ParsedLinks};

use url::Url;

/// The production MediaWiki endpoint. Overridable via
/// [`build_url_at`] so integration tests can point the exact same
/// request-building logic at a local mock server.
pub const DEFAULT_API_BASE: &str = "http://en.wikipedia.org/w/api.php";

/// A `(continue, plcontinue)` cursor, or the absence of one for a page's
/// first request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub continue_param: String,
    pub plcontinue: String,
}

impl PageCursor {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_continuation(cursor: &ContinueCursor) -> Self {
        Self {
            continue_param: cursor.continue_field.clone(),
            plcontinue: cursor.plcontinue.clone(),
        }
    }
}

/// Builds the canonical request URL for a title against the production
/// MediaWiki endpoint, optionally continuing a paginated link list. This
/// URL (its string form) is also the dedup key when `VisitedSet` is
/// URL-keyed.
pub fn build_url(title: &str, cursor: &PageCursor) -> Url {
    build_url_at(DEFAULT_API_BASE, title, cursor)
}

/// Same as [`build_url`] but against an arbitrary base URL — lets tests
/// exercise the real query-parameter logic against a local mock server.
pub fn build_url_at(api_base: &str, title: &str, cursor: &PageCursor) -> Url {
    let mut url = Url::parse(api_base).expect("valid base URL");
    {
        let mut q = url.query_pairs_mut();
        q.append_pair("action", "query");
        q.append_pair("format", "json");
        q.append_pair("prop", "links");
        q.append_pair("titles", title);
        if !cursor.continue_param.is_empty() {
            q.append_pair("continue", &cursor.continue_param);
        }
        if !cursor.plcontinue.is_empty() {
            q.append_pair("plcontinue", &cursor.plcontinue);
        }
    }
    url
}
