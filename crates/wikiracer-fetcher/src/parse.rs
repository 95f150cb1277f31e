use serde::Deserialize;
use std::collections::HashMap;

/// The two-field pagination cursor MediaWiki returns under `continue`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContinueCursor {
    #[serde(rename = "continue")]
    pub continue_field: String,
    #[serde(default)]
    pub plcontinue: String,
}

#[derive(Debug, Deserialize)]
struct MediaWikiResponse {
    query: Option<QuerySection>,
    #[serde(rename = "continue")]
    continuation: Option<ContinueCursor>,
}

#[derive(Debug, Deserialize)]
struct QuerySection {
    /// Keyed by MediaWiki's internal (and not otherwise meaningful) numeric
    /// page id; values are heterogeneous enough that only `links` matters.
    pages: HashMap<String, PageRecord>,
}

#[derive(Debug, Deserialize)]
struct PageRecord {
    #[serde(default)]
    links: Option<Vec<LinkTitle>>,
}

#[derive(Debug, Deserialize)]
struct LinkTitle {
    title: String,
}

/// The result of parsing one MediaWiki response body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedLinks {
    pub children: Vec<String>,
    pub continuation: Option<ContinueCursor>,
}

/// Parses a MediaWiki `action=query&prop=links` response body.
///
/// Per spec.md §4.C: a page with no `links` key is not an error (it's
/// skipped silently — most commonly a redirect or a page MediaWiki
/// resolved but didn't find outbound links for). Malformed JSON, or JSON
/// missing the top-level `query` object, is.
pub fn parse(body: &str) -> Result<ParsedLinks, serde_json::Error> {
    let response: MediaWikiResponse = serde_json::from_str(body)?;

    let query = response.query.ok_or_else(|| {
        serde::de::Error::custom("response missing top-level `query` object")
    })?;

    let mut children = Vec::new();
    for page in query.pages.into_values() {
        if let Some(links) = page.links {
            children.extend(links.into_iter().map(|l| l.title));
        }
    }

    Ok(ParsedLinks {
        children,
        continuation: response.continuation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_links_across_pages_skipping_missing() {
        let body = r#"{
            "query": {
                "pages": {
                    "1": {"title": "A", "links": [{"title": "B"}, {"title": "C"}]},
                    "2": {"title": "D"}
                }
            }
        }"#;
        let parsed = parse(body).unwrap();
        assert_eq!(parsed.children.len(), 2);
        assert!(parsed.children.contains(&"B".to_string()));
        assert!(parsed.children.contains(&"C".to_string()));
        assert!(parsed.continuation.is_none());
    }

    #[test]
    fn extracts_continuation_cursor() {
        let body = r#"{
            "query": {"pages": {"1": {"title": "A", "links": [{"title": "B"}]}}},
            "continue": {"continue": "||", "plcontinue": "123|Next_Page"}
        }"#;
        let parsed = parse(body).unwrap();
        let cursor = parsed.continuation.unwrap();
        assert_eq!(cursor.continue_field, "||");
        assert_eq!(cursor.plcontinue, "123|Next_Page");
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse("not json").is_err());
    }

    #[test]
    fn rejects_missing_query_object() {
        assert!(parse(r#"{"batchcomplete": ""}"#).is_err());
    }

    #[test]
    fn page_with_no_links_yields_no_children_not_an_error() {
        let body = r#"{"query": {"pages": {"1": {"title": "Orphan"}}}}"#;
        let parsed = parse(body).unwrap();
        assert!(parsed.children.is_empty());
    }
}
