//! Domain error types shared by the fetcher, scheduler, and driver.

use thiserror::Error;

/// Errors raised while building a request or parsing a MediaWiki response.
///
/// `Transport` and `Retryable` are the two kinds the scheduler treats as
/// recoverable (it re-enqueues the request); everything else is fatal to
/// that one request but never to the race as a whole.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client couldn't complete the round trip at all (DNS, TCP,
    /// TLS, timeout). Classified the same as a retryable status code.
    #[error("transport error fetching {title:?}: {source}")]
    Transport {
        title: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 403 / 429 / 502 — the upstream asked us to back off.
    #[error("retryable status {status} fetching {title:?}")]
    Retryable { title: String, status: u16 },

    /// Any other non-200 status. Fatal for this request, not for the race.
    #[error("non-retryable status {status} fetching {title:?}")]
    NonRetryable { title: String, status: u16 },

    /// The response body wasn't valid JSON, or lacked the `query` key.
    #[error("failed to parse MediaWiki response for {title:?}: {source}")]
    Parse {
        title: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Transport errors and {403, 429, 502} are retryable per spec.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transport { .. } | FetchError::Retryable { .. })
    }
}

/// Fatal misconfiguration detected at startup (missing `start`/`end`, etc).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("start and end titles must be non-empty")]
    EmptyTitle,

    #[error("rate_limit must be positive, got {0}")]
    NonPositiveRateLimit(u32),

    #[error("burst must be positive, got {0}")]
    NonPositiveBurst(u32),

    #[error("scheduler_workers must be positive, got {0}")]
    NonPositiveWorkers(usize),
}
