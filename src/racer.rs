//! Component F from spec.md §4.F: the orchestrator. Seeds the scheduler
//! with the start title and, from each response callback, runs the
//! termination check, error classification, visited-marking, parsing,
//! and child/continuation expansion described there.

use crate::page::Page;
use crate::visited::VisitedSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use wikiracer_core::{ConfigError, FetchError};
use wikiracer_fetcher::{build_url_at, parse, PageCursor, DEFAULT_API_BASE};
use wikiracer_limiter::RateLimiter;
use wikiracer_scheduler::{FetchOutcome, PendingRequest, Scheduler, SchedulerConfig};

/// Tunables for a race. Mirrors spec.md §6's configuration table.
#[derive(Debug, Clone)]
pub struct RacerConfig {
    pub start: String,
    pub end: String,
    pub rate_limit: f64,
    pub burst: f64,
    pub scheduler_workers: usize,
    pub batch_size: usize,
    pub request_timeout: Duration,
    /// MediaWiki API base URL. Defaults to the real endpoint; overridden
    /// in tests to point at a local mock server.
    pub api_base: String,
}

impl Default for RacerConfig {
    fn default() -> Self {
        Self {
            start: String::new(),
            end: String::new(),
            rate_limit: 60.0,
            burst: 50.0,
            scheduler_workers: 5,
            batch_size: 50,
            request_timeout: Duration::from_secs(15),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl RacerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start.trim().is_empty() || self.end.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        if self.rate_limit <= 0.0 {
            return Err(ConfigError::NonPositiveRateLimit(self.rate_limit as u32));
        }
        if self.burst <= 0.0 {
            return Err(ConfigError::NonPositiveBurst(self.burst as u32));
        }
        if self.scheduler_workers == 0 {
            return Err(ConfigError::NonPositiveWorkers(self.scheduler_workers));
        }
        Ok(())
    }
}

struct Inner {
    end: String,
    api_base: String,
    visited: VisitedSet,
    scheduler: Scheduler,
    result: Mutex<Option<oneshot::Sender<Vec<String>>>>,
}

/// The racer. Cheap to clone — every clone shares the same visited set,
/// scheduler, and result channel.
#[derive(Clone)]
pub struct Racer(Arc<Inner>);

impl Racer {
    /// Builds the rate limiter and scheduler and returns a racer ready to
    /// start. Does not dispatch anything until [`race`](Self::race) is
    /// called.
    pub fn new(config: &RacerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let limiter = RateLimiter::builder()
            .rate(config.rate_limit)
            .burst(config.burst)
            .name("wikiracer")
            .build();
        let scheduler = Scheduler::spawn(
            limiter,
            SchedulerConfig {
                workers: config.scheduler_workers,
                batch_size: config.batch_size,
                request_timeout: config.request_timeout,
            },
        );
        Ok(Racer(Arc::new(Inner {
            end: config.end.clone(),
            api_base: config.api_base.clone(),
            visited: VisitedSet::new(),
            scheduler,
            result: Mutex::new(None),
        })))
    }

    /// Non-blocking initiation: seeds the start page at priority 0 and
    /// returns a receiver the caller selects on. The first successful
    /// delivery wins; the channel is consumed on delivery so later
    /// attempts are silently dropped.
    ///
    /// The trivial `start == end` race is special-cased here: the
    /// termination check fires on the seed itself, with no upstream
    /// call, rather than waiting for a round trip that would only
    /// confirm what's already known.
    pub fn race(&self, start: impl Into<String>) -> oneshot::Receiver<Vec<String>> {
        let (tx, rx) = oneshot::channel();
        *self.0.result.lock().unwrap() = Some(tx);

        let start_page = Page::root(start.into());
        if start_page.title.eq_ignore_ascii_case(&self.0.end) {
            self.deliver(start_page.path());
            return rx;
        }
        self.enqueue(start_page, PageCursor::none(), false);
        rx
    }

    /// Number of requests currently queued, for diagnostics.
    pub fn pending(&self) -> usize {
        self.0.scheduler.pending()
    }

    /// Number of distinct keys recorded visited, for diagnostics.
    pub fn visited_count(&self) -> usize {
        self.0.visited.len()
    }

    /// Current effective rate-limiter rate, for diagnostics.
    pub fn current_rate(&self) -> f64 {
        self.0.scheduler.limiter().limit()
    }

    fn deliver(&self, path: Vec<String>) {
        if let Some(tx) = self.0.result.lock().unwrap().take() {
            let _ = tx.send(path);
        }
    }

    fn enqueue(&self, page: Arc<Page>, cursor: PageCursor, retried_other_status: bool) {
        let url = build_url_at(&self.0.api_base, &page.title, &cursor);
        let priority = page.depth as i64;
        let racer = self.clone();
        let dispatch_url = url.clone();
        self.0.scheduler.enqueue(PendingRequest::new(url, priority, move |outcome| {
            racer.on_response(page, cursor, dispatch_url, retried_other_status, outcome);
        }));
    }

    /// The request callback — spec.md §4.F's core state logic.
    fn on_response(
        &self,
        page: Arc<Page>,
        cursor: PageCursor,
        url: reqwest::Url,
        retried_other_status: bool,
        outcome: FetchOutcome,
    ) {
        // 1. Termination check, first.
        if page.title.eq_ignore_ascii_case(&self.0.end) {
            self.deliver(page.path());
            return;
        }

        // 2. Error and retry classification.
        let (status, body) = match outcome {
            FetchOutcome::Transport(_) => {
                self.0.scheduler.limiter().record_failure();
                self.enqueue(page, cursor, retried_other_status);
                return;
            }
            FetchOutcome::Response { status, body } => (status, body),
        };

        match status {
            403 | 429 | 502 => {
                self.0.scheduler.limiter().record_failure();
                self.enqueue(page, cursor, retried_other_status);
                return;
            }
            200 => self.0.scheduler.limiter().record_success(),
            _ => {
                // Reference policy: re-enqueue once, then abandon.
                if !retried_other_status {
                    self.enqueue(page, cursor, true);
                }
                return;
            }
        }

        // 3. Mark visited.
        self.0.visited.set(url.to_string());

        // 4. Parse body via LinkFetcher.
        let parsed = match parse(&body) {
            Ok(parsed) => parsed,
            Err(source) => {
                let error = FetchError::Parse {
                    title: page.title.clone(),
                    source,
                };
                tracing::warn!(%error, "abandoning response that failed to parse");
                return;
            }
        };

        // 5. Expand children.
        for child_title in parsed.children {
            if child_title.is_empty() {
                continue;
            }
            let child_url = build_url_at(&self.0.api_base, &child_title, &PageCursor::none());
            if self.0.visited.check_and_mark(child_url.as_ref()) {
                continue;
            }
            let child_page = Page::child(child_title, &page);
            self.enqueue(child_page, PageCursor::none(), false);
        }

        // 6. Continuation: same page, same parent, same depth.
        if let Some(continuation) = parsed.continuation {
            let next_cursor = PageCursor::from_continuation(&continuation);
            self.enqueue(page, next_cursor, false);
        }
    }
}
