//! Component B from spec.md §4.B: a pool of worker tasks sharing a
//! min-priority queue of pending HTTP requests. Workers drain a batch,
//! make one batched reservation against the [`RateLimiter`](wikiracer_limiter::RateLimiter)
//! to amortize its lock, issue the GETs, and invoke each request's
//! callback synchronously before looping.
//!
//! Priority is the page depth the request was discovered at — lower
//! dispatches first, so the scheduler naturally favors breadth-first
//! exploration under contention.

mod queue;

use queue::PriorityQueue;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use wikiracer_limiter::RateLimiter;

/// What a dispatched request resolved to. Status-code classification
/// (retryable vs fatal) happens one layer up, in the racer's callback —
/// this crate only reports what happened on the wire.
#[derive(Debug)]
pub enum FetchOutcome {
    Response { status: u16, body: String },
    Transport(reqwest::Error),
}

type Callback = Box<dyn FnOnce(FetchOutcome) + Send>;

/// One queued unit of work: a URL to GET, the priority it was discovered
/// at, and the callback to invoke with the outcome.
pub struct PendingRequest {
    pub url: reqwest::Url,
    pub priority: i64,
    pub callback: Callback,
}

impl PendingRequest {
    pub fn new(
        url: reqwest::Url,
        priority: i64,
        callback: impl FnOnce(FetchOutcome) + Send + 'static,
    ) -> Self {
        Self {
            url,
            priority,
            callback: Box::new(callback),
        }
    }
}

/// Configuration for a [`Scheduler`]: how many workers to run and how
/// large a batch each worker drains before making one rate-limiter
/// reservation.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub workers: usize,
    pub batch_size: usize,
    pub request_timeout: Duration,
}

impl Default for SchedulerConfig {
    /// Matches spec.md §5: 3-10 workers (default 5), batch size equal to
    /// the rate limiter's burst (default 50), 15s request timeout (within
    /// the reference 10-30s range).
    fn default() -> Self {
        Self {
            workers: 5,
            batch_size: 50,
            request_timeout: Duration::from_secs(15),
        }
    }
}

/// A pool of worker tasks sharing one priority queue and one rate
/// limiter. Cheap to clone: cloning shares the same queue and workers.
#[derive(Clone)]
pub struct Scheduler {
    queue: Arc<PriorityQueue>,
    limiter: RateLimiter,
    client: Client,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Builds a scheduler and spawns its worker tasks immediately. The
    /// returned handle can be cloned freely; dropping every clone does
    /// not stop the workers (per spec.md §5, workers run until process
    /// exit, not until handles are dropped).
    pub fn spawn(limiter: RateLimiter, config: SchedulerConfig) -> Self {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("reqwest client builds with static config");

        let scheduler = Self {
            queue: Arc::new(PriorityQueue::new()),
            limiter,
            client,
            config,
        };

        for _ in 0..config.workers {
            let worker = scheduler.clone();
            tokio::spawn(async move { worker.worker_loop().await });
        }

        scheduler
    }

    /// Pushes a request onto the queue. Never blocks.
    pub fn enqueue(&self, request: PendingRequest) {
        self.queue.push(request);
    }

    /// Number of requests currently waiting in the priority queue.
    /// Diagnostics only.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The rate limiter this scheduler reserves against.
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    async fn worker_loop(&self) {
        loop {
            let batch = self.queue.drain_batch(self.config.batch_size).await;

            let now = Instant::now();
            let delay = self.limiter.reserve_n(now, batch.len() as u32);
            if delay > Duration::ZERO {
                tokio::time::sleep(delay).await;
            }

            let mut in_flight = tokio::task::JoinSet::new();
            for request in batch {
                let client = self.client.clone();
                in_flight.spawn(async move {
                    let outcome = match client.get(request.url.clone()).send().await {
                        Ok(response) => {
                            let status = response.status().as_u16();
                            match response.text().await {
                                Ok(body) => FetchOutcome::Response { status, body },
                                Err(err) => FetchOutcome::Transport(err),
                            }
                        }
                        Err(err) => FetchOutcome::Transport(err),
                    };
                    (request.callback, outcome)
                });
            }

            while let Some(joined) = in_flight.join_next().await {
                if let Ok((callback, outcome)) = joined {
                    callback(outcome);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn dispatches_queued_requests_and_invokes_callbacks() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&mock_server)
            .await;

        let limiter = RateLimiter::builder().rate(1000.0).burst(50.0).build();
        let scheduler = Scheduler::spawn(
            limiter,
            SchedulerConfig {
                workers: 2,
                batch_size: 10,
                request_timeout: Duration::from_secs(5),
            },
        );

        let received = Arc::new(StdMutex::new(Vec::new()));
        let count = Arc::new(AtomicUsize::new(0));

        for i in 0..5 {
            let url = reqwest::Url::parse(&format!("{}/?i={i}", mock_server.uri())).unwrap();
            let received = received.clone();
            let count = count.clone();
            scheduler.enqueue(PendingRequest::new(url, 0, move |outcome| {
                if let FetchOutcome::Response { status, body } = outcome {
                    received.lock().unwrap().push((status, body));
                }
                count.fetch_add(1, Ordering::SeqCst);
            }));
        }

        for _ in 0..100 {
            if count.load(Ordering::SeqCst) == 5 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }

        assert_eq!(count.load(Ordering::SeqCst), 5);
        assert!(received.lock().unwrap().iter().all(|(s, b)| *s == 200 && b == "ok"));
    }

    #[tokio::test]
    async fn transport_errors_reach_the_callback_as_data_not_a_panic() {
        let limiter = RateLimiter::builder().rate(1000.0).burst(50.0).build();
        let scheduler = Scheduler::spawn(
            limiter,
            SchedulerConfig {
                workers: 1,
                batch_size: 10,
                request_timeout: Duration::from_millis(50),
            },
        );

        let (tx, rx) = tokio::sync::oneshot::channel();
        // Port 1 is never listening locally; this exercises the transport-error path.
        let url = reqwest::Url::parse("http://127.0.0.1:1/").unwrap();
        scheduler.enqueue(PendingRequest::new(url, 0, move |outcome| {
            let _ = tx.send(matches!(outcome, FetchOutcome::Transport(_)));
        }));

        let was_transport_error = tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("callback should fire")
            .unwrap();
        assert!(was_transport_error);
    }
}
