use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Token-bucket state: tokens refill at `rate` per second, capped at `burst`.
///
/// Mirrors `golang.org/x/time/rate.Limiter`'s reservation model (the
/// original Go racer's `SafeRateLimiter` wraps exactly this): `reserve_n`
/// spends `n` tokens immediately, going into debt if necessary, and returns
/// how long the caller must wait before that debt is paid off.
#[derive(Debug)]
struct TokenBucket {
    rate: f64,
    burst: f64,
    tokens: f64,
    last_update: Instant,
}

impl TokenBucket {
    fn new(rate: f64, burst: f64) -> Self {
        Self {
            rate,
            burst,
            tokens: burst,
            last_update: Instant::now(),
        }
    }

    fn advance(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_update).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.burst);
        self.last_update = now;
    }

    /// Reserves `n` tokens, returning the delay the caller must sleep
    /// before it is safe to proceed. Never blocks and never fails: the
    /// limiter can only stall, per spec.
    fn reserve_n(&mut self, now: Instant, n: u32) -> Duration {
        self.advance(now);
        self.tokens -= n as f64;
        if self.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-self.tokens / self.rate)
        }
    }

    fn set_rate(&mut self, now: Instant, rate: f64) {
        self.advance(now);
        self.rate = rate;
    }
}

/// Thread-safe wrapper around [`TokenBucket`], cloneable and shareable
/// across scheduler workers.
#[derive(Debug)]
pub(crate) struct SharedTokenBucket {
    state: Mutex<TokenBucket>,
}

impl SharedTokenBucket {
    pub(crate) fn new(rate: f64, burst: f64) -> Self {
        Self {
            state: Mutex::new(TokenBucket::new(rate, burst)),
        }
    }

    pub(crate) fn reserve_n(&self, now: Instant, n: u32) -> Duration {
        self.state.lock().unwrap().reserve_n(now, n)
    }

    pub(crate) fn rate(&self) -> f64 {
        self.state.lock().unwrap().rate
    }

    pub(crate) fn set_rate(&self, rate: f64) {
        self.state.lock().unwrap().set_rate(Instant::now(), rate);
    }
}
