use std::time::{Duration, Instant};
use wikiracer_core::TrackedEvent;

/// Events emitted by the rate limiter, for observability only — nothing
/// downstream depends on these being observed.
#[derive(Debug, Clone)]
pub enum RateLimiterEvent {
    /// A batch of `n` tokens was reserved; `delay` is how long the caller
    /// had to sleep before the reservation was honored.
    Reserved {
        pattern_name: String,
        timestamp: Instant,
        n: u32,
        delay: Duration,
    },
    /// The adaptive controller raised the effective rate after a success.
    RateIncreased {
        pattern_name: String,
        timestamp: Instant,
        new_rate: f64,
    },
    /// The adaptive controller lowered the effective rate after a
    /// transient failure or retryable status.
    RateDecreased {
        pattern_name: String,
        timestamp: Instant,
        new_rate: f64,
    },
}

impl TrackedEvent for RateLimiterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RateLimiterEvent::Reserved { .. } => "Reserved",
            RateLimiterEvent::RateIncreased { .. } => "RateIncreased",
            RateLimiterEvent::RateDecreased { .. } => "RateDecreased",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RateLimiterEvent::Reserved { timestamp, .. }
            | RateLimiterEvent::RateIncreased { timestamp, .. }
            | RateLimiterEvent::RateDecreased { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            RateLimiterEvent::Reserved { pattern_name, .. }
            | RateLimiterEvent::RateIncreased { pattern_name, .. }
            | RateLimiterEvent::RateDecreased { pattern_name, .. } => pattern_name,
        }
    }
}
