use crate::events::RateLimiterEvent;
use std::time::Duration;
use wikiracer_core::{AimdConfig, EventListeners, FnListener};

/// Configuration for the rate limiter.
pub struct RateLimiterConfig {
    pub(crate) initial_rate: f64,
    pub(crate) burst: f64,
    pub(crate) adaptive: Option<AimdConfig>,
    pub(crate) event_listeners: EventListeners<RateLimiterEvent>,
    pub(crate) name: String,
}

/// Builder for [`RateLimiterConfig`].
pub struct RateLimiterConfigBuilder {
    initial_rate: f64,
    burst: f64,
    adaptive: Option<AimdConfig>,
    event_listeners: EventListeners<RateLimiterEvent>,
    name: String,
}

impl Default for RateLimiterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiterConfigBuilder {
    /// Creates a new builder with defaults.
    ///
    /// Defaults match spec.md §6: 60 requests/sec, burst of 50, adaptive
    /// throttling on (floor 6 rps, ceiling equal to the initial rate,
    /// step of 1 up / factor of 0.5 down).
    pub fn new() -> Self {
        Self {
            initial_rate: 60.0,
            burst: 50.0,
            adaptive: Some(
                AimdConfig::new()
                    .with_initial_limit(60)
                    .with_min_limit(6)
                    .with_max_limit(60)
                    .with_increase_by(1)
                    .with_decrease_factor(0.85),
            ),
            event_listeners: EventListeners::new(),
            name: "<unnamed>".to_string(),
        }
    }

    /// Sets the initial token-bucket rate, in requests/sec.
    pub fn rate(mut self, rate: f64) -> Self {
        self.initial_rate = rate;
        if let Some(aimd) = &self.adaptive {
            self.adaptive = Some(
                AimdConfig::new()
                    .with_initial_limit(rate as usize)
                    .with_min_limit(aimd.min_limit)
                    .with_max_limit((rate as usize).max(aimd.min_limit))
                    .with_increase_by(aimd.increase_by)
                    .with_decrease_factor(aimd.decrease_factor),
            );
        }
        self
    }

    /// Sets the token-bucket burst (maximum tokens it can accumulate).
    pub fn burst(mut self, burst: f64) -> Self {
        self.burst = burst;
        self
    }

    /// Disables adaptive throttling; the rate stays fixed at whatever
    /// [`rate`](Self::rate) was configured.
    pub fn fixed_rate(mut self) -> Self {
        self.adaptive = None;
        self
    }

    /// Overrides the full AIMD configuration used for adaptive throttling.
    pub fn adaptive(mut self, config: AimdConfig) -> Self {
        self.adaptive = Some(config);
        self
    }

    /// Sets the name for this limiter instance (used in events).
    pub fn name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// Registers a callback invoked every time a reservation is made.
    pub fn on_reserved<F>(mut self, f: F) -> Self
    where
        F: Fn(u32, Duration) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            if let RateLimiterEvent::Reserved { n, delay, .. } = event {
                f(*n, *delay);
            }
        }));
        self
    }

    /// Registers a callback invoked whenever the adaptive controller
    /// changes the effective rate (positive delta = increase).
    pub fn on_rate_changed<F>(mut self, f: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.event_listeners.add(FnListener::new(move |event| {
            match event {
                RateLimiterEvent::RateIncreased { new_rate, .. }
                | RateLimiterEvent::RateDecreased { new_rate, .. } => f(*new_rate),
                RateLimiterEvent::Reserved { .. } => {}
            }
        }));
        self
    }

    /// Builds the rate limiter.
    pub fn build(self) -> crate::RateLimiter {
        let config = RateLimiterConfig {
            initial_rate: self.initial_rate,
            burst: self.burst,
            adaptive: self.adaptive,
            event_listeners: self.event_listeners,
            name: self.name,
        };

        crate::RateLimiter::new(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let limiter = RateLimiterConfigBuilder::new().build();
        assert_eq!(limiter.limit(), 60.0);
    }

    #[test]
    fn custom_rate_reconfigures_adaptive_ceiling() {
        let limiter = RateLimiterConfigBuilder::new().rate(100.0).build();
        assert_eq!(limiter.limit(), 100.0);
    }
}
