//! Component G from spec.md §4.G: a thin driver. Parses CLI arguments,
//! builds the racer, blocks on its result channel, and ticks a periodic
//! diagnostics timer while it waits — the `[ADDED]` supplement ported
//! from the original source's per-iteration queue/visited/rate logging.

use crate::racer::{Racer, RacerConfig};
use clap::Parser;
use std::time::Duration;

/// Finds a hyperlink chain between two Wikipedia articles as fast as
/// MediaWiki's rate limits allow.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Args {
    /// Starting article title.
    pub start: String,

    /// Target article title.
    pub end: String,

    /// Parallelism hint: number of OS threads the async runtime spins up.
    /// Defaults to the host CPU count, mirroring the original source's
    /// `runtime.GOMAXPROCS(0)`.
    #[arg(long, default_value_t = num_cpus::get())]
    pub num_proc: usize,

    /// Requests/sec the rate limiter starts at (and, with adaptive
    /// throttling, the ceiling it won't exceed).
    #[arg(long, default_value_t = 60.0)]
    pub rate_limit: f64,

    /// Token-bucket burst capacity; also the scheduler's per-worker batch size.
    #[arg(long, default_value_t = 50.0)]
    pub burst: f64,

    /// Number of scheduler worker tasks.
    #[arg(long, default_value_t = 5)]
    pub scheduler_workers: usize,

    /// Per-request HTTP timeout, in seconds.
    #[arg(long, default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// How often to log diagnostics (pending requests, visited count,
    /// current rate) while waiting for the race to finish. 0 disables it.
    #[arg(long, default_value_t = 5)]
    pub diagnostics_interval_secs: u64,

    /// Overrides the MediaWiki API base URL (for testing against a mock server).
    #[arg(long, default_value_t = wikiracer_fetcher::DEFAULT_API_BASE.to_string())]
    pub api_base: String,
}

impl Args {
    fn into_racer_config(self) -> RacerConfig {
        RacerConfig {
            start: self.start,
            end: self.end,
            rate_limit: self.rate_limit,
            burst: self.burst,
            scheduler_workers: self.scheduler_workers,
            batch_size: self.burst as usize,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            api_base: self.api_base,
        }
    }
}

/// Runs the race to completion against already-parsed args and prints the
/// path. `num_proc` is consumed by the caller when sizing the async
/// runtime, before this function ever starts.
pub async fn run(args: Args) -> anyhow::Result<()> {
    let diagnostics_interval = Duration::from_secs(args.diagnostics_interval_secs);
    let start = args.start.clone();
    let config = args.into_racer_config();

    let racer = Racer::new(&config)?;
    let diagnostics = spawn_diagnostics(racer.clone(), diagnostics_interval);

    let path = racer
        .race(start)
        .await
        .map_err(|_| anyhow::anyhow!("result channel closed without delivering a path"))?;

    diagnostics.abort();
    println!("{}", path.join(" -> "));
    Ok(())
}

fn spawn_diagnostics(racer: Racer, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if interval.is_zero() {
            return;
        }
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            tracing::info!(
                pending = racer.pending(),
                visited = racer.visited_count(),
                rate = racer.current_rate(),
                "race in progress"
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_required_positional_args_with_spec_defaults() {
        let args = Args::parse_from(["wikiracer", "Football", "Team Sports"]);
        assert_eq!(args.start, "Football");
        assert_eq!(args.end, "Team Sports");
        assert_eq!(args.rate_limit, 60.0);
        assert_eq!(args.burst, 50.0);
        assert_eq!(args.scheduler_workers, 5);
        assert_eq!(args.num_proc, num_cpus::get());
    }

    #[test]
    fn parses_overridden_flags() {
        let args = Args::parse_from([
            "wikiracer",
            "A",
            "B",
            "--rate-limit",
            "100",
            "--burst",
            "20",
            "--scheduler-workers",
            "3",
            "--num-proc",
            "2",
        ]);
        assert_eq!(args.rate_limit, 100.0);
        assert_eq!(args.burst, 20.0);
        assert_eq!(args.scheduler_workers, 3);
        assert_eq!(args.num_proc, 2);
    }
}
