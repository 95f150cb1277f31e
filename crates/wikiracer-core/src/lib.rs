//! Shared infrastructure for the wikiracer workspace: the event bus used
//! by the limiter/scheduler/racer for observability, the AIMD controller
//! behind the adaptive rate limiter, and the error types shared across
//! the fetcher and driver.

pub mod aimd;
pub mod error;
pub mod events;

pub use aimd::{AimdConfig, AimdController};
pub use error::{ConfigError, FetchError};
pub use events::{EventListener, EventListeners, FnListener, TrackedEvent};
