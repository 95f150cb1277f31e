//! Races a hyperlink chain between two Wikipedia articles by
//! concurrently crawling `action=query&prop=links` under a rate limit,
//! expanding the frontier breadth-first by page depth.

pub mod driver;
pub mod page;
pub mod racer;
pub mod visited;

pub use page::Page;
pub use racer::{Racer, RacerConfig};
pub use visited::VisitedSet;
