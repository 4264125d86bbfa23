pub mod engine;
pub mod tracker;

pub use engine::{rank, MatchEngine, MAX_BREAK_MINUTES};
pub use tracker::MatchTracker;
