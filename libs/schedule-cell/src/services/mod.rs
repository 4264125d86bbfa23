pub mod grid;
pub mod occupancy;
pub mod conflict;
pub mod store;

pub use grid::TimeGrid;
pub use occupancy::ScheduleIndex;
pub use conflict::ConflictResolver;
pub use store::ScheduleStore;
