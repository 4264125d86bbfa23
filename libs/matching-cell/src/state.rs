use std::sync::Arc;

use geo_cell::CoordinateLookup;
use schedule_cell::ScheduleStore;

use crate::models::MatchSettings;
use crate::services::{MatchEngine, MatchTracker};

pub struct MatchingState {
    pub store: Arc<ScheduleStore>,
    pub engine: MatchEngine,
    pub tracker: MatchTracker,
    pub defaults: MatchSettings,
}

impl MatchingState {
    /// The engine shares the store's grid so availability keys line up with
    /// the keys in provider schedules.
    pub fn new(store: Arc<ScheduleStore>, lookup: Arc<dyn CoordinateLookup>, defaults: MatchSettings) -> Self {
        let engine = MatchEngine::new(*store.grid(), lookup);
        Self {
            store,
            engine,
            tracker: MatchTracker::new(),
            defaults,
        }
    }
}
