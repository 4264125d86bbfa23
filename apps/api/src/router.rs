use std::sync::Arc;

use axum::{
    Router,
    routing::get,
    Json,
};
use serde_json::{json, Value};

use geo_cell::{CachedLookup, NominatimClient};
use matching_cell::{matching_routes, MatchSettings, MatchingState};
use schedule_cell::{schedule_routes, ScheduleStore, TimeGrid};
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    let grid = TimeGrid::from_config(&config);
    let store = Arc::new(ScheduleStore::new(grid));
    let lookup = Arc::new(CachedLookup::new(NominatimClient::new(&config)));

    let matching_state = Arc::new(MatchingState::new(
        store.clone(),
        lookup,
        MatchSettings::from_config(&config),
    ));

    Router::new()
        .route("/", get(health_check))
        .merge(schedule_routes(store))
        .merge(matching_routes(matching_state))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "scheduler-api"
    }))
}
