use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers;
use crate::state::MatchingState;

pub fn matching_routes(state: Arc<MatchingState>) -> Router {
    Router::new()
        .route("/matches", post(handlers::find_matches))
        .route("/matches/latest", get(handlers::latest_match))
        .route("/availability/selections", post(handlers::toggle_availability))
        .with_state(state)
}
