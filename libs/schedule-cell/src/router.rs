use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, delete},
};

use crate::handlers;
use crate::services::store::ScheduleStore;

pub fn schedule_routes(store: Arc<ScheduleStore>) -> Router {
    Router::new()
        .route("/grid", get(handlers::get_grid))

        // Provider registry
        .route("/providers", get(handlers::list_providers).post(handlers::create_provider))
        .route("/providers/{provider_id}", get(handlers::get_provider).delete(handlers::delete_provider))

        // Cases
        .route("/providers/{provider_id}/cases", post(handlers::create_case))
        .route("/providers/{provider_id}/cases/{case_id}", delete(handlers::delete_case))

        // Schedule edits
        .route("/providers/{provider_id}/selections", post(handlers::apply_selection))
        .route(
            "/providers/{provider_id}/cells/{day}/{time}",
            get(handlers::get_cell).delete(handlers::remove_cell),
        )
        .with_state(store)
}
