use std::collections::BTreeSet;
use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::debug;

use schedule_cell::{ScheduleError, Selection, SlotKey, TimeGrid, TimeSlot};
use shared_models::error::AppError;

use crate::models::{AvailabilitySelectionBody, MatchRequestBody, MatchSettings, NewCaseRequest};
use crate::state::MatchingState;

fn to_keys(grid: &TimeGrid, slots: &[TimeSlot]) -> Result<BTreeSet<SlotKey>, ScheduleError> {
    slots.iter().map(|slot| grid.key_for(slot)).collect()
}

// ==============================================================================
// MATCHING
// ==============================================================================

#[axum::debug_handler]
pub async fn find_matches(
    State(state): State<Arc<MatchingState>>,
    Json(body): Json<MatchRequestBody>,
) -> Result<Json<Value>, AppError> {
    let availability = to_keys(state.engine.grid(), &body.availability)?;

    let settings = MatchSettings {
        distance_radius_miles: body
            .distance_radius_miles
            .unwrap_or(state.defaults.distance_radius_miles),
        break_minutes: body.break_minutes.unwrap_or(state.defaults.break_minutes),
    };
    let request = NewCaseRequest {
        name: body.name,
        address: body.address,
        required_hours_per_week: body.required_hours_per_week,
        availability,
    };

    let ticket = state.tracker.begin().await;
    let providers = state.store.snapshot().await;
    let outcome = state.engine.find_matches(&providers, &request, &settings).await;

    state.tracker.complete(ticket, &outcome).await?;
    let results = outcome?;

    let status = if results.is_empty() { "no_match" } else { "matched" };
    debug!("Match request {} finished: {}", ticket.0, status);

    Ok(Json(json!({
        "request_id": ticket.0,
        "status": status,
        "settings": settings,
        "results": results,
        "total": results.len()
    })))
}

#[axum::debug_handler]
pub async fn latest_match(
    State(state): State<Arc<MatchingState>>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(json!(state.tracker.status().await)))
}

// ==============================================================================
// AVAILABILITY PICKER
// ==============================================================================

#[axum::debug_handler]
pub async fn toggle_availability(
    State(state): State<Arc<MatchingState>>,
    Json(body): Json<AvailabilitySelectionBody>,
) -> Result<Json<Value>, AppError> {
    let grid = state.store.grid();
    let current = to_keys(grid, &body.availability)?;

    let anchor = grid.key_for(&body.anchor)?;
    let corner = match &body.corner {
        Some(corner) => grid.key_for(corner)?,
        None => anchor,
    };

    let updated = state
        .store
        .resolver()
        .toggle_range(&current, &Selection::new(anchor, corner))?;
    let slots: Vec<TimeSlot> = updated.iter().map(|key| grid.slot(*key)).collect();

    Ok(Json(json!({
        "availability": slots,
        "hours": grid.hours(updated.len())
    })))
}
