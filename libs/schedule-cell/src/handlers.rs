use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::error::AppError;

use crate::models::{
    CaseView, CreateCaseRequest, CreateProviderRequest, ProviderSummary, ProviderView,
    Selection, SelectionRequest, DAYS_OF_WEEK,
};
use crate::services::store::ScheduleStore;

#[derive(Debug, Deserialize)]
pub struct ProviderSearchQuery {
    pub search: Option<String>,
}

// ==============================================================================
// GRID
// ==============================================================================

#[axum::debug_handler]
pub async fn get_grid(
    State(store): State<Arc<ScheduleStore>>,
) -> Result<Json<Value>, AppError> {
    let grid = store.grid();

    Ok(Json(json!({
        "days": DAYS_OF_WEEK,
        "times": grid.times(),
        "slots_per_hour": grid.slots_per_hour(),
        "slot_minutes": grid.slot_minutes(),
        "day_start_hour": grid.day_start_hour(),
        "day_end_hour": grid.day_end_hour(),
    })))
}

// ==============================================================================
// PROVIDERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_providers(
    State(store): State<Arc<ScheduleStore>>,
    Query(query): Query<ProviderSearchQuery>,
) -> Result<Json<Value>, AppError> {
    let providers = store.list_providers(query.search.as_deref()).await;
    let summaries: Vec<ProviderSummary> = providers
        .iter()
        .map(|p| ProviderSummary::new(store.grid(), p))
        .collect();

    Ok(Json(json!({
        "providers": summaries,
        "total": summaries.len()
    })))
}

#[axum::debug_handler]
pub async fn create_provider(
    State(store): State<Arc<ScheduleStore>>,
    Json(request): Json<CreateProviderRequest>,
) -> Result<Json<Value>, AppError> {
    let provider = store.add_provider(&request.name).await?;
    Ok(Json(json!(ProviderView::new(store.grid(), &provider))))
}

#[axum::debug_handler]
pub async fn get_provider(
    State(store): State<Arc<ScheduleStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let provider = store.provider(provider_id).await?;
    Ok(Json(json!(ProviderView::new(store.grid(), &provider))))
}

#[axum::debug_handler]
pub async fn delete_provider(
    State(store): State<Arc<ScheduleStore>>,
    Path(provider_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let removed = store.delete_provider(provider_id).await?;

    Ok(Json(json!({
        "deleted": removed.id,
        "cases_removed": removed.cases.len()
    })))
}

// ==============================================================================
// CASES
// ==============================================================================

#[axum::debug_handler]
pub async fn create_case(
    State(store): State<Arc<ScheduleStore>>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<CreateCaseRequest>,
) -> Result<Json<Value>, AppError> {
    let case = store.add_case(provider_id, &request.name, &request.address).await?;
    Ok(Json(json!(CaseView::new(store.grid(), &case))))
}

#[axum::debug_handler]
pub async fn delete_case(
    State(store): State<Arc<ScheduleStore>>,
    Path((provider_id, case_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Value>, AppError> {
    let removed = store.delete_case(provider_id, case_id).await?;

    Ok(Json(json!({
        "deleted": removed.id,
        "hours_freed": store.grid().hours(removed.slot_count())
    })))
}

// ==============================================================================
// SCHEDULE EDITS
// ==============================================================================

#[axum::debug_handler]
pub async fn apply_selection(
    State(store): State<Arc<ScheduleStore>>,
    Path(provider_id): Path<Uuid>,
    Json(request): Json<SelectionRequest>,
) -> Result<Json<Value>, AppError> {
    let grid = store.grid();
    let anchor = grid.key_for(&request.anchor)?;
    let corner = match &request.corner {
        Some(corner) => grid.key_for(corner)?,
        None => anchor,
    };

    let edit = store
        .apply_selection(provider_id, request.target_case_id, &Selection::new(anchor, corner))
        .await?;

    let schedule: Vec<_> = edit.schedule.iter().map(|key| grid.slot(*key)).collect();

    Ok(Json(json!({
        "case_id": edit.case_id,
        "mode": edit.mode,
        "changed": edit.changed,
        "skipped": edit.skipped,
        "schedule": schedule,
        "hours": grid.hours(edit.schedule.len())
    })))
}

#[axum::debug_handler]
pub async fn get_cell(
    State(store): State<Arc<ScheduleStore>>,
    Path((provider_id, day, time)): Path<(Uuid, u8, f64)>,
) -> Result<Json<Value>, AppError> {
    let key = store.grid().key(day, time)?;
    let occupant = store.occupant(provider_id, key).await?;

    Ok(Json(json!({
        "day": day,
        "time": time,
        "occupied": occupant.is_some(),
        "case": occupant.map(|c| CaseView::new(store.grid(), &c)),
    })))
}

#[axum::debug_handler]
pub async fn remove_cell(
    State(store): State<Arc<ScheduleStore>>,
    Path((provider_id, day, time)): Path<(Uuid, u8, f64)>,
) -> Result<Json<Value>, AppError> {
    let key = store.grid().key(day, time)?;

    match store.remove_cell(provider_id, key).await? {
        Some(removal) => Ok(Json(json!({
            "removed": true,
            "case_id": removal.case_id,
            "case_name": removal.case_name,
            "hours": store.grid().hours(removal.schedule.len())
        }))),
        None => Ok(Json(json!({ "removed": false }))),
    }
}
