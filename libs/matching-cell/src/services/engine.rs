use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, info, instrument};

use geo_cell::{within_radius, CoordinateLookup, GeoCoordinates};
use schedule_cell::{Provider, ScheduleIndex, TimeGrid};

use crate::error::MatchError;
use crate::models::{MatchResult, MatchSettings, NewCaseRequest};

/// Longest break a request may ask for.
pub const MAX_BREAK_MINUTES: u32 = 24 * 60;

/// Ranks providers for a new case by proximity, free time and current load.
///
/// Works on a snapshot of providers; nothing here mutates schedules.
#[derive(Clone)]
pub struct MatchEngine {
    grid: TimeGrid,
    lookup: Arc<dyn CoordinateLookup>,
}

impl MatchEngine {
    pub fn new(grid: TimeGrid, lookup: Arc<dyn CoordinateLookup>) -> Self {
        Self { grid, lookup }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Eligible providers, least loaded first. An empty list is a valid
    /// answer meaning nobody fits.
    #[instrument(skip_all, fields(case = %request.name))]
    pub async fn find_matches(
        &self,
        providers: &[Provider],
        request: &NewCaseRequest,
        settings: &MatchSettings,
    ) -> Result<Vec<MatchResult>, MatchError> {
        Self::validate(request, settings)?;

        let origin = self
            .lookup
            .lookup(&request.address)
            .await
            .ok_or_else(|| MatchError::AddressUnresolved(request.address.trim().to_string()))?;

        let buffer_slots = self.grid.buffer_slots(settings.break_minutes);
        debug!(
            "Evaluating {} provider(s) with a {}-slot break buffer",
            providers.len(),
            buffer_slots
        );

        let evaluations = providers.iter().map(|provider| {
            self.evaluate(provider, &origin, request, buffer_slots, settings.distance_radius_miles)
        });
        let mut results: Vec<MatchResult> = join_all(evaluations)
            .await
            .into_iter()
            .filter(|result| result.is_eligible(request.required_hours_per_week))
            .collect();

        rank(&mut results);

        info!(
            "Found {} eligible provider(s) out of {}",
            results.len(),
            providers.len()
        );
        Ok(results)
    }

    async fn evaluate(
        &self,
        provider: &Provider,
        origin: &GeoCoordinates,
        request: &NewCaseRequest,
        buffer_slots: usize,
        radius_miles: f64,
    ) -> MatchResult {
        let is_within_radius = self.cases_within_radius(provider, origin, radius_miles).await;

        let index = ScheduleIndex::for_provider(&self.grid, provider, buffer_slots);
        let free = index.free_count(&request.availability);

        MatchResult {
            provider_id: provider.id,
            provider_name: provider.name.clone(),
            total_assigned_hours: self.grid.hours(provider.scheduled_slots()),
            available_hours: self.grid.hours(free),
            is_within_radius,
        }
    }

    /// Every existing case must sit inside the radius. A case whose address
    /// cannot be resolved counts as infinitely far away.
    async fn cases_within_radius(&self, provider: &Provider, origin: &GeoCoordinates, radius_miles: f64) -> bool {
        let lookups = provider
            .cases
            .iter()
            .map(|case| self.lookup.lookup(&case.address));
        let coordinates = join_all(lookups).await;

        let within = coordinates
            .iter()
            .all(|coords| within_radius(Some(origin), coords.as_ref(), radius_miles));

        if !within {
            debug!("Provider {} has a case outside {} miles", provider.id, radius_miles);
        }
        within
    }

    fn validate(request: &NewCaseRequest, settings: &MatchSettings) -> Result<(), MatchError> {
        if request.address.trim().is_empty() {
            return Err(MatchError::InvalidRequest("address is required".to_string()));
        }
        if !request.required_hours_per_week.is_finite() || request.required_hours_per_week < 0.0 {
            return Err(MatchError::InvalidRequest(format!(
                "required hours must be a non-negative number, got {}",
                request.required_hours_per_week
            )));
        }
        if !settings.distance_radius_miles.is_finite() || settings.distance_radius_miles < 0.0 {
            return Err(MatchError::InvalidRequest(format!(
                "distance radius must be a non-negative number, got {}",
                settings.distance_radius_miles
            )));
        }
        if settings.break_minutes > MAX_BREAK_MINUTES {
            return Err(MatchError::InvalidRequest(format!(
                "break must be at most {} minutes, got {}",
                MAX_BREAK_MINUTES, settings.break_minutes
            )));
        }
        Ok(())
    }
}

/// Ascending total assigned hours, then descending available hours. The
/// sort is stable so full ties keep their input order.
pub fn rank(results: &mut [MatchResult]) {
    results.sort_by(|a, b| {
        a.total_assigned_hours
            .total_cmp(&b.total_assigned_hours)
            .then_with(|| b.available_hours.total_cmp(&a.available_hours))
    });
}
