use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::models::{Case, CellRemoval, Provider, RangeEdit, Selection, SlotKey, CASE_COLORS};
use crate::services::conflict::ConflictResolver;
use crate::services::grid::TimeGrid;

/// In-memory provider registry. Loading and saving belong to the caller;
/// the store only holds plain data and keeps every edit atomic by resolving
/// and committing under one write lock.
pub struct ScheduleStore {
    grid: TimeGrid,
    resolver: ConflictResolver,
    providers: RwLock<Vec<Provider>>,
}

impl ScheduleStore {
    pub fn new(grid: TimeGrid) -> Self {
        Self::with_providers(grid, Vec::new())
    }

    pub fn with_providers(grid: TimeGrid, providers: Vec<Provider>) -> Self {
        Self {
            grid,
            resolver: ConflictResolver::new(grid),
            providers: RwLock::new(providers),
        }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    pub fn resolver(&self) -> &ConflictResolver {
        &self.resolver
    }

    // ==============================================================================
    // PROVIDERS
    // ==============================================================================

    pub async fn add_provider(&self, name: &str) -> Result<Provider, ScheduleError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ScheduleError::InvalidInput("provider name is required".to_string()));
        }

        let provider = Provider::new(name);
        self.providers.write().await.push(provider.clone());

        info!("Added provider {} ({})", provider.name, provider.id);
        Ok(provider)
    }

    pub async fn delete_provider(&self, provider_id: Uuid) -> Result<Provider, ScheduleError> {
        let mut providers = self.providers.write().await;
        let position = providers
            .iter()
            .position(|p| p.id == provider_id)
            .ok_or(ScheduleError::ProviderNotFound(provider_id))?;

        let removed = providers.remove(position);
        info!("Deleted provider {} with {} case(s)", removed.id, removed.cases.len());
        Ok(removed)
    }

    pub async fn provider(&self, provider_id: Uuid) -> Result<Provider, ScheduleError> {
        self.providers
            .read()
            .await
            .iter()
            .find(|p| p.id == provider_id)
            .cloned()
            .ok_or(ScheduleError::ProviderNotFound(provider_id))
    }

    /// Providers sorted by name, optionally narrowed by a case-insensitive
    /// name search.
    pub async fn list_providers(&self, search: Option<&str>) -> Vec<Provider> {
        let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

        let mut providers: Vec<Provider> = self
            .providers
            .read()
            .await
            .iter()
            .filter(|p| match &needle {
                Some(needle) => p.name.to_lowercase().contains(needle),
                None => true,
            })
            .cloned()
            .collect();

        providers.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        providers
    }

    /// Copy of every provider for read-only consumers such as matching.
    pub async fn snapshot(&self) -> Vec<Provider> {
        self.providers.read().await.clone()
    }

    pub async fn provider_hours(&self, provider_id: Uuid) -> Result<f64, ScheduleError> {
        let provider = self.provider(provider_id).await?;
        Ok(self.grid.hours(provider.scheduled_slots()))
    }

    // ==============================================================================
    // CASES
    // ==============================================================================

    pub async fn add_case(&self, provider_id: Uuid, name: &str, address: &str) -> Result<Case, ScheduleError> {
        let (name, address) = (name.trim(), address.trim());
        if name.is_empty() || address.is_empty() {
            return Err(ScheduleError::InvalidInput("case name and address are required".to_string()));
        }

        let mut providers = self.providers.write().await;
        let provider = Self::find_mut(&mut providers, provider_id)?;

        let color = CASE_COLORS[provider.cases.len() % CASE_COLORS.len()];
        let case = Case::new(name, address, color);
        provider.cases.push(case.clone());

        info!("Added case {} to provider {}", case.id, provider_id);
        Ok(case)
    }

    pub async fn delete_case(&self, provider_id: Uuid, case_id: Uuid) -> Result<Case, ScheduleError> {
        let mut providers = self.providers.write().await;
        let provider = Self::find_mut(&mut providers, provider_id)?;

        let position = provider
            .cases
            .iter()
            .position(|c| c.id == case_id)
            .ok_or(ScheduleError::CaseNotFound(case_id))?;

        let removed = provider.cases.remove(position);
        info!("Deleted case {} ({} slots freed)", removed.id, removed.slot_count());
        Ok(removed)
    }

    // ==============================================================================
    // SCHEDULE EDITS
    // ==============================================================================

    /// Applies a rectangle edit to the target case. Either the whole edit
    /// lands or, when it is rejected, nothing changes.
    pub async fn apply_selection(
        &self,
        provider_id: Uuid,
        target_case_id: Option<Uuid>,
        selection: &Selection,
    ) -> Result<RangeEdit, ScheduleError> {
        let mut providers = self.providers.write().await;
        let provider = Self::find_mut(&mut providers, provider_id)?;

        let edit = self.resolver.resolve(&provider.cases, target_case_id, selection)?;

        let case = provider
            .case_mut(edit.case_id)
            .ok_or(ScheduleError::CaseNotFound(edit.case_id))?;
        case.schedule = edit.schedule.clone();

        debug!(
            "Committed {:?} on case {}: {} cell(s) changed",
            edit.mode, edit.case_id, edit.changed
        );
        Ok(edit)
    }

    /// Removes one cell from whichever case holds it; `None` when the cell
    /// was free.
    pub async fn remove_cell(&self, provider_id: Uuid, key: SlotKey) -> Result<Option<CellRemoval>, ScheduleError> {
        let mut providers = self.providers.write().await;
        let provider = Self::find_mut(&mut providers, provider_id)?;

        let removal = self.resolver.remove_cell(&provider.cases, key)?;
        if let Some(removal) = &removal {
            if let Some(case) = provider.case_mut(removal.case_id) {
                case.schedule = removal.schedule.clone();
            }
            debug!("Removed cell {} from case {}", key, removal.case_id);
        }

        Ok(removal)
    }

    pub async fn occupant(&self, provider_id: Uuid, key: SlotKey) -> Result<Option<Case>, ScheduleError> {
        let providers = self.providers.read().await;
        let provider = providers
            .iter()
            .find(|p| p.id == provider_id)
            .ok_or(ScheduleError::ProviderNotFound(provider_id))?;

        Ok(provider.occupant(&key).cloned())
    }

    fn find_mut(providers: &mut [Provider], provider_id: Uuid) -> Result<&mut Provider, ScheduleError> {
        providers
            .iter_mut()
            .find(|p| p.id == provider_id)
            .ok_or(ScheduleError::ProviderNotFound(provider_id))
    }
}
