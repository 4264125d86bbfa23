use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::grid::TimeGrid;

pub const DAYS_OF_WEEK: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

pub const CASE_COLORS: [&str; 10] = [
    "blue", "green", "yellow", "pink", "purple",
    "indigo", "teal", "orange", "red", "cyan",
];

/// Quantized address of one grid cell: the weekday (0 = Monday) and the
/// slot index counted from the start of the grid day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey {
    pub day: u8,
    pub index: u16,
}

impl SlotKey {
    pub fn new(day: u8, index: u16) -> Self {
        Self { day, index }
    }

    /// Same-day neighbour `delta` slots away, if it stays within the day.
    pub fn offset(self, delta: i32, slots_per_day: u16) -> Option<SlotKey> {
        let index = i32::from(self.index) + delta;
        if index < 0 || index >= i32::from(slots_per_day) {
            return None;
        }
        Some(SlotKey::new(self.day, index as u16))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.day, self.index)
    }
}

/// Wire form of a cell: `time` is hours since midnight, e.g. `9.5` for 9:30.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: u8,
    pub time: f64,
}

impl TimeSlot {
    pub fn new(day: u8, time: f64) -> Self {
        Self { day, time }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub color: String,
    pub schedule: BTreeSet<SlotKey>,
}

impl Case {
    pub fn new(name: impl Into<String>, address: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            color: color.into(),
            schedule: BTreeSet::new(),
        }
    }

    pub fn occupies(&self, key: &SlotKey) -> bool {
        self.schedule.contains(key)
    }

    pub fn slot_count(&self) -> usize {
        self.schedule.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub name: String,
    pub cases: Vec<Case>,
}

impl Provider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cases: Vec::new(),
        }
    }

    pub fn case(&self, case_id: Uuid) -> Option<&Case> {
        self.cases.iter().find(|c| c.id == case_id)
    }

    pub fn case_mut(&mut self, case_id: Uuid) -> Option<&mut Case> {
        self.cases.iter_mut().find(|c| c.id == case_id)
    }

    /// The case holding `key`, if any.
    pub fn occupant(&self, key: &SlotKey) -> Option<&Case> {
        self.cases.iter().find(|c| c.occupies(key))
    }

    pub fn scheduled_slots(&self) -> usize {
        self.cases.iter().map(Case::slot_count).sum()
    }
}

/// Rectangle picked by a drag gesture. `anchor` is the cell the gesture
/// started on and decides whether the edit adds or removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: SlotKey,
    pub corner: SlotKey,
}

impl Selection {
    pub fn new(anchor: SlotKey, corner: SlotKey) -> Self {
        Self { anchor, corner }
    }

    pub fn single(key: SlotKey) -> Self {
        Self { anchor: key, corner: key }
    }

    pub fn min_day(&self) -> u8 {
        self.anchor.day.min(self.corner.day)
    }

    pub fn max_day(&self) -> u8 {
        self.anchor.day.max(self.corner.day)
    }

    pub fn min_index(&self) -> u16 {
        self.anchor.index.min(self.corner.index)
    }

    pub fn max_index(&self) -> u16 {
        self.anchor.index.max(self.corner.index)
    }

    pub fn contains(&self, key: &SlotKey) -> bool {
        (self.min_day()..=self.max_day()).contains(&key.day)
            && (self.min_index()..=self.max_index()).contains(&key.index)
    }

    /// Every cell of the rectangle, day-major.
    pub fn cells(&self) -> impl Iterator<Item = SlotKey> {
        let (min_index, max_index) = (self.min_index(), self.max_index());
        (self.min_day()..=self.max_day())
            .flat_map(move |day| (min_index..=max_index).map(move |index| SlotKey::new(day, index)))
    }

    pub fn cell_count(&self) -> usize {
        let days = usize::from(self.max_day() - self.min_day()) + 1;
        let slots = usize::from(self.max_index() - self.min_index()) + 1;
        days * slots
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    Add,
    Remove,
}

/// Result of resolving a selection against one provider's cases. Only the
/// target case's schedule is carried; other cases are never touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeEdit {
    pub case_id: Uuid,
    pub mode: EditMode,
    pub schedule: BTreeSet<SlotKey>,
    pub changed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellRemoval {
    pub case_id: Uuid,
    pub case_name: String,
    pub cell: SlotKey,
    pub schedule: BTreeSet<SlotKey>,
}

// Request DTOs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProviderRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCaseRequest {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub target_case_id: Option<Uuid>,
    pub anchor: TimeSlot,
    pub corner: Option<TimeSlot>,
}

// Response DTOs with times rendered back to hours

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseView {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub color: String,
    pub schedule: Vec<TimeSlot>,
    pub hours: f64,
}

impl CaseView {
    pub fn new(grid: &TimeGrid, case: &Case) -> Self {
        Self {
            id: case.id,
            name: case.name.clone(),
            address: case.address.clone(),
            color: case.color.clone(),
            schedule: case.schedule.iter().map(|key| grid.slot(*key)).collect(),
            hours: grid.hours(case.slot_count()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderView {
    pub id: Uuid,
    pub name: String,
    pub total_hours: f64,
    pub cases: Vec<CaseView>,
}

impl ProviderView {
    pub fn new(grid: &TimeGrid, provider: &Provider) -> Self {
        Self {
            id: provider.id,
            name: provider.name.clone(),
            total_hours: grid.hours(provider.scheduled_slots()),
            cases: provider.cases.iter().map(|c| CaseView::new(grid, c)).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: Uuid,
    pub name: String,
    pub case_count: usize,
    pub total_hours: f64,
}

impl ProviderSummary {
    pub fn new(grid: &TimeGrid, provider: &Provider) -> Self {
        Self {
            id: provider.id,
            name: provider.name.clone(),
            case_count: provider.cases.len(),
            total_hours: grid.hours(provider.scheduled_slots()),
        }
    }
}
