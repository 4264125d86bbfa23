use std::collections::BTreeSet;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ScheduleError;
use crate::models::{Case, CellRemoval, EditMode, RangeEdit, Selection, SlotKey};
use crate::services::grid::TimeGrid;

/// Turns selection gestures into schedule edits for one target case while
/// keeping a provider's cases disjoint.
///
/// The anchor cell decides the direction for the whole rectangle: a free
/// anchor adds, an occupied anchor removes. Per cell, adds skip anything
/// already held by any case and removes only touch the target's own cells.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    grid: TimeGrid,
}

impl ConflictResolver {
    pub fn new(grid: TimeGrid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &TimeGrid {
        &self.grid
    }

    /// Computes the target case's new schedule, with the direction taken
    /// from the anchor cell. Nothing is mutated; the caller commits
    /// `RangeEdit::schedule` as a whole.
    pub fn resolve(
        &self,
        cases: &[Case],
        target_case_id: Option<Uuid>,
        selection: &Selection,
    ) -> Result<RangeEdit, ScheduleError> {
        let mode = if Self::occupant(cases, &selection.anchor).is_some() {
            EditMode::Remove
        } else {
            EditMode::Add
        };

        self.apply(cases, target_case_id, selection, mode)
    }

    /// Same as [`resolve`](Self::resolve) with the direction given.
    pub fn apply(
        &self,
        cases: &[Case],
        target_case_id: Option<Uuid>,
        selection: &Selection,
        mode: EditMode,
    ) -> Result<RangeEdit, ScheduleError> {
        let target_case_id = target_case_id.ok_or_else(|| {
            warn!("Rejected range edit: no target case selected");
            ScheduleError::InvalidSelection
        })?;
        self.validate(selection)?;

        let target = cases
            .iter()
            .find(|c| c.id == target_case_id)
            .ok_or(ScheduleError::CaseNotFound(target_case_id))?;

        let mut schedule = target.schedule.clone();
        let mut changed = 0;
        let mut skipped = 0;

        for cell in selection.cells() {
            let applied = match mode {
                EditMode::Add => {
                    Self::occupant(cases, &cell).is_none() && schedule.insert(cell)
                }
                EditMode::Remove => schedule.remove(&cell),
            };
            if applied {
                changed += 1;
            } else {
                skipped += 1;
            }
        }

        debug!(
            "Resolved {:?} of {} cells for case {}: {} changed, {} skipped",
            mode,
            selection.cell_count(),
            target_case_id,
            changed,
            skipped
        );

        Ok(RangeEdit {
            case_id: target_case_id,
            mode,
            schedule,
            changed,
            skipped,
        })
    }

    /// Drops the single cell `key` from whichever case holds it.
    pub fn remove_cell(&self, cases: &[Case], key: SlotKey) -> Result<Option<CellRemoval>, ScheduleError> {
        self.validate(&Selection::single(key))?;

        Ok(Self::occupant(cases, &key).map(|case| {
            let mut schedule = case.schedule.clone();
            schedule.remove(&key);
            CellRemoval {
                case_id: case.id,
                case_name: case.name.clone(),
                cell: key,
                schedule,
            }
        }))
    }

    pub fn occupant<'a>(cases: &'a [Case], key: &SlotKey) -> Option<&'a Case> {
        cases.iter().find(|c| c.occupies(key))
    }

    /// The same anchor toggle over a free-standing set with no owners,
    /// used for a new case's availability.
    pub fn toggle_range(
        &self,
        current: &BTreeSet<SlotKey>,
        selection: &Selection,
    ) -> Result<BTreeSet<SlotKey>, ScheduleError> {
        self.validate(selection)?;

        let mut updated = current.clone();
        if current.contains(&selection.anchor) {
            for cell in selection.cells() {
                updated.remove(&cell);
            }
        } else {
            updated.extend(selection.cells());
        }

        Ok(updated)
    }

    fn validate(&self, selection: &Selection) -> Result<(), ScheduleError> {
        for key in [selection.anchor, selection.corner] {
            if usize::from(key.day) >= crate::models::DAYS_OF_WEEK.len() {
                return Err(ScheduleError::InvalidDay(key.day));
            }
            if !self.grid.contains(&key) {
                let slot = self.grid.slot(key);
                return Err(ScheduleError::SlotOutOfRange { day: slot.day, time: slot.time });
            }
        }
        Ok(())
    }
}
