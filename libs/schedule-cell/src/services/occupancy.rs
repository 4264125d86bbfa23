use std::collections::HashSet;

use crate::models::{Case, Provider, SlotKey};
use crate::services::grid::TimeGrid;

/// Cells a provider cannot offer to a new case: every booked cell plus
/// `buffer_slots` break cells on each side of it, on the same day only.
/// A buffer longer than the day is capped at the day length.
///
/// Derived from the cases on every call; callers rebuild it whenever a
/// schedule changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleIndex {
    occupied: HashSet<SlotKey>,
    buffer_slots: usize,
}

impl ScheduleIndex {
    pub fn build<'a, I>(grid: &TimeGrid, cases: I, buffer_slots: usize) -> Self
    where
        I: IntoIterator<Item = &'a Case>,
    {
        let slots_per_day = grid.slots_per_day();
        let buffer_slots = buffer_slots.min(usize::from(slots_per_day));
        let mut occupied = HashSet::new();

        for case in cases {
            for key in &case.schedule {
                occupied.insert(*key);
                for i in 1..=buffer_slots as i32 {
                    occupied.extend(key.offset(-i, slots_per_day));
                    occupied.extend(key.offset(i, slots_per_day));
                }
            }
        }

        Self { occupied, buffer_slots }
    }

    pub fn for_provider(grid: &TimeGrid, provider: &Provider, buffer_slots: usize) -> Self {
        Self::build(grid, &provider.cases, buffer_slots)
    }

    pub fn buffer_slots(&self) -> usize {
        self.buffer_slots
    }

    pub fn is_occupied(&self, key: &SlotKey) -> bool {
        self.occupied.contains(key)
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SlotKey> {
        self.occupied.iter()
    }

    /// How many of `wanted` are still free.
    pub fn free_count<'a, I>(&self, wanted: I) -> usize
    where
        I: IntoIterator<Item = &'a SlotKey>,
    {
        wanted.into_iter().filter(|key| !self.is_occupied(key)).count()
    }
}
