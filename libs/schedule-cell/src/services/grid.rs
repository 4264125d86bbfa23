use serde::{Deserialize, Serialize};
use tracing::warn;

use shared_config::AppConfig;

use crate::error::ScheduleError;
use crate::models::{SlotKey, TimeSlot, DAYS_OF_WEEK};

/// How far a time may sit from a grid line and still snap onto it.
const SNAP_TOLERANCE: f64 = 1e-6;

/// The weekly grid: seven days, each cut into `slots_per_hour` cells per
/// hour between `day_start_hour` (inclusive) and `day_end_hour` (exclusive).
///
/// Times cross the API as real hours (`9.5`); everything inside the crate
/// keys on the integer [`SlotKey`] so equal cells always compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    slots_per_hour: u32,
    day_start_hour: u32,
    day_end_hour: u32,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            slots_per_hour: 2,
            day_start_hour: 5,
            day_end_hour: 23,
        }
    }
}

impl TimeGrid {
    pub fn new(slots_per_hour: u32, day_start_hour: u32, day_end_hour: u32) -> Result<Self, ScheduleError> {
        if slots_per_hour == 0 || slots_per_hour > 60 {
            return Err(ScheduleError::InvalidInput(format!(
                "slots per hour must be between 1 and 60, got {}",
                slots_per_hour
            )));
        }
        if day_start_hour >= day_end_hour || day_end_hour > 24 {
            return Err(ScheduleError::InvalidInput(format!(
                "day bounds {}..{} are not a valid day",
                day_start_hour, day_end_hour
            )));
        }

        Ok(Self {
            slots_per_hour,
            day_start_hour,
            day_end_hour,
        })
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.slots_per_hour, config.day_start_hour, config.day_end_hour)
            .unwrap_or_else(|e| {
                warn!("{}; falling back to the default grid", e);
                Self::default()
            })
    }

    pub fn slots_per_hour(&self) -> u32 {
        self.slots_per_hour
    }

    pub fn day_start_hour(&self) -> u32 {
        self.day_start_hour
    }

    pub fn day_end_hour(&self) -> u32 {
        self.day_end_hour
    }

    pub fn slots_per_day(&self) -> u16 {
        ((self.day_end_hour - self.day_start_hour) * self.slots_per_hour) as u16
    }

    pub fn slot_minutes(&self) -> f64 {
        60.0 / f64::from(self.slots_per_hour)
    }

    /// Hour value of the slot at `index`.
    pub fn time_of(&self, index: u16) -> f64 {
        f64::from(self.day_start_hour) + f64::from(index) / f64::from(self.slots_per_hour)
    }

    /// Canonical ordered slot start times for one day.
    pub fn times(&self) -> Vec<f64> {
        (0..self.slots_per_day()).map(|i| self.time_of(i)).collect()
    }

    /// Snaps `time` onto the grid. Times between grid lines or outside the
    /// day bounds have no index.
    pub fn slot_index(&self, time: f64) -> Option<u16> {
        if !time.is_finite() {
            return None;
        }

        let raw = (time - f64::from(self.day_start_hour)) * f64::from(self.slots_per_hour);
        let snapped = raw.round();
        if (raw - snapped).abs() > SNAP_TOLERANCE {
            return None;
        }
        if snapped < 0.0 || snapped >= f64::from(self.slots_per_day()) {
            return None;
        }

        Some(snapped as u16)
    }

    pub fn key(&self, day: u8, time: f64) -> Result<SlotKey, ScheduleError> {
        if usize::from(day) >= DAYS_OF_WEEK.len() {
            return Err(ScheduleError::InvalidDay(day));
        }
        self.slot_index(time)
            .map(|index| SlotKey::new(day, index))
            .ok_or(ScheduleError::SlotOutOfRange { day, time })
    }

    pub fn key_for(&self, slot: &TimeSlot) -> Result<SlotKey, ScheduleError> {
        self.key(slot.day, slot.time)
    }

    pub fn slot(&self, key: SlotKey) -> TimeSlot {
        TimeSlot::new(key.day, self.time_of(key.index))
    }

    pub fn contains(&self, key: &SlotKey) -> bool {
        usize::from(key.day) < DAYS_OF_WEEK.len() && key.index < self.slots_per_day()
    }

    /// Whole slots covered by a break of `break_minutes`; a partial slot
    /// does not count. Capped at one day since buffers never leave the day.
    pub fn buffer_slots(&self, break_minutes: u32) -> usize {
        let slots = u64::from(break_minutes) * u64::from(self.slots_per_hour) / 60;
        slots.min(u64::from(self.slots_per_day())) as usize
    }

    pub fn hours(&self, slot_count: usize) -> f64 {
        slot_count as f64 / f64::from(self.slots_per_hour)
    }

    /// All cells of the week, day-major.
    pub fn week(&self) -> impl Iterator<Item = SlotKey> {
        let slots_per_day = self.slots_per_day();
        (0..DAYS_OF_WEEK.len() as u8)
            .flat_map(move |day| (0..slots_per_day).map(move |index| SlotKey::new(day, index)))
    }
}
