use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use schedule_cell::{SlotKey, TimeSlot};
use shared_config::AppConfig;

/// An incoming case looking for a provider. It becomes a `Case` only once
/// a provider is chosen and the case is created there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCaseRequest {
    pub name: String,
    pub address: String,
    pub required_hours_per_week: f64,
    pub availability: BTreeSet<SlotKey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    pub distance_radius_miles: f64,
    pub break_minutes: u32,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            distance_radius_miles: 5.0,
            break_minutes: 30,
        }
    }
}

impl MatchSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            distance_radius_miles: config.default_distance_radius_miles,
            break_minutes: config.default_break_minutes,
        }
    }
}

/// One ranked candidate. Computed per request and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub provider_id: Uuid,
    pub provider_name: String,
    pub total_assigned_hours: f64,
    pub available_hours: f64,
    pub is_within_radius: bool,
}

impl MatchResult {
    pub fn is_eligible(&self, required_hours: f64) -> bool {
        self.is_within_radius && self.available_hours >= required_hours
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTicket(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MatchStatus {
    Idle,
    Pending {
        request_id: u64,
    },
    Completed {
        request_id: u64,
        completed_at: DateTime<Utc>,
        results: Vec<MatchResult>,
    },
    Failed {
        request_id: u64,
        completed_at: DateTime<Utc>,
        reason: String,
    },
}

// API DTOs

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRequestBody {
    pub name: String,
    pub address: String,
    pub required_hours_per_week: f64,
    #[serde(default)]
    pub availability: Vec<TimeSlot>,
    pub distance_radius_miles: Option<f64>,
    pub break_minutes: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySelectionBody {
    #[serde(default)]
    pub availability: Vec<TimeSlot>,
    pub anchor: TimeSlot,
    pub corner: Option<TimeSlot>,
}
