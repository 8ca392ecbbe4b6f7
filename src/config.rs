use chrono::Duration;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MATCH_DURATION_MINUTES: i64 = 120;
pub const DEFAULT_SLOT_STEP_MINUTES: i64 = 15;
pub const DEFAULT_SEARCH_HORIZON_HOURS: i64 = 48;

pub const MAX_MATCH_DURATION_MINUTES: i64 = 24 * 60;
pub const MAX_SLOT_STEP_MINUTES: i64 = 24 * 60;
pub const MAX_SEARCH_HORIZON_HOURS: i64 = 14 * 24;

/// Tunables for conflict detection and slot search.
/// Fields left out of a payload take the league defaults: 2h matches, 15 minute steps
/// and a 48h horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub match_duration_minutes: i64,
    pub slot_step_minutes: i64,
    pub search_horizon_hours: i64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            match_duration_minutes: DEFAULT_MATCH_DURATION_MINUTES,
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            search_horizon_hours: DEFAULT_SEARCH_HORIZON_HOURS,
        }
    }
}

impl SchedulerConfig {
    // Out-of-range values fall back to defaults so the search stays bounded and always advances.
    pub fn match_duration(&self) -> Duration {
        minutes_or_default(
            self.match_duration_minutes,
            MAX_MATCH_DURATION_MINUTES,
            DEFAULT_MATCH_DURATION_MINUTES,
        )
    }

    pub fn slot_step(&self) -> Duration {
        minutes_or_default(self.slot_step_minutes, MAX_SLOT_STEP_MINUTES, DEFAULT_SLOT_STEP_MINUTES)
    }

    pub fn search_horizon(&self) -> Duration {
        let hours = in_range_or(
            self.search_horizon_hours,
            MAX_SEARCH_HORIZON_HOURS,
            DEFAULT_SEARCH_HORIZON_HOURS,
        );
        Duration::try_hours(hours).unwrap_or(Duration::hours(DEFAULT_SEARCH_HORIZON_HOURS))
    }
}

fn minutes_or_default(value: i64, max: i64, fallback: i64) -> Duration {
    Duration::try_minutes(in_range_or(value, max, fallback)).unwrap_or(Duration::minutes(fallback))
}

fn in_range_or(value: i64, max: i64, fallback: i64) -> i64 {
    if value > 0 && value <= max { value } else { fallback }
}
