use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "TherapistSchedulerApp/1.0";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub geocoder_timeout_secs: u64,
    pub slots_per_hour: u32,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub default_distance_radius_miles: f64,
    pub default_break_minutes: u32,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geocoder_base_url: DEFAULT_GEOCODER_BASE_URL.to_string(),
            geocoder_user_agent: DEFAULT_GEOCODER_USER_AGENT.to_string(),
            geocoder_timeout_secs: 10,
            slots_per_hour: 2,
            day_start_hour: 5,
            day_end_hour: 23,
            default_distance_radius_miles: 5.0,
            default_break_minutes: 30,
            server_port: 3000,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            geocoder_base_url: env::var("GEOCODER_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("GEOCODER_BASE_URL not set, using default");
                    defaults.geocoder_base_url.clone()
                }),
            geocoder_user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| defaults.geocoder_user_agent.clone()),
            geocoder_timeout_secs: parse_var("GEOCODER_TIMEOUT_SECS", defaults.geocoder_timeout_secs),
            slots_per_hour: parse_var("SLOTS_PER_HOUR", defaults.slots_per_hour),
            day_start_hour: parse_var("DAY_START_HOUR", defaults.day_start_hour),
            day_end_hour: parse_var("DAY_END_HOUR", defaults.day_end_hour),
            default_distance_radius_miles: parse_var(
                "DEFAULT_DISTANCE_RADIUS_MILES",
                defaults.default_distance_radius_miles,
            ),
            default_break_minutes: parse_var("DEFAULT_BREAK_MINUTES", defaults.default_break_minutes),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
        };

        if !config.is_grid_valid() {
            warn!(
                "Invalid time grid configuration ({} slots/hour, {}..{}), grid will use defaults",
                config.slots_per_hour, config.day_start_hour, config.day_end_hour
            );
        }

        config
    }

    /// True when the grid settings describe a usable day: at least one slot
    /// per hour, a non-empty day and an end hour no later than midnight.
    pub fn is_grid_valid(&self) -> bool {
        self.slots_per_hour > 0
            && self.slots_per_hour <= 60
            && self.day_start_hour < self.day_end_hour
            && self.day_end_hour <= 24
    }

    pub fn is_geocoder_configured(&self) -> bool {
        !self.geocoder_base_url.is_empty() && !self.geocoder_user_agent.is_empty()
    }
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value '{}', using default {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_valid() {
        assert!(AppConfig::default().is_grid_valid());
    }

    #[test]
    fn rejects_inverted_day_bounds() {
        let config = AppConfig {
            day_start_hour: 20,
            day_end_hour: 8,
            ..AppConfig::default()
        };
        assert!(!config.is_grid_valid());
    }

    #[test]
    fn rejects_zero_granularity() {
        let config = AppConfig {
            slots_per_hour: 0,
            ..AppConfig::default()
        };
        assert!(!config.is_grid_valid());
    }
}
