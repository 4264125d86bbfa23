use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinates {
    pub lat: f64,
    pub lon: f64,
}

impl GeoCoordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parses the string pair geocoders return. Non-finite or out-of-range
    /// values are rejected.
    pub fn parse(lat: &str, lon: &str) -> Option<Self> {
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;

        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        Some(Self { lat, lon })
    }
}

/// One entry of a Nominatim `/search` response. Coordinates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Error, Debug)]
pub enum GeoError {
    #[error("Geocoder request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Geocoder returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Geocoder returned unparsable coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: String, lon: String },
}
