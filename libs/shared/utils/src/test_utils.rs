use std::sync::Arc;

use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use shared_config::AppConfig;

pub struct TestConfig {
    pub geocoder_base_url: String,
    pub geocoder_user_agent: String,
    pub default_distance_radius_miles: f64,
    pub default_break_minutes: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            geocoder_base_url: "http://localhost:8089".to_string(),
            geocoder_user_agent: "SchedulerTests/1.0".to_string(),
            default_distance_radius_miles: 5.0,
            default_break_minutes: 30,
        }
    }
}

impl TestConfig {
    pub fn with_geocoder(base_url: impl Into<String>) -> Self {
        Self {
            geocoder_base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            geocoder_base_url: self.geocoder_base_url.clone(),
            geocoder_user_agent: self.geocoder_user_agent.clone(),
            geocoder_timeout_secs: 2,
            default_distance_radius_miles: self.default_distance_radius_miles,
            default_break_minutes: self.default_break_minutes,
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// A real Queens address with the coordinates a geocoder would return.
#[derive(Debug, Clone, Copy)]
pub struct TestAddress {
    pub address: &'static str,
    pub lat: f64,
    pub lon: f64,
}

pub const ASTORIA: TestAddress = TestAddress {
    address: "30-10 30th Ave, Astoria, NY 11102",
    lat: 40.7671,
    lon: -73.9213,
};

pub const LONG_ISLAND_CITY: TestAddress = TestAddress {
    address: "45-18 Court Sq W, Long Island City, NY 11101",
    lat: 40.7471,
    lon: -73.9456,
};

pub const FLUSHING: TestAddress = TestAddress {
    address: "40-22 Main St, Flushing, NY 11354",
    lat: 40.7580,
    lon: -73.8303,
};

pub const FOREST_HILLS: TestAddress = TestAddress {
    address: "70-10 Austin St, Forest Hills, NY 11375",
    lat: 40.7196,
    lon: -73.8448,
};

/// Far outside any realistic radius from Queens.
pub const ALBANY: TestAddress = TestAddress {
    address: "1 Empire State Plaza, Albany, NY 12223",
    lat: 42.6507,
    lon: -73.7594,
};

pub struct MockGeocoderResponses;

impl MockGeocoderResponses {
    pub fn place_response(place: &TestAddress) -> serde_json::Value {
        json!([{
            "lat": place.lat.to_string(),
            "lon": place.lon.to_string(),
            "display_name": place.address
        }])
    }

    pub fn empty_response() -> serde_json::Value {
        json!([])
    }

    /// Mounts a Nominatim-style `/search` answer for `place`.
    pub async fn mount_place(mock_server: &MockServer, place: &TestAddress) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", place.address))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::place_response(place)))
            .mount(mock_server)
            .await;
    }

    /// Mounts an empty answer for `address`, i.e. "no such place".
    pub async fn mount_unknown(mock_server: &MockServer, address: &str) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", address))
            .respond_with(ResponseTemplate::new(200).set_body_json(Self::empty_response()))
            .mount(mock_server)
            .await;
    }
}
