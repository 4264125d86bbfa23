use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use mockall::mock;

use geo_cell::{CoordinateLookup, GeoCoordinates};
use matching_cell::{MatchEngine, MatchError, MatchSettings, NewCaseRequest, MAX_BREAK_MINUTES};
use schedule_cell::{Case, Provider, SlotKey, TimeGrid};
use shared_utils::test_utils::{TestAddress, ALBANY, ASTORIA, LONG_ISLAND_CITY};

/// Answers from a fixed table; anything else is unresolvable.
struct TableLookup(HashMap<String, GeoCoordinates>);

impl TableLookup {
    fn new(places: &[TestAddress]) -> Self {
        Self(
            places
                .iter()
                .map(|p| (p.address.to_string(), GeoCoordinates::new(p.lat, p.lon)))
                .collect(),
        )
    }
}

#[async_trait]
impl CoordinateLookup for TableLookup {
    async fn lookup(&self, address: &str) -> Option<GeoCoordinates> {
        self.0.get(address.trim()).copied()
    }
}

mock! {
    pub Geocoder {}

    #[async_trait]
    impl CoordinateLookup for Geocoder {
        async fn lookup(&self, address: &str) -> Option<GeoCoordinates>;
    }
}

fn engine(places: &[TestAddress]) -> MatchEngine {
    MatchEngine::new(TimeGrid::default(), Arc::new(TableLookup::new(places)))
}

fn keys(slots: &[(u8, f64)]) -> BTreeSet<SlotKey> {
    let grid = TimeGrid::default();
    slots.iter().map(|(day, time)| grid.key(*day, *time).unwrap()).collect()
}

/// `hours` of consecutive booked time starting 5:00 on `day`.
fn block(day: u8, hours: u16) -> BTreeSet<SlotKey> {
    (0..hours * 2).map(|index| SlotKey::new(day, index)).collect()
}

fn provider(name: &str, cases: Vec<(&str, BTreeSet<SlotKey>)>) -> Provider {
    let mut provider = Provider::new(name);
    for (address, schedule) in cases {
        let mut case = Case::new(format!("Case at {}", address), address, "blue");
        case.schedule = schedule;
        provider.cases.push(case);
    }
    provider
}

fn request(address: &str, hours: f64, availability: BTreeSet<SlotKey>) -> NewCaseRequest {
    NewCaseRequest {
        name: "New Case".to_string(),
        address: address.to_string(),
        required_hours_per_week: hours,
        availability,
    }
}

fn settings(radius: f64, break_minutes: u32) -> MatchSettings {
    MatchSettings {
        distance_radius_miles: radius,
        break_minutes,
    }
}

#[tokio::test]
async fn test_break_buffer_excludes_provider_short_on_free_time() {
    let engine = engine(&[ASTORIA, LONG_ISLAND_CITY]);
    let booked = provider(
        "Booked",
        vec![(LONG_ISLAND_CITY.address, keys(&[(0, 9.0), (0, 9.5)]))],
    );
    let open = provider("Open", vec![]);

    // 8:30..10:00 is blocked by the case plus a one-slot break, leaving 10:30
    let wanted = keys(&[(0, 9.0), (0, 9.5), (0, 10.0), (0, 10.5)]);
    let results = engine
        .find_matches(&[booked, open], &request(ASTORIA.address, 1.0, wanted), &settings(5.0, 30))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].provider_name, "Open");
    assert_eq!(results[0].available_hours, 2.0);
}

#[tokio::test]
async fn test_zero_break_only_blocks_booked_cells() {
    let engine = engine(&[ASTORIA, LONG_ISLAND_CITY]);
    let booked = provider(
        "Booked",
        vec![(LONG_ISLAND_CITY.address, keys(&[(0, 9.0), (0, 9.5)]))],
    );

    let wanted = keys(&[(0, 9.0), (0, 9.5), (0, 10.0), (0, 10.5)]);
    let results = engine
        .find_matches(&[booked], &request(ASTORIA.address, 1.0, wanted), &settings(5.0, 0))
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].available_hours, 1.0);
    assert_eq!(results[0].total_assigned_hours, 1.0);
    assert!(results[0].is_within_radius);
}

#[tokio::test]
async fn test_ranks_by_load_before_availability() {
    let engine = engine(&[ASTORIA, LONG_ISLAND_CITY]);
    let heavy = provider("Heavy", vec![(LONG_ISLAND_CITY.address, block(3, 10))]);
    let lighter = provider(
        "Lighter",
        vec![
            (LONG_ISLAND_CITY.address, block(4, 6)),
            (ASTORIA.address, keys(&[(0, 9.0), (0, 9.5), (0, 10.0), (0, 10.5)])),
        ],
    );

    let wanted = keys(&[(0, 12.0), (0, 12.5), (1, 12.0), (1, 12.5)]);
    let results = engine
        .find_matches(&[heavy, lighter], &request(ASTORIA.address, 1.0, wanted), &settings(5.0, 30))
        .await
        .unwrap();

    let names: Vec<_> = results.iter().map(|r| r.provider_name.as_str()).collect();
    assert_eq!(names, ["Lighter", "Heavy"]);
    assert_eq!(results[0].total_assigned_hours, 8.0);
    assert_eq!(results[1].total_assigned_hours, 10.0);
}

#[tokio::test]
async fn test_equal_load_prefers_more_availability() {
    let engine = engine(&[ASTORIA, LONG_ISLAND_CITY]);
    let crowded = provider(
        "Crowded",
        vec![(LONG_ISLAND_CITY.address, keys(&[(0, 13.0), (2, 7.0)]))],
    );
    let roomy = provider(
        "Roomy",
        vec![(LONG_ISLAND_CITY.address, keys(&[(2, 7.0), (2, 7.5)]))],
    );

    let wanted = keys(&[(0, 12.0), (0, 12.5), (0, 13.5), (0, 14.0)]);
    let results = engine
        .find_matches(&[crowded, roomy], &request(ASTORIA.address, 0.5, wanted), &settings(5.0, 30))
        .await
        .unwrap();

    let names: Vec<_> = results.iter().map(|r| r.provider_name.as_str()).collect();
    assert_eq!(names, ["Roomy", "Crowded"]);
    assert_eq!(results[0].available_hours, 2.0);
    assert_eq!(results[1].available_hours, 1.0);
}

#[tokio::test]
async fn test_case_outside_radius_excludes_provider() {
    let engine = engine(&[ASTORIA, LONG_ISLAND_CITY, ALBANY]);
    let upstate = provider(
        "Upstate",
        vec![
            (LONG_ISLAND_CITY.address, keys(&[(1, 9.0)])),
            (ALBANY.address, keys(&[(2, 9.0)])),
        ],
    );

    let results = engine
        .find_matches(&[upstate], &request(ASTORIA.address, 0.5, keys(&[(0, 9.0)])), &settings(5.0, 30))
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_unresolved_case_address_excludes_provider() {
    let engine = engine(&[ASTORIA]);
    let unknown = provider("Unknown", vec![("Nowhere Lane 1", keys(&[(1, 9.0)]))]);

    let results = engine
        .find_matches(&[unknown], &request(ASTORIA.address, 0.5, keys(&[(0, 9.0)])), &settings(500.0, 30))
        .await
        .unwrap();

    assert!(results.is_empty());
}

#[tokio::test]
async fn test_provider_without_cases_passes_distance_check() {
    let engine = engine(&[ASTORIA]);

    let results = engine
        .find_matches(
            &[provider("Fresh", vec![])],
            &request(ASTORIA.address, 0.0, BTreeSet::new()),
            &settings(0.0, 30),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].available_hours, 0.0);
    assert_eq!(results[0].total_assigned_hours, 0.0);
}

#[tokio::test]
async fn test_no_providers_is_an_empty_match() {
    let engine = engine(&[ASTORIA]);

    let results = engine
        .find_matches(&[], &request(ASTORIA.address, 1.0, keys(&[(0, 9.0)])), &settings(5.0, 30))
        .await;

    assert_eq!(results, Ok(vec![]));
}

#[tokio::test]
async fn test_unresolved_new_address_is_an_error() {
    let engine = engine(&[ASTORIA]);

    let result = engine
        .find_matches(
            &[provider("Fresh", vec![])],
            &request("  Atlantis  ", 1.0, keys(&[(0, 9.0)])),
            &settings(5.0, 30),
        )
        .await;

    assert_matches!(result, Err(MatchError::AddressUnresolved(address)) if address == "Atlantis");
}

#[tokio::test]
async fn test_rejects_invalid_requests() {
    let engine = engine(&[ASTORIA]);
    let providers = [provider("Fresh", vec![])];

    let blank = engine
        .find_matches(&providers, &request("   ", 1.0, BTreeSet::new()), &settings(5.0, 30))
        .await;
    assert_matches!(blank, Err(MatchError::InvalidRequest(_)));

    let negative = engine
        .find_matches(&providers, &request(ASTORIA.address, -1.0, BTreeSet::new()), &settings(5.0, 30))
        .await;
    assert_matches!(negative, Err(MatchError::InvalidRequest(_)));

    let bad_radius = engine
        .find_matches(&providers, &request(ASTORIA.address, 1.0, BTreeSet::new()), &settings(f64::NAN, 30))
        .await;
    assert_matches!(bad_radius, Err(MatchError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_rejects_breaks_longer_than_a_day() {
    let engine = engine(&[ASTORIA]);
    let providers = [provider("Fresh", vec![])];

    for break_minutes in [MAX_BREAK_MINUTES + 1, 3_000_000_000, u32::MAX] {
        let result = engine
            .find_matches(&providers, &request(ASTORIA.address, 1.0, BTreeSet::new()), &settings(5.0, break_minutes))
            .await;
        assert_matches!(result, Err(MatchError::InvalidRequest(reason)) if reason.contains("break"));
    }
}

#[tokio::test]
async fn test_full_day_break_blocks_only_booked_days() {
    let engine = engine(&[ASTORIA, LONG_ISLAND_CITY]);
    let booked = provider("Booked", vec![(LONG_ISLAND_CITY.address, keys(&[(0, 9.0)]))]);

    let wanted = keys(&[(0, 20.0), (0, 22.5), (1, 9.0)]);
    let results = engine
        .find_matches(
            &[booked],
            &request(ASTORIA.address, 0.5, wanted),
            &settings(5.0, MAX_BREAK_MINUTES),
        )
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].available_hours, 0.5);
}

#[tokio::test]
async fn test_unresolved_new_address_skips_provider_lookups() {
    let mut geocoder = MockGeocoder::new();
    geocoder
        .expect_lookup()
        .withf(|address| address.trim() == "Atlantis")
        .times(1)
        .returning(|_| None);

    let engine = MatchEngine::new(TimeGrid::default(), Arc::new(geocoder));
    let busy = provider("Busy", vec![(LONG_ISLAND_CITY.address, keys(&[(1, 9.0)]))]);

    let result = engine
        .find_matches(&[busy], &request("Atlantis", 1.0, BTreeSet::new()), &settings(5.0, 30))
        .await;

    assert_matches!(result, Err(MatchError::AddressUnresolved(_)));
}

#[tokio::test]
async fn test_looks_up_every_case_address() {
    let mut geocoder = MockGeocoder::new();
    geocoder
        .expect_lookup()
        .times(3)
        .returning(|_| Some(GeoCoordinates::new(ASTORIA.lat, ASTORIA.lon)));

    let engine = MatchEngine::new(TimeGrid::default(), Arc::new(geocoder));
    let first = provider("First", vec![(LONG_ISLAND_CITY.address, keys(&[(1, 9.0)]))]);
    let second = provider("Second", vec![(LONG_ISLAND_CITY.address, keys(&[(2, 9.0)]))]);

    let results = engine
        .find_matches(&[first, second], &request(ASTORIA.address, 0.5, keys(&[(0, 9.0)])), &settings(5.0, 30))
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
}
