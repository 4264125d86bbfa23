use std::sync::Arc;

use assert_matches::assert_matches;
use uuid::Uuid;

use matching_cell::{MatchError, MatchResult, MatchStatus, MatchTicket, MatchTracker};

fn result(name: &str) -> MatchResult {
    MatchResult {
        provider_id: Uuid::new_v4(),
        provider_name: name.to_string(),
        total_assigned_hours: 2.0,
        available_hours: 4.0,
        is_within_radius: true,
    }
}

#[tokio::test]
async fn test_starts_idle() {
    let tracker = MatchTracker::new();
    assert_eq!(tracker.status().await, MatchStatus::Idle);
}

#[tokio::test]
async fn test_latest_request_publishes() {
    let tracker = MatchTracker::new();

    let ticket = tracker.begin().await;
    assert_eq!(tracker.status().await, MatchStatus::Pending { request_id: 1 });

    tracker.complete(ticket, &Ok(vec![result("Dr. Chen")])).await.unwrap();

    assert_matches!(
        tracker.status().await,
        MatchStatus::Completed { request_id: 1, results, .. } if results[0].provider_name == "Dr. Chen"
    );
}

#[tokio::test]
async fn test_stale_request_cannot_overwrite_newer_results() {
    let tracker = MatchTracker::new();

    let older = tracker.begin().await;
    let newer = tracker.begin().await;

    tracker.complete(newer, &Ok(vec![result("Newer")])).await.unwrap();
    let stale = tracker.complete(older, &Ok(vec![result("Older")])).await;

    assert_eq!(stale, Err(MatchError::Superseded { request_id: 1, latest: 2 }));
    assert_matches!(
        tracker.status().await,
        MatchStatus::Completed { request_id: 2, results, .. } if results[0].provider_name == "Newer"
    );
}

#[tokio::test]
async fn test_stale_request_finishing_first_leaves_newer_pending() {
    let tracker = MatchTracker::new();

    let older = tracker.begin().await;
    let newer = tracker.begin().await;

    assert!(tracker.complete(older, &Ok(vec![])).await.is_err());
    assert!(!tracker.is_current(older).await);
    assert!(tracker.is_current(newer).await);
    assert_eq!(tracker.status().await, MatchStatus::Pending { request_id: 2 });
}

#[tokio::test]
async fn test_failure_is_recorded_with_reason() {
    let tracker = MatchTracker::new();

    let ticket = tracker.begin().await;
    let outcome = Err(MatchError::AddressUnresolved("Atlantis".to_string()));
    tracker.complete(ticket, &outcome).await.unwrap();

    assert_matches!(
        tracker.status().await,
        MatchStatus::Failed { request_id: 1, reason, .. } if reason.contains("Atlantis")
    );
}

#[tokio::test]
async fn test_concurrent_requests_get_distinct_tickets() {
    let tracker = Arc::new(MatchTracker::new());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let tracker = tracker.clone();
            tokio::spawn(async move { tracker.begin().await })
        })
        .collect();

    let mut tickets = Vec::new();
    for handle in handles {
        tickets.push(handle.await.unwrap());
    }
    tickets.sort_by_key(|t| t.0);
    tickets.dedup();

    assert_eq!(tickets.len(), 16);
    assert!(tracker.is_current(MatchTicket(16)).await);
}
