use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::MatchError;
use crate::models::{MatchResult, MatchStatus, MatchTicket};

#[derive(Debug)]
struct TrackerState {
    latest: u64,
    status: MatchStatus,
}

/// Holds the outcome of the most recently issued match request.
///
/// Every request takes a ticket before it starts. Only the holder of the
/// latest ticket may publish, so a slow older request finishing late is
/// discarded instead of overwriting a newer one.
#[derive(Debug)]
pub struct MatchTracker {
    state: RwLock<TrackerState>,
}

impl Default for MatchTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchTracker {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(TrackerState {
                latest: 0,
                status: MatchStatus::Idle,
            }),
        }
    }

    pub async fn begin(&self) -> MatchTicket {
        let mut state = self.state.write().await;
        state.latest += 1;
        state.status = MatchStatus::Pending {
            request_id: state.latest,
        };

        debug!("Issued match request {}", state.latest);
        MatchTicket(state.latest)
    }

    /// Publishes the outcome for `ticket`. Returns `Superseded` and leaves
    /// the state alone when a newer request has been issued since.
    pub async fn complete(
        &self,
        ticket: MatchTicket,
        outcome: &Result<Vec<MatchResult>, MatchError>,
    ) -> Result<(), MatchError> {
        let mut state = self.state.write().await;
        if ticket.0 != state.latest {
            info!(
                "Discarding match request {}; request {} is newer",
                ticket.0, state.latest
            );
            return Err(MatchError::Superseded {
                request_id: ticket.0,
                latest: state.latest,
            });
        }

        let completed_at = Utc::now();
        state.status = match outcome {
            Ok(results) => MatchStatus::Completed {
                request_id: ticket.0,
                completed_at,
                results: results.clone(),
            },
            Err(e) => MatchStatus::Failed {
                request_id: ticket.0,
                completed_at,
                reason: e.to_string(),
            },
        };
        Ok(())
    }

    pub async fn is_current(&self, ticket: MatchTicket) -> bool {
        self.state.read().await.latest == ticket.0
    }

    pub async fn status(&self) -> MatchStatus {
        self.state.read().await.status.clone()
    }
}
