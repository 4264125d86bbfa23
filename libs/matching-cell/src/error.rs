use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("Could not find coordinates for address '{0}'")]
    AddressUnresolved(String),

    #[error("Invalid match request: {0}")]
    InvalidRequest(String),

    #[error("Match request {request_id} was superseded by request {latest}")]
    Superseded { request_id: u64, latest: u64 },
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::AddressUnresolved(_) => AppError::Unprocessable(err.to_string()),
            MatchError::InvalidRequest(_) => AppError::ValidationError(err.to_string()),
            MatchError::Superseded { .. } => AppError::Conflict(err.to_string()),
        }
    }
}
