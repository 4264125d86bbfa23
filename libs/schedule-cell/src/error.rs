use thiserror::Error;
use uuid::Uuid;

use shared_models::error::AppError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("No case is selected as the edit target")]
    InvalidSelection,

    #[error("Provider not found: {0}")]
    ProviderNotFound(Uuid),

    #[error("Case not found: {0}")]
    CaseNotFound(Uuid),

    #[error("Day {0} is outside the week (0 = Monday .. 6 = Sunday)")]
    InvalidDay(u8),

    #[error("Time {time} on day {day} is not a cell of the grid")]
    SlotOutOfRange { day: u8, time: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::ProviderNotFound(_) | ScheduleError::CaseNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            ScheduleError::InvalidSelection => AppError::BadRequest(err.to_string()),
            ScheduleError::InvalidDay(_)
            | ScheduleError::SlotOutOfRange { .. }
            | ScheduleError::InvalidInput(_) => AppError::ValidationError(err.to_string()),
        }
    }
}
