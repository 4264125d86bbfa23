pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;

pub use error::*;
pub use models::*;
pub use services::*;
pub use state::MatchingState;
pub use router::matching_routes;
