pub mod distance;
pub mod lookup;
pub mod cache;

pub use distance::{distance, haversine_miles, within_radius, EARTH_RADIUS_MILES};
pub use lookup::{CoordinateLookup, NominatimClient};
pub use cache::CachedLookup;
