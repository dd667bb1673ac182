//! Distance calculations on the globe.

pub mod queries;

pub use queries::{haversine_distance, EARTH_RADIUS_METERS};
