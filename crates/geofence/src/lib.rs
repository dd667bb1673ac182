//! # quest-geofence
//!
//! Geofencing and course generation for location-based adventure games.
//!
//! ## Features
//!
//! - **Distance kernel**: validated coordinates and haversine distances
//! - **Proximity evaluation**: pure, idempotent trigger detection against a
//!   one-way visited latch on each waypoint
//! - **Course generation**: seeded, region-confined waypoint placement,
//!   antimeridian aware
//!
//! ## Example
//!
//! ```
//! use quest_geofence::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let region = BoundingRegion::from_edges(40.80, -74.02, 40.70, -73.93).unwrap();
//! let request = CourseRequest::new(GameIdentifier::new("harbor"), Some(region));
//!
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut course = CourseGenerator::default().generate(&request, &mut rng).unwrap();
//! assert!((6..=9).contains(&course.len()));
//!
//! // Stand on the start waypoint
//! let position = course[0].coordinate;
//! let events = collect_trigger_events(position, &course, 20.0, chrono::Utc::now()).unwrap();
//! assert!(!events.is_empty());
//!
//! apply_trigger_events(&mut course, &events).unwrap();
//! assert!(course[0].is_visited());
//! ```

pub mod course;
pub mod identifiers;
pub mod models;
pub mod proximity;
pub mod spatial;

// Re-exports for convenience
pub mod prelude {
    pub use crate::course::{CourseConfig, CourseGenerator, CourseRequest, SamplingArea};
    pub use crate::identifiers::*;
    pub use crate::models::*;
    pub use crate::proximity::*;
    pub use crate::spatial::*;
}

pub use prelude::*;
