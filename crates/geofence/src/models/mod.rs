//! Geographic data models, waypoints, and errors.

pub mod coordinate;
pub mod types;
pub mod waypoint;

// Re-exports for convenience
pub use coordinate::{coordinates_equal, is_valid_coordinate, BoundingRegion, Coordinate};
pub use types::{GeofenceError, Result};
pub use waypoint::{ProximityResult, TriggerEvent, Waypoint, WaypointStatus, WaypointType};
