//! Error types shared by the geofencing and course-generation modules.

use crate::identifiers::*;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeofenceError {
    #[error("Bounding box not defined")]
    BoundingBoxNotDefined,

    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Inverted region: north latitude {north} is below south latitude {south}")]
    InvertedRegion { north: f64, south: f64 },

    #[error("Degenerate region: bounds must have non-zero height and width")]
    DegenerateRegion,

    #[error("Invalid trigger distance: {0} (must be a finite, non-negative number of meters)")]
    InvalidThreshold(f64),

    #[error("Invalid radius: {0} (must be a finite, positive number of meters)")]
    InvalidRadius(f64),

    #[error("Could not place a waypoint within {radius_m}m of the region center after {attempts} attempts")]
    RadiusUnsatisfiable { radius_m: f64, attempts: u32 },

    #[error("Invalid course configuration: {0}")]
    InvalidCourseConfig(String),

    #[error("Waypoint not found: {0}")]
    WaypointNotFound(WaypointIdentifier),
}

pub type Result<T> = std::result::Result<T, GeofenceError>;
