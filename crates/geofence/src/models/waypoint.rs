//! Waypoints and the events produced when a player reaches one.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::identifiers::WaypointIdentifier;
use crate::models::coordinate::Coordinate;
use crate::models::types::Result;

// ============================================================================
// Enums
// ============================================================================

/// Role of a waypoint within a course
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaypointType {
    Start,
    Clue,
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WaypointStatus {
    #[default]
    Unvisited,
    Visited,
}

// ============================================================================
// Data Structures
// ============================================================================

/// A single point of interest in a course.
///
/// `status` is a one-way latch: it can only move from `Unvisited` to
/// `Visited` through [`Waypoint::mark_visited`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub id: WaypointIdentifier,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: WaypointType,
    pub coordinate: Coordinate,
    pub sequence_number: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    status: WaypointStatus,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hint: Option<Arc<str>>,
}

impl Waypoint {
    /// Create an unvisited waypoint. The coordinate is validated.
    pub fn new(
        id: WaypointIdentifier,
        kind: WaypointType,
        coordinate: Coordinate,
        sequence_number: u32,
    ) -> Result<Self> {
        Ok(Self {
            id,
            kind,
            coordinate: coordinate.validate()?,
            sequence_number,
            status: WaypointStatus::Unvisited,
            hint: None,
        })
    }

    /// Rehydrate a waypoint loaded from storage, keeping its persisted status.
    pub fn restore(
        id: WaypointIdentifier,
        kind: WaypointType,
        coordinate: Coordinate,
        sequence_number: u32,
        status: WaypointStatus,
        hint: Option<Arc<str>>,
    ) -> Result<Self> {
        Ok(Self {
            status,
            hint,
            ..Self::new(id, kind, coordinate, sequence_number)?
        })
    }

    pub fn with_hint(mut self, hint: impl Into<Arc<str>>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn status(&self) -> WaypointStatus {
        self.status
    }

    pub fn is_visited(&self) -> bool {
        self.status == WaypointStatus::Visited
    }

    /// Latch the waypoint as visited.
    ///
    /// Returns `true` only if this call performed the transition.
    pub fn mark_visited(&mut self) -> bool {
        match self.status {
            WaypointStatus::Unvisited => {
                self.status = WaypointStatus::Visited;
                true
            }
            WaypointStatus::Visited => false,
        }
    }
}

/// Outcome of evaluating one waypoint against a position (status-blind)
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProximityResult {
    pub waypoint_id: WaypointIdentifier,
    pub triggered: bool,
    pub distance_meters: f64,
}

/// A waypoint was reached. Ephemeral; persisting it is the caller's job.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerEvent {
    pub waypoint_id: WaypointIdentifier,
    pub distance_meters: f64,
    pub triggered_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn waypoint() -> Waypoint {
        Waypoint::new(
            WaypointIdentifier::new("wp"),
            WaypointType::Clue,
            Coordinate::new_unchecked(1.0, 2.0),
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_new_waypoint_is_unvisited() {
        let wp = waypoint();
        assert_eq!(wp.status(), WaypointStatus::Unvisited);
        assert!(!wp.is_visited());
    }

    #[test]
    fn test_new_waypoint_rejects_invalid_coordinate() {
        let result = Waypoint::new(
            WaypointIdentifier::new("bad"),
            WaypointType::End,
            Coordinate::new_unchecked(f64::NAN, 0.0),
            2,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_visited_latch_is_one_way() {
        let mut wp = waypoint();
        assert!(wp.mark_visited());
        assert!(!wp.mark_visited());
        assert!(wp.is_visited());
    }

    #[test]
    fn test_restore_keeps_status() {
        let wp = Waypoint::restore(
            WaypointIdentifier::new("wp"),
            WaypointType::Start,
            Coordinate::new_unchecked(0.0, 0.0),
            0,
            WaypointStatus::Visited,
            Some("by the fountain".into()),
        )
        .unwrap();

        assert!(wp.is_visited());
        assert_eq!(wp.hint.as_deref(), Some("by the fountain"));
    }

    #[test]
    fn test_type_strings() {
        assert_eq!(WaypointType::Start.to_string(), "start");
        assert_eq!(WaypointType::from_str("clue").unwrap(), WaypointType::Clue);
        assert_eq!(WaypointStatus::Visited.to_string(), "visited");
    }
}
