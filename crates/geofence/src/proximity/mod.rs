//! Proximity evaluation: which waypoints has a player just reached?
//!
//! Every function here is pure over its inputs. The evaluator never changes a
//! waypoint's status. Callers accept a trigger and latch the waypoint with
//! [`Waypoint::mark_visited`] (or [`apply_trigger_events`]), and that latch is
//! what stops a lingering player from collecting the same waypoint twice.
//!
//! ## Thresholds
//!
//! Threshold arguments are meters. Zero is allowed and triggers only on exact
//! coincidence; negative or non-finite thresholds are rejected.

use chrono::{DateTime, Utc};

use crate::identifiers::WaypointIdentifier;
use crate::models::{
    Coordinate, GeofenceError, ProximityResult, Result, TriggerEvent, Waypoint,
};
use crate::spatial::haversine_distance;

/// Trigger distance used when a game does not configure its own.
pub const DEFAULT_TRIGGER_DISTANCE_METERS: f64 = 20.0;

// ============================================================================
// Configuration
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct ProximityConfig {
    trigger_distance_meters: f64,
}

impl ProximityConfig {
    /// A configured trigger distance must be strictly positive.
    pub fn new(trigger_distance_meters: f64) -> Result<Self> {
        if !trigger_distance_meters.is_finite() || trigger_distance_meters <= 0.0 {
            return Err(GeofenceError::InvalidThreshold(trigger_distance_meters));
        }
        Ok(Self {
            trigger_distance_meters,
        })
    }

    pub fn trigger_distance_meters(&self) -> f64 {
        self.trigger_distance_meters
    }

    /// Trigger events for every unvisited waypoint within range of `position`.
    pub fn evaluate(
        &self,
        position: Coordinate,
        waypoints: &[Waypoint],
        triggered_at: DateTime<Utc>,
    ) -> Result<Vec<TriggerEvent>> {
        collect_trigger_events(position, waypoints, self.trigger_distance_meters, triggered_at)
    }
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            trigger_distance_meters: DEFAULT_TRIGGER_DISTANCE_METERS,
        }
    }
}

impl TryFrom<f64> for ProximityConfig {
    type Error = GeofenceError;

    fn try_from(meters: f64) -> Result<Self> {
        Self::new(meters)
    }
}

impl From<ProximityConfig> for f64 {
    fn from(config: ProximityConfig) -> Self {
        config.trigger_distance_meters
    }
}

fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && threshold >= 0.0 {
        Ok(threshold)
    } else {
        Err(GeofenceError::InvalidThreshold(threshold))
    }
}

// ============================================================================
// Single-point checks
// ============================================================================

pub fn is_within_proximity(position: Coordinate, coordinate: Coordinate, threshold: f64) -> bool {
    haversine_distance(position, coordinate) <= threshold
}

/// Evaluate one waypoint regardless of its status.
pub fn check_point_proximity(
    position: Coordinate,
    waypoint: &Waypoint,
    threshold: f64,
) -> Result<ProximityResult> {
    let position = position.validate()?;
    let threshold = validate_threshold(threshold)?;
    Ok(evaluate_point(position, waypoint, threshold))
}

fn evaluate_point(position: Coordinate, waypoint: &Waypoint, threshold: f64) -> ProximityResult {
    let distance_meters = haversine_distance(position, waypoint.coordinate);
    ProximityResult {
        waypoint_id: waypoint.id.clone(),
        triggered: distance_meters <= threshold,
        distance_meters,
    }
}

// ============================================================================
// Batch checks
// ============================================================================

/// Evaluate every waypoint, in input order.
pub fn check_multiple_points_proximity(
    position: Coordinate,
    waypoints: &[Waypoint],
    threshold: f64,
) -> Result<Vec<ProximityResult>> {
    let position = position.validate()?;
    let threshold = validate_threshold(threshold)?;

    Ok(waypoints
        .iter()
        .map(|waypoint| evaluate_point(position, waypoint, threshold))
        .collect())
}

/// Waypoints still eligible to trigger (status `Unvisited`).
pub fn filter_triggerable_points(waypoints: &[Waypoint]) -> Vec<&Waypoint> {
    waypoints.iter().filter(|w| !w.is_visited()).collect()
}

/// Unvisited waypoints within `threshold` of `position`.
///
/// Call once per position sample. Several waypoints may trigger together when
/// they sit close to one another.
pub fn get_triggered_points<'a>(
    position: Coordinate,
    waypoints: &'a [Waypoint],
    threshold: f64,
) -> Result<Vec<&'a Waypoint>> {
    let position = position.validate()?;
    let threshold = validate_threshold(threshold)?;

    Ok(filter_triggerable_points(waypoints)
        .into_iter()
        .filter(|w| is_within_proximity(position, w.coordinate, threshold))
        .collect())
}

/// [`get_triggered_points`], stamped as events.
pub fn collect_trigger_events(
    position: Coordinate,
    waypoints: &[Waypoint],
    threshold: f64,
    triggered_at: DateTime<Utc>,
) -> Result<Vec<TriggerEvent>> {
    Ok(get_triggered_points(position, waypoints, threshold)?
        .into_iter()
        .map(|w| TriggerEvent {
            waypoint_id: w.id.clone(),
            distance_meters: haversine_distance(position, w.coordinate),
            triggered_at,
        })
        .collect())
}

/// Latch every waypoint named by `events` as visited.
///
/// Returns the ids that actually transitioned; re-applying the same events
/// yields an empty list. An event for an unknown waypoint is an error and
/// leaves every waypoint untouched.
pub fn apply_trigger_events(
    waypoints: &mut [Waypoint],
    events: &[TriggerEvent],
) -> Result<Vec<WaypointIdentifier>> {
    if let Some(missing) = events
        .iter()
        .find(|e| !waypoints.iter().any(|w| w.id == e.waypoint_id))
    {
        return Err(GeofenceError::WaypointNotFound(missing.waypoint_id.clone()));
    }

    let mut transitioned = Vec::new();
    for event in events {
        if let Some(waypoint) = waypoints.iter_mut().find(|w| w.id == event.waypoint_id) {
            if waypoint.mark_visited() {
                transitioned.push(waypoint.id.clone());
            }
        }
    }
    Ok(transitioned)
}

// ============================================================================
// Ordering
// ============================================================================

/// Waypoints ordered by ascending distance to `position`. Ties keep input order.
pub fn sort_by_distance(position: Coordinate, waypoints: &[Waypoint]) -> Vec<&Waypoint> {
    let mut keyed: Vec<(f64, &Waypoint)> = waypoints
        .iter()
        .map(|w| (haversine_distance(position, w.coordinate), w))
        .collect();

    // Vec::sort_by is stable
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, w)| w).collect()
}

pub fn get_closest_point(position: Coordinate, waypoints: &[Waypoint]) -> Option<&Waypoint> {
    sort_by_distance(position, waypoints).into_iter().next()
}
