//! Storage collaborator interface.
//!
//! Real deployments persist courses in a database; the in-memory repository
//! here backs tests and tooling. Implementations must make `mark_visited` an
//! atomic compare-and-set so concurrent observers accept each waypoint once.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use quest_geofence::identifiers::{GameIdentifier, WaypointIdentifier};
use quest_geofence::models::{Coordinate, TriggerEvent, Waypoint};
use quest_geofence::proximity::ProximityConfig;

use crate::{GameError, Result};

pub trait WaypointRepository: Send + Sync {
    /// Persist a freshly generated course, replacing any previous one.
    fn save_course(&self, game: &GameIdentifier, waypoints: Vec<Waypoint>) -> Result<()>;

    /// Snapshot of the stored course, including current statuses.
    fn load_course(&self, game: &GameIdentifier) -> Result<Vec<Waypoint>>;

    /// Flip a waypoint to visited.
    ///
    /// Returns `true` only for the call that performed the transition.
    fn mark_visited(&self, game: &GameIdentifier, waypoint: &WaypointIdentifier) -> Result<bool>;
}

/// Evaluate a position sample against the stored course and persist the result.
///
/// Safe to call concurrently: the returned events are exactly those whose
/// compare-and-set succeeded in this call.
pub fn record_position(
    repository: &dyn WaypointRepository,
    game: &GameIdentifier,
    position: Coordinate,
    proximity: &ProximityConfig,
    now: DateTime<Utc>,
) -> Result<Vec<TriggerEvent>> {
    let course = repository.load_course(game)?;
    let candidates = proximity.evaluate(position, &course, now)?;

    let mut accepted = Vec::with_capacity(candidates.len());
    for event in candidates {
        if repository.mark_visited(game, &event.waypoint_id)? {
            info!(game = %game, waypoint = %event.waypoint_id, "trigger accepted");
            accepted.push(event);
        } else {
            debug!(game = %game, waypoint = %event.waypoint_id, "trigger lost race; already visited");
        }
    }
    Ok(accepted)
}

// ============================================================================
// In-memory implementation
// ============================================================================

#[derive(Default)]
pub struct MemoryWaypointRepository {
    courses: Mutex<HashMap<GameIdentifier, Vec<Waypoint>>>,
}

impl MemoryWaypointRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn courses(&self) -> MutexGuard<'_, HashMap<GameIdentifier, Vec<Waypoint>>> {
        // Every mutation is a single latch flip, so a poisoned map is still consistent
        self.courses.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WaypointRepository for MemoryWaypointRepository {
    fn save_course(&self, game: &GameIdentifier, waypoints: Vec<Waypoint>) -> Result<()> {
        self.courses().insert(game.clone(), waypoints);
        Ok(())
    }

    fn load_course(&self, game: &GameIdentifier) -> Result<Vec<Waypoint>> {
        self.courses()
            .get(game)
            .cloned()
            .ok_or_else(|| GameError::CourseNotFound(game.clone()))
    }

    fn mark_visited(&self, game: &GameIdentifier, waypoint: &WaypointIdentifier) -> Result<bool> {
        let mut courses = self.courses();
        let course = courses
            .get_mut(game)
            .ok_or_else(|| GameError::CourseNotFound(game.clone()))?;

        course
            .iter_mut()
            .find(|w| &w.id == waypoint)
            .map(Waypoint::mark_visited)
            .ok_or_else(|| GameError::WaypointNotFound {
                game: game.clone(),
                waypoint: waypoint.clone(),
            })
    }
}
