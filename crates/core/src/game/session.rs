//! A single game's live course, owned by one authoritative writer.
//!
//! Evaluation is delegated to the pure proximity functions; the session's job
//! is to latch what they report so each waypoint is accepted at most once.
//! Share a session across tasks by wrapping it in a `Mutex`, or go through a
//! [`WaypointRepository`](crate::storage::WaypointRepository) whose
//! `mark_visited` is compare-and-set.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

use quest_geofence::identifiers::GameIdentifier;
use quest_geofence::models::{Coordinate, TriggerEvent, Waypoint};
use quest_geofence::proximity::{ProximityConfig, apply_trigger_events, sort_by_distance};

use crate::Result;
use crate::game::Game;
use crate::game::state::GameSettings;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    pub visited: usize,
    pub total: usize,
}

pub struct CourseSession {
    game_id: GameIdentifier,
    waypoints: Vec<Waypoint>,
    proximity: ProximityConfig,
}

impl CourseSession {
    pub fn new(game_id: GameIdentifier, waypoints: Vec<Waypoint>, proximity: ProximityConfig) -> Self {
        Self {
            game_id,
            waypoints,
            proximity,
        }
    }

    /// Plan a fresh course for `game` and open a session on it.
    pub fn start<R: Rng>(game: &Game, settings: &GameSettings, rng: &mut R) -> Result<Self> {
        let waypoints = game.plan_course(settings, rng)?;
        let proximity = game.proximity_config(settings)?;
        Ok(Self::new(game.id.clone(), waypoints, proximity))
    }

    /// Feed one position sample. Returns only the triggers accepted by this call.
    pub fn observe(&mut self, position: Coordinate, now: DateTime<Utc>) -> Result<Vec<TriggerEvent>> {
        let events = self.proximity.evaluate(position, &self.waypoints, now)?;
        apply_trigger_events(&mut self.waypoints, &events)?;

        for event in &events {
            info!(
                game = %self.game_id,
                waypoint = %event.waypoint_id,
                distance_m = event.distance_meters,
                "waypoint reached"
            );
        }

        Ok(events)
    }

    pub fn game_id(&self) -> &GameIdentifier {
        &self.game_id
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }

    pub fn progress(&self) -> Progress {
        Progress {
            visited: self.waypoints.iter().filter(|w| w.is_visited()).count(),
            total: self.waypoints.len(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.waypoints.iter().all(Waypoint::is_visited)
    }

    /// The intended next stop: the unvisited waypoint with the lowest sequence number.
    pub fn next_waypoint(&self) -> Option<&Waypoint> {
        self.waypoints
            .iter()
            .filter(|w| !w.is_visited())
            .min_by_key(|w| w.sequence_number)
    }

    pub fn closest_unvisited(&self, position: Coordinate) -> Option<&Waypoint> {
        sort_by_distance(position, &self.waypoints)
            .into_iter()
            .find(|w| !w.is_visited())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_geofence::identifiers::WaypointIdentifier;
    use quest_geofence::models::{BoundingRegion, WaypointType};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn course() -> Vec<Waypoint> {
        let points = [
            (WaypointType::Start, 51.5007, -0.1246),
            (WaypointType::Clue, 51.5014, -0.1419),
            (WaypointType::Clue, 51.5033, -0.1196),
            (WaypointType::End, 51.5081, -0.0759),
        ];
        points
            .iter()
            .enumerate()
            .map(|(i, (kind, lat, lng))| {
                Waypoint::new(
                    WaypointIdentifier::new(format!("wp{i}")),
                    *kind,
                    Coordinate::new_unchecked(*lat, *lng),
                    i as u32,
                )
                .unwrap()
            })
            .collect()
    }

    fn session() -> CourseSession {
        CourseSession::new(GameIdentifier::new("london"), course(), ProximityConfig::default())
    }

    #[test]
    fn test_observe_latches_once() {
        let mut session = session();
        let at_start = Coordinate::new_unchecked(51.5007, -0.1246);

        let first = session.observe(at_start, Utc::now()).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].waypoint_id.as_str(), "wp0");

        // GPS jitter around the same spot
        let jitter = Coordinate::new_unchecked(51.50071, -0.12461);
        assert!(session.observe(jitter, Utc::now()).unwrap().is_empty());
        assert!(session.observe(at_start, Utc::now()).unwrap().is_empty());

        assert_eq!(session.progress(), Progress { visited: 1, total: 4 });
    }

    #[test]
    fn test_out_of_order_visit_still_triggers() {
        let mut session = session();
        let at_end = Coordinate::new_unchecked(51.5081, -0.0759);

        let events = session.observe(at_end, Utc::now()).unwrap();
        assert_eq!(events[0].waypoint_id.as_str(), "wp3");
        assert_eq!(session.next_waypoint().unwrap().id.as_str(), "wp0");
    }

    #[test]
    fn test_completion() {
        let mut session = session();
        let stops: Vec<_> = session.waypoints().iter().map(|w| w.coordinate).collect();
        for stop in stops {
            session.observe(stop, Utc::now()).unwrap();
        }

        assert!(session.is_complete());
        assert!(session.next_waypoint().is_none());
        assert!(session.closest_unvisited(Coordinate::new_unchecked(51.5, -0.1)).is_none());
    }

    #[test]
    fn test_closest_unvisited_skips_visited() {
        let mut session = session();
        let at_start = Coordinate::new_unchecked(51.5007, -0.1246);
        session.observe(at_start, Utc::now()).unwrap();

        // wp2 is the next nearest to the start after wp0 itself
        assert_eq!(session.closest_unvisited(at_start).unwrap().id.as_str(), "wp2");
    }

    #[test]
    fn test_invalid_position_is_rejected() {
        let mut session = session();
        assert!(session.observe(Coordinate::new_unchecked(0.0, 200.0), Utc::now()).is_err());
        assert_eq!(session.progress().visited, 0);
    }

    #[test]
    fn test_start_plans_course() {
        let game = Game::new(GameIdentifier::new("seeded"))
            .with_bounding_box(BoundingRegion::from_edges(51.52, -0.15, 51.49, -0.07).unwrap());

        let session =
            CourseSession::start(&game, &GameSettings::default(), &mut StdRng::seed_from_u64(4)).unwrap();
        assert_eq!(session.progress().visited, 0);
        assert!((6..=9).contains(&session.progress().total));
        assert_eq!(session.next_waypoint().unwrap().sequence_number, 0);
    }
}
