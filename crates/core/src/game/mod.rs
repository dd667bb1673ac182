use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use quest_geofence::course::CourseRequest;
use quest_geofence::identifiers::GameIdentifier;
use quest_geofence::models::{BoundingRegion, Coordinate, Waypoint};
use quest_geofence::proximity::ProximityConfig;

use crate::Result;
use crate::game::state::GameSettings;

pub mod session;
pub mod state;

/// A game as handed to us by the storage/API layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameIdentifier,
    #[serde(default)]
    pub name: Option<Arc<str>>,
    #[serde(default)]
    pub bounding_box: Option<BoundingRegion>,
    /// Only constrains placement when radius sampling is enabled in the course settings
    #[serde(default)]
    pub max_radius_meters: Option<f64>,
    #[serde(default)]
    pub starting_point: Option<Coordinate>,
    /// Per-game override of [`GameSettings::trigger_distance`]
    #[serde(default)]
    pub trigger_distance_meters: Option<f64>,
}

impl Game {
    pub fn new(id: GameIdentifier) -> Self {
        Self {
            id,
            name: None,
            bounding_box: None,
            max_radius_meters: None,
            starting_point: None,
            trigger_distance_meters: None,
        }
    }

    pub fn with_bounding_box(mut self, region: BoundingRegion) -> Self {
        self.bounding_box = Some(region);
        self
    }

    pub fn with_starting_point(mut self, start: Coordinate) -> Self {
        self.starting_point = Some(start);
        self
    }

    pub fn course_request(&self) -> CourseRequest {
        CourseRequest {
            game_id: self.id.clone(),
            bounding_box: self.bounding_box,
            max_radius_meters: self.max_radius_meters,
            starting_point: self.starting_point,
        }
    }

    pub fn proximity_config(&self, settings: &GameSettings) -> Result<ProximityConfig> {
        match self.trigger_distance_meters {
            Some(meters) => Ok(ProximityConfig::new(meters)?),
            None => Ok(settings.trigger_distance),
        }
    }

    /// Generate this game's course. The result is ready for bulk persistence.
    pub fn plan_course<R: Rng>(&self, settings: &GameSettings, rng: &mut R) -> Result<Vec<Waypoint>> {
        let generator = settings.course_generator()?;
        Ok(generator.generate(&self.course_request(), rng)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameError;
    use quest_geofence::GeofenceError;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn region() -> BoundingRegion {
        BoundingRegion::from_edges(37.81, -122.52, 37.70, -122.36).unwrap()
    }

    #[test]
    fn test_plan_course_without_region_fails() {
        let game = Game::new(GameIdentifier::new("no-box"));
        let err = game
            .plan_course(&GameSettings::default(), &mut StdRng::seed_from_u64(1))
            .unwrap_err();

        assert!(matches!(err, GameError::Geofence(GeofenceError::BoundingBoxNotDefined)));
        assert_eq!(err.to_string(), "Bounding box not defined");
    }

    #[test]
    fn test_plan_course_honors_starting_point() {
        let start = Coordinate::new(37.7749, -122.4194).unwrap();
        let game = Game::new(GameIdentifier::new("sf"))
            .with_bounding_box(region())
            .with_starting_point(start);

        let course = game
            .plan_course(&GameSettings::default(), &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_eq!(course[0].coordinate, start);
        assert!(course[0].id.as_str().starts_with("sf/"));
    }

    #[test]
    fn test_trigger_distance_override() {
        let settings = GameSettings::default();
        let mut game = Game::new(GameIdentifier::new("g"));
        assert_eq!(game.proximity_config(&settings).unwrap(), settings.trigger_distance);

        game.trigger_distance_meters = Some(75.0);
        assert_eq!(game.proximity_config(&settings).unwrap().trigger_distance_meters(), 75.0);

        game.trigger_distance_meters = Some(-1.0);
        assert!(game.proximity_config(&settings).is_err());
    }

    #[test]
    fn test_game_from_json() {
        let game: Game = serde_json::from_str(
            r#"{
                "id": "park",
                "bounding_box": {
                    "north_west": { "latitude": 37.81, "longitude": -122.52 },
                    "south_east": { "latitude": 37.70, "longitude": -122.36 }
                },
                "max_radius_meters": 1500.0
            }"#,
        )
        .unwrap();

        assert_eq!(game.id.as_str(), "park");
        assert_eq!(game.bounding_box, Some(region()));
        assert!(game.starting_point.is_none());
    }

    #[test]
    fn test_game_json_rejects_bad_coordinate() {
        let result: std::result::Result<Game, _> = serde_json::from_str(
            r#"{ "id": "x", "starting_point": { "latitude": 123.0, "longitude": 0.0 } }"#,
        );
        assert!(result.is_err());
    }
}
