use serde::{Deserialize, Serialize};

use quest_geofence::course::{CourseConfig, CourseGenerator};
use quest_geofence::proximity::ProximityConfig;

use crate::Result;

/// Settings shared by every game unless a game overrides them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// The radius within which a player is considered to have reached a waypoint
    pub trigger_distance: ProximityConfig,
    pub course: CourseConfig,
}

impl GameSettings {
    /// Parse settings from JSON. Missing keys fall back to defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: GameSettings = serde_json::from_str(json)?;
        // Surface an empty clue range here rather than at first generation
        settings.course_generator()?;
        Ok(settings)
    }

    pub fn course_generator(&self) -> Result<CourseGenerator> {
        Ok(CourseGenerator::new(self.course.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_geofence::course::SamplingArea;
    use quest_geofence::proximity::DEFAULT_TRIGGER_DISTANCE_METERS;

    #[test]
    fn test_empty_json_uses_defaults() {
        let settings = GameSettings::from_json("{}").unwrap();
        assert_eq!(settings, GameSettings::default());
        assert_eq!(
            settings.trigger_distance.trigger_distance_meters(),
            DEFAULT_TRIGGER_DISTANCE_METERS
        );
    }

    #[test]
    fn test_json_overrides() {
        let settings = GameSettings::from_json(
            r#"{
                "trigger_distance": 35.0,
                "course": { "clue_count": { "start": 2, "end": 3 }, "sampling": "within_radius" }
            }"#,
        )
        .unwrap();

        assert_eq!(settings.trigger_distance.trigger_distance_meters(), 35.0);
        assert_eq!(settings.course.clue_count, 2..=3);
        assert_eq!(settings.course.sampling, SamplingArea::WithinRadius);
    }

    #[test]
    fn test_non_positive_trigger_distance_rejected() {
        assert!(GameSettings::from_json(r#"{ "trigger_distance": 0.0 }"#).is_err());
        assert!(GameSettings::from_json(r#"{ "trigger_distance": -5 }"#).is_err());
    }

    #[test]
    fn test_empty_clue_range_rejected() {
        let result =
            GameSettings::from_json(r#"{ "course": { "clue_count": { "start": 6, "end": 2 } } }"#);
        assert!(result.is_err());
    }
}
