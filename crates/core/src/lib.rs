use quest_geofence::GeofenceError;
use quest_geofence::identifiers::{GameIdentifier, WaypointIdentifier};

pub mod game;
pub mod storage;

// Re-export the geofencing engine
pub use quest_geofence as geofence;

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Geofence(#[from] GeofenceError),

    #[error("No course stored for game {0}")]
    CourseNotFound(GameIdentifier),

    #[error("Waypoint {waypoint} not found in game {game}")]
    WaypointNotFound {
        game: GameIdentifier,
        waypoint: WaypointIdentifier,
    },

    #[error("Invalid game settings: {0}")]
    Settings(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
