use anyhow::{Context, Result};
use geojson::{feature::Id, Feature, FeatureCollection, GeoJson, Geometry, Value};
use quest_geofence::models::Waypoint;
use std::io::Write;
use std::path::Path;

/// Create a GeoJSON point Feature for a waypoint with its metadata as properties
fn waypoint_to_feature(waypoint: &Waypoint) -> Feature {
    let point: geo::Point = waypoint.coordinate.into();

    let mut properties = serde_json::Map::new();
    properties.insert("type".to_string(), serde_json::json!(waypoint.kind.to_string()));
    properties.insert(
        "sequence_number".to_string(),
        serde_json::json!(waypoint.sequence_number),
    );
    properties.insert("status".to_string(), serde_json::json!(waypoint.status().to_string()));
    if let Some(hint) = &waypoint.hint {
        properties.insert("hint".to_string(), serde_json::json!(hint.as_ref()));
    }

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![point.x(), point.y()]))),
        id: Some(Id::String(waypoint.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Build a FeatureCollection with one point per waypoint, in course order
pub fn course_to_geojson(course: &[Waypoint]) -> GeoJson {
    let feature_collection = FeatureCollection {
        bbox: None,
        features: course.iter().map(waypoint_to_feature).collect(),
        foreign_members: None,
    };

    GeoJson::from(feature_collection)
}

pub fn render_geojson(course: &[Waypoint]) -> Result<String> {
    serde_json::to_string_pretty(&course_to_geojson(course)).context("Failed to serialize GeoJSON")
}

pub fn render_json(course: &[Waypoint]) -> Result<String> {
    serde_json::to_string_pretty(course).context("Failed to serialize course")
}

/// Write to a file, or stdout when no path is given
pub fn write_output(contents: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            log::info!("Writing course to {}", path.display());
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write course to {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{contents}").context("Failed to write course to stdout")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_geofence::identifiers::WaypointIdentifier;
    use quest_geofence::models::{Coordinate, WaypointType};

    fn course() -> Vec<Waypoint> {
        vec![
            Waypoint::new(
                WaypointIdentifier::new("g/0"),
                WaypointType::Start,
                Coordinate::new_unchecked(40.7, -74.0),
                0,
            )
            .unwrap()
            .with_hint("Under the arch"),
            Waypoint::new(
                WaypointIdentifier::new("g/1"),
                WaypointType::End,
                Coordinate::new_unchecked(40.71, -74.01),
                1,
            )
            .unwrap(),
        ]
    }

    #[test]
    fn test_geojson_uses_lng_lat_order() {
        let GeoJson::FeatureCollection(fc) = course_to_geojson(&course()) else {
            panic!("expected a FeatureCollection");
        };

        assert_eq!(fc.features.len(), 2);
        let geometry = fc.features[0].geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![-74.0, 40.7]));
        assert_eq!(fc.features[0].id, Some(Id::String("g/0".to_string())));
    }

    #[test]
    fn test_geojson_properties() {
        let GeoJson::FeatureCollection(fc) = course_to_geojson(&course()) else {
            panic!("expected a FeatureCollection");
        };

        let start = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(start["type"], "start");
        assert_eq!(start["status"], "unvisited");
        assert_eq!(start["hint"], "Under the arch");

        let end = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(end["sequence_number"], 1);
        assert!(end.get("hint").is_none());
    }

    #[test]
    fn test_json_round_trips_through_serde() {
        let rendered = render_json(&course()).unwrap();
        let parsed: Vec<Waypoint> = serde_json::from_str(&rendered).unwrap();
        assert_eq!(parsed, course());
    }
}
