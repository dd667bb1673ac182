//! Procedural course generation.
//!
//! A course is a start waypoint, a handful of clue waypoints and an end
//! waypoint, all sampled inside a caller-supplied bounding region. Randomness
//! is always injected so a seeded generator reproduces a course exactly.

use std::ops::RangeInclusive;

use rand::Rng;
use tracing::{debug, warn};

use crate::identifiers::{GameIdentifier, WaypointIdentifier};
use crate::models::coordinate::wrap_longitude;
use crate::models::{BoundingRegion, Coordinate, GeofenceError, Result, Waypoint, WaypointType};
use crate::spatial::haversine_distance;

/// Upper bound on rejection-sampling draws per waypoint in radius mode.
pub const MAX_SAMPLING_ATTEMPTS: u32 = 1_000;

/// Default number of clue waypoints between start and end.
pub const DEFAULT_CLUE_COUNT: RangeInclusive<u32> = 4..=7;

// ============================================================================
// Configuration
// ============================================================================

/// Where waypoints may be placed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SamplingArea {
    /// Anywhere in the bounding region.
    #[default]
    Region,
    /// Inside the region and within `max_radius_meters` of its center.
    /// Falls back to `Region` when the request carries no radius.
    WithinRadius,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CourseConfig {
    pub clue_count: RangeInclusive<u32>,
    pub sampling: SamplingArea,
}

impl Default for CourseConfig {
    fn default() -> Self {
        Self {
            clue_count: DEFAULT_CLUE_COUNT,
            sampling: SamplingArea::default(),
        }
    }
}

/// Everything the generator reads from a game record.
#[derive(Clone, Debug, PartialEq)]
pub struct CourseRequest {
    pub game_id: GameIdentifier,
    pub bounding_box: Option<BoundingRegion>,
    pub max_radius_meters: Option<f64>,
    pub starting_point: Option<Coordinate>,
}

impl CourseRequest {
    pub fn new(game_id: GameIdentifier, bounding_box: Option<BoundingRegion>) -> Self {
        Self {
            game_id,
            bounding_box,
            max_radius_meters: None,
            starting_point: None,
        }
    }

    pub fn with_starting_point(mut self, starting_point: Coordinate) -> Self {
        self.starting_point = Some(starting_point);
        self
    }

    pub fn with_max_radius(mut self, meters: f64) -> Self {
        self.max_radius_meters = Some(meters);
        self
    }
}

// ============================================================================
// Generator
// ============================================================================

#[derive(Clone, Debug, Default)]
pub struct CourseGenerator {
    config: CourseConfig,
}

/// Resolved placement constraint for one generation run.
enum Placement {
    Region,
    Disk { center: Coordinate, radius_m: f64 },
}

impl CourseGenerator {
    pub fn new(config: CourseConfig) -> Result<Self> {
        if config.clue_count.is_empty() {
            return Err(GeofenceError::InvalidCourseConfig(format!(
                "clue count range {}..={} is empty",
                config.clue_count.start(),
                config.clue_count.end()
            )));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &CourseConfig {
        &self.config
    }

    /// Generate an ordered course: start, clues, end.
    ///
    /// All validation happens before the first random draw, so a failed call
    /// consumes no randomness and returns no partial course.
    pub fn generate<R: Rng>(&self, request: &CourseRequest, rng: &mut R) -> Result<Vec<Waypoint>> {
        let region = request
            .bounding_box
            .ok_or(GeofenceError::BoundingBoxNotDefined)?;

        if region.is_degenerate() {
            return Err(GeofenceError::DegenerateRegion);
        }

        let starting_point = request
            .starting_point
            .map(Coordinate::validate)
            .transpose()?;

        let placement = self.placement(&region, request.max_radius_meters)?;

        let clue_count = rng.random_range(self.config.clue_count.clone());
        debug!(
            game = %request.game_id,
            clue_count,
            crosses_antimeridian = region.crosses_antimeridian(),
            "generating course"
        );

        let start = match starting_point {
            Some(point) => {
                if !region.contains(&point) {
                    warn!(
                        game = %request.game_id,
                        latitude = point.latitude,
                        longitude = point.longitude,
                        "starting point lies outside the bounding box; using it as given"
                    );
                }
                point
            }
            None => sample_placed(&region, &placement, rng)?,
        };

        let mut coordinates = Vec::with_capacity(clue_count as usize + 2);
        coordinates.push(start);
        for _ in 0..clue_count {
            coordinates.push(sample_placed(&region, &placement, rng)?);
        }
        coordinates.push(sample_placed(&region, &placement, rng)?);

        let last = coordinates.len() - 1;
        coordinates
            .into_iter()
            .enumerate()
            .map(|(index, coordinate)| {
                let kind = match index {
                    0 => WaypointType::Start,
                    i if i == last => WaypointType::End,
                    _ => WaypointType::Clue,
                };
                let sequence_number = index as u32;
                Waypoint::new(
                    WaypointIdentifier::for_sequence(&request.game_id, sequence_number),
                    kind,
                    coordinate,
                    sequence_number,
                )
            })
            .collect()
    }

    fn placement(&self, region: &BoundingRegion, max_radius_meters: Option<f64>) -> Result<Placement> {
        match (self.config.sampling, max_radius_meters) {
            (SamplingArea::Region, _) | (SamplingArea::WithinRadius, None) => Ok(Placement::Region),
            (SamplingArea::WithinRadius, Some(radius_m)) => {
                if !radius_m.is_finite() || radius_m <= 0.0 {
                    return Err(GeofenceError::InvalidRadius(radius_m));
                }
                Ok(Placement::Disk {
                    center: region.center(),
                    radius_m,
                })
            }
        }
    }
}

/// Uniform sample inside the region, wrapping across the antimeridian if needed.
pub fn sample_in_region<R: Rng>(region: &BoundingRegion, rng: &mut R) -> Coordinate {
    let nw = region.north_west();
    let se = region.south_east();

    let latitude = rng.random_range(se.latitude..=nw.latitude);
    let longitude = if region.crosses_antimeridian() {
        let unwrapped = rng.random_range(nw.longitude..=se.longitude + 360.0);
        if unwrapped > 180.0 {
            // Guard against rounding pushing us past the eastern edge
            wrap_longitude(unwrapped).min(se.longitude)
        } else {
            unwrapped
        }
    } else {
        rng.random_range(nw.longitude..=se.longitude)
    };

    Coordinate::new_unchecked(latitude, longitude)
}

fn sample_placed<R: Rng>(region: &BoundingRegion, placement: &Placement, rng: &mut R) -> Result<Coordinate> {
    match *placement {
        Placement::Region => Ok(sample_in_region(region, rng)),
        Placement::Disk { center, radius_m } => {
            for _ in 0..MAX_SAMPLING_ATTEMPTS {
                let candidate = sample_in_region(region, rng);
                if haversine_distance(center, candidate) <= radius_m {
                    return Ok(candidate);
                }
            }
            Err(GeofenceError::RadiusUnsatisfiable {
                radius_m,
                attempts: MAX_SAMPLING_ATTEMPTS,
            })
        }
    }
}
