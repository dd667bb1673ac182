//! Geographic coordinates and rectangular bounding regions.

use crate::models::types::{GeofenceError, Result};

// ============================================================================
// Coordinate
// ============================================================================

/// A WGS84 latitude/longitude pair in degrees.
///
/// Fields are public for cheap construction in tests and storage adapters;
/// anything that crosses a trust boundary should go through [`Coordinate::new`]
/// or [`Coordinate::validate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting out-of-range or non-finite values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        Self::new_unchecked(latitude, longitude).validate()
    }

    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_coordinate(self)
    }

    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(GeofenceError::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }
}

/// True iff latitude is in [-90, 90], longitude is in [-180, 180], and both are finite.
pub fn is_valid_coordinate(c: &Coordinate) -> bool {
    c.latitude.is_finite()
        && c.longitude.is_finite()
        && (-90.0..=90.0).contains(&c.latitude)
        && (-180.0..=180.0).contains(&c.longitude)
}

/// Exact equality of both components. No tolerance; use a distance check for proximity.
pub fn coordinates_equal(a: &Coordinate, b: &Coordinate) -> bool {
    a.latitude == b.latitude && a.longitude == b.longitude
}

impl From<Coordinate> for geo::Point {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

impl From<geo::Point> for Coordinate {
    fn from(p: geo::Point) -> Self {
        Coordinate::new_unchecked(p.y(), p.x())
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeofenceError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

// ============================================================================
// Bounding Region
// ============================================================================

/// Rectangular region given by its north-west and south-east corners.
///
/// When `north_west.longitude > south_east.longitude` the region wraps across
/// the antimeridian: it spans east from the north-west corner through ±180°.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawBoundingRegion"))]
pub struct BoundingRegion {
    north_west: Coordinate,
    south_east: Coordinate,
}

impl BoundingRegion {
    pub fn new(north_west: Coordinate, south_east: Coordinate) -> Result<Self> {
        let north_west = north_west.validate()?;
        let south_east = south_east.validate()?;

        if north_west.latitude < south_east.latitude {
            return Err(GeofenceError::InvertedRegion {
                north: north_west.latitude,
                south: south_east.latitude,
            });
        }

        Ok(Self {
            north_west,
            south_east,
        })
    }

    /// Convenience constructor from edge values in degrees.
    pub fn from_edges(north: f64, west: f64, south: f64, east: f64) -> Result<Self> {
        Self::new(
            Coordinate::new_unchecked(north, west),
            Coordinate::new_unchecked(south, east),
        )
    }

    pub fn north_west(&self) -> Coordinate {
        self.north_west
    }

    pub fn south_east(&self) -> Coordinate {
        self.south_east
    }

    /// Zero height or zero width.
    ///
    /// West 180° and east -180° name the same meridian, so that region has no width either.
    pub fn is_degenerate(&self) -> bool {
        self.latitude_span() == 0.0 || self.longitude_span() == 0.0
    }

    pub fn crosses_antimeridian(&self) -> bool {
        self.north_west.longitude > self.south_east.longitude
    }

    pub fn latitude_span(&self) -> f64 {
        self.north_west.latitude - self.south_east.latitude
    }

    /// Eastward extent in degrees, accounting for antimeridian wrap.
    pub fn longitude_span(&self) -> f64 {
        let span = self.south_east.longitude - self.north_west.longitude;
        if self.crosses_antimeridian() {
            span + 360.0
        } else {
            span
        }
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        let lat_ok = c.latitude >= self.south_east.latitude && c.latitude <= self.north_west.latitude;

        let lng_ok = if self.crosses_antimeridian() {
            c.longitude >= self.north_west.longitude || c.longitude <= self.south_east.longitude
        } else {
            c.longitude >= self.north_west.longitude && c.longitude <= self.south_east.longitude
        };

        lat_ok && lng_ok
    }

    pub fn center(&self) -> Coordinate {
        let latitude = self.south_east.latitude + self.latitude_span() / 2.0;
        let longitude = wrap_longitude(self.north_west.longitude + self.longitude_span() / 2.0);
        Coordinate::new_unchecked(latitude, longitude)
    }
}

/// Fold a longitude that has run past +180° back into range.
pub(crate) fn wrap_longitude(longitude: f64) -> f64 {
    if longitude > 180.0 {
        longitude - 360.0
    } else {
        longitude
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawBoundingRegion {
    north_west: Coordinate,
    south_east: Coordinate,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBoundingRegion> for BoundingRegion {
    type Error = GeofenceError;

    fn try_from(raw: RawBoundingRegion) -> Result<Self> {
        BoundingRegion::new(raw.north_west, raw.south_east)
    }
}
