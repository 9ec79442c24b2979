//! Validated geographic coordinates and the distance metrics used by the
//! engine.
//!
//! Two metrics coexist: tract matching uses
//! a planar Euclidean distance over raw degrees, while shelter and population
//! searches use the haversine great-circle distance in kilometres.

use geo::Coord;
use thiserror::Error;

/// Mean Earth radius used by [`Coordinate::haversine_km`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Values are checked on construction, so every `Coordinate` in the engine
/// lies within `-90..=90` latitude and `-180..=180` longitude.
///
/// # Examples
///
/// ```
/// use placewell_core::Coordinate;
///
/// # fn main() -> Result<(), placewell_core::CoordinateError> {
/// let city_hall = Coordinate::new(37.3382, -121.8863)?;
/// assert_eq!(city_hall.latitude(), 37.3382);
/// assert!(Coordinate::new(91.0, 0.0).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawCoordinate"))]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

/// Errors returned by [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CoordinateError {
    /// Latitude was outside `-90..=90` or not a finite number.
    #[error("latitude {0} is outside the range -90..=90")]
    LatitudeOutOfRange(f64),
    /// Longitude was outside `-180..=180` or not a finite number.
    #[error("longitude {0} is outside the range -180..=180")]
    LongitudeOutOfRange(f64),
}

impl Coordinate {
    /// Validates and constructs a [`Coordinate`].
    ///
    /// # Errors
    ///
    /// Returns [`CoordinateError`] when either component is out of range.
    /// `NaN` and infinities are rejected by the same checks.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Convert to a `geo` coordinate with `x = longitude` and `y = latitude`.
    #[must_use]
    pub const fn as_coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Euclidean distance between two coordinates measured in raw degrees.
    ///
    /// This is only meaningful for ranking nearby candidates; it is not a
    /// physical distance.
    #[must_use]
    pub fn planar_distance(&self, other: &Self) -> f64 {
        (self.latitude - other.latitude).hypot(self.longitude - other.longitude)
    }

    /// Great-circle distance to `other` in kilometres.
    ///
    /// # Examples
    ///
    /// ```
    /// use placewell_core::Coordinate;
    ///
    /// # fn main() -> Result<(), placewell_core::CoordinateError> {
    /// let origin = Coordinate::new(0.0, 0.0)?;
    /// let east = Coordinate::new(0.0, 1.0)?;
    /// let km = origin.haversine_km(&east);
    /// assert!((km - 111.195).abs() < 0.01);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn haversine_km(&self, other: &Self) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let half_dlat = (lat2 - lat1) / 2.0;
        let half_dlon = (other.longitude - self.longitude).to_radians() / 2.0;
        let a = half_dlat.sin().powi(2) + lat1.cos() * lat2.cos() * half_dlon.sin().powi(2);
        // Rounding can push `a` fractionally past 1 for antipodal points.
        let a = a.clamp(0.0, 1.0);
        let central_angle = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * central_angle
    }
}

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        value.as_coord()
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

/// Unchecked wire form used to route deserialisation through validation.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCoordinate> for Coordinate {
    type Error = CoordinateError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}
