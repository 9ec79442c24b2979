//! Engine constants and geofences injected at construction.
//!
//! The defaults reproduce the calibrated San José values. Deployments may
//! override any of them, typically from a configuration file, and should call
//! [`EngineConfig::validate`] before use.

use geo::{Coord, Intersects, Rect};
use thiserror::Error;

use crate::Coordinate;

/// Complete set of tunable engine constants.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Constants used by composite scoring.
    pub scoring: ScoringConstants,
    /// Zoning geofences shared by feasibility and risk rules.
    pub geofences: Geofences,
    /// Constants used by coverage estimation.
    pub coverage: CoverageConstants,
}

/// Placeholder signals and caps used by composite scoring.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScoringConstants {
    /// Environmental justice signal, pending a real data source.
    pub environmental_justice: f64,
    /// Infrastructure signals (utilities, transit, road access).
    pub infrastructure_factors: [f64; 3],
    /// Non-shelter service signals (health care, food, employment).
    pub service_factors: [f64; 3],
    /// Search radius for nearby shelters, in kilometres.
    pub shelter_search_radius_km: f64,
    /// Shelter access score when no shelter lies within the search radius.
    pub isolated_shelter_access: f64,
    /// Poverty rate, in percent, at which the poverty score saturates.
    pub poverty_rate_cap_pct: f64,
    /// Unhoused count at which the unhoused score saturates.
    pub unhoused_count_cap: f64,
}

impl Default for ScoringConstants {
    fn default() -> Self {
        Self {
            environmental_justice: 0.65,
            infrastructure_factors: [0.9, 0.7, 0.85],
            service_factors: [0.7, 0.6, 0.8],
            shelter_search_radius_km: 3.0,
            isolated_shelter_access: 0.2,
            poverty_rate_cap_pct: 50.0,
            unhoused_count_cap: 400.0,
        }
    }
}

/// Constants used by coverage estimation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CoverageConstants {
    /// Population density, per square kilometre, that counts as full coverage.
    pub target_density_per_km2: f64,
}

impl Default for CoverageConstants {
    fn default() -> Self {
        Self {
            target_density_per_km2: 2200.0,
        }
    }
}

/// An axis-aligned latitude/longitude box. Boundary points are inside.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Geofence {
    /// Southern latitude bound.
    pub south: f64,
    /// Western longitude bound.
    pub west: f64,
    /// Northern latitude bound.
    pub north: f64,
    /// Eastern longitude bound.
    pub east: f64,
}

impl Geofence {
    /// Construct a geofence from its bounds.
    #[must_use]
    pub const fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// The geofence as a `geo` rectangle (`x` = longitude).
    #[must_use]
    pub fn as_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.west,
                y: self.south,
            },
            Coord {
                x: self.east,
                y: self.north,
            },
        )
    }

    /// Whether `coordinate` lies inside the box or on its edge.
    #[must_use]
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        // `Intersects` treats boundary points as inside the rectangle.
        self.as_rect().intersects(&coordinate.as_coord())
    }
}

/// Named zoning areas of the service region.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Geofences {
    /// Downtown core.
    pub downtown: Geofence,
    /// Residential belt.
    pub residential: Geofence,
}

impl Default for Geofences {
    fn default() -> Self {
        Self {
            downtown: Geofence::new(37.325, -121.900, 37.345, -121.870),
            residential: Geofence::new(37.280, -121.920, 37.320, -121.860),
        }
    }
}

impl Geofences {
    /// Classify `coordinate`. Downtown wins when the boxes overlap.
    ///
    /// # Examples
    /// ```
    /// use placewell_core::{Coordinate, Geofences, Zone};
    ///
    /// # fn main() -> Result<(), placewell_core::CoordinateError> {
    /// let fences = Geofences::default();
    /// assert_eq!(fences.zone(Coordinate::new(37.335, -121.885)?), Zone::Downtown);
    /// assert_eq!(fences.zone(Coordinate::new(37.500, -121.885)?), Zone::Outside);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn zone(&self, coordinate: Coordinate) -> Zone {
        if self.downtown.contains(coordinate) {
            Zone::Downtown
        } else if self.residential.contains(coordinate) {
            Zone::Residential
        } else {
            Zone::Outside
        }
    }
}

/// Zone a coordinate falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Zone {
    /// Inside the downtown geofence.
    Downtown,
    /// Inside the residential geofence only.
    Residential,
    /// Outside both geofences.
    Outside,
}

impl Zone {
    /// Return the zone as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Downtown => "downtown",
            Self::Residential => "residential",
            Self::Outside => "outside",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A score constant fell outside `[0, 1]`.
    #[error("{field} must be within 0..=1, found {value}")]
    ScoreOutOfRange {
        /// Name of the offending setting.
        field: &'static str,
        /// Value as supplied.
        value: f64,
    },
    /// A cap, radius or density was not strictly positive.
    #[error("{field} must be a positive finite number, found {value}")]
    NotPositive {
        /// Name of the offending setting.
        field: &'static str,
        /// Value as supplied.
        value: f64,
    },
    /// A geofence had a bound outside the coordinate ranges.
    #[error("{field} geofence has out-of-range bounds")]
    InvalidGeofence {
        /// Name of the offending geofence.
        field: &'static str,
    },
}

impl EngineConfig {
    /// Check that every constant keeps scores inside their documented ranges.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoring = &self.scoring;
        unit_interval("scoring.environmental_justice", scoring.environmental_justice)?;
        unit_interval(
            "scoring.isolated_shelter_access",
            scoring.isolated_shelter_access,
        )?;
        for value in scoring.infrastructure_factors {
            unit_interval("scoring.infrastructure_factors", value)?;
        }
        for value in scoring.service_factors {
            unit_interval("scoring.service_factors", value)?;
        }
        positive(
            "scoring.shelter_search_radius_km",
            scoring.shelter_search_radius_km,
        )?;
        positive("scoring.poverty_rate_cap_pct", scoring.poverty_rate_cap_pct)?;
        positive("scoring.unhoused_count_cap", scoring.unhoused_count_cap)?;
        positive(
            "coverage.target_density_per_km2",
            self.coverage.target_density_per_km2,
        )?;
        geofence("geofences.downtown", &self.geofences.downtown)?;
        geofence("geofences.residential", &self.geofences.residential)?;
        Ok(())
    }
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ScoreOutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn geofence(field: &'static str, fence: &Geofence) -> Result<(), ConfigError> {
    let corners_valid = Coordinate::new(fence.south, fence.west).is_ok()
        && Coordinate::new(fence.north, fence.east).is_ok();
    if corners_valid {
        Ok(())
    } else {
        Err(ConfigError::InvalidGeofence { field })
    }
}
