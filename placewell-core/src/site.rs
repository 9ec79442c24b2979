//! Validated site parameters supplied with an evaluation request.

use thiserror::Error;

/// Smallest floor area the engine evaluates, in square metres.
pub const MIN_SITE_SIZE_SQM: f64 = 100.0;

/// Floor area used when a request does not specify one.
pub const DEFAULT_SITE_SIZE_SQM: f64 = 1000.0;

/// Accepted service radius range in kilometres.
pub const SERVICE_RADIUS_RANGE_KM: std::ops::RangeInclusive<f64> = 1.0..=50.0;

/// Service radius used when a request does not specify one.
pub const DEFAULT_SERVICE_RADIUS_KM: f64 = 10.0;

/// Errors returned when validating site parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SiteError {
    /// The floor area was non-finite or below [`MIN_SITE_SIZE_SQM`].
    #[error("site size {0} sqm is invalid; expected a finite value of at least 100 sqm")]
    InvalidSize(f64),
    /// The service radius fell outside [`SERVICE_RADIUS_RANGE_KM`].
    #[error("service radius {0} km is invalid; expected a value between 1 and 50 km")]
    InvalidRadius(f64),
}

/// Floor area of a candidate site in square metres.
///
/// # Examples
/// ```
/// use placewell_core::SiteSize;
///
/// assert!(SiteSize::new(2500.0).is_ok());
/// assert!(SiteSize::new(50.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct SiteSize(f64);

impl SiteSize {
    /// Validates and constructs a [`SiteSize`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidSize`] for non-finite values or areas
    /// smaller than [`MIN_SITE_SIZE_SQM`].
    pub fn new(square_metres: f64) -> Result<Self, SiteError> {
        if square_metres.is_finite() && square_metres >= MIN_SITE_SIZE_SQM {
            Ok(Self(square_metres))
        } else {
            Err(SiteError::InvalidSize(square_metres))
        }
    }

    /// Floor area in square metres.
    #[must_use]
    pub const fn square_metres(self) -> f64 {
        self.0
    }
}

impl Default for SiteSize {
    fn default() -> Self {
        Self(DEFAULT_SITE_SIZE_SQM)
    }
}

impl TryFrom<f64> for SiteSize {
    type Error = SiteError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SiteSize> for f64 {
    fn from(value: SiteSize) -> Self {
        value.0
    }
}

/// Radius, in kilometres, a facility is expected to serve.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "f64", into = "f64"))]
pub struct ServiceRadius(f64);

impl ServiceRadius {
    /// Validates and constructs a [`ServiceRadius`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidRadius`] when `kilometres` lies outside
    /// [`SERVICE_RADIUS_RANGE_KM`]. `NaN` is rejected.
    pub fn new(kilometres: f64) -> Result<Self, SiteError> {
        if SERVICE_RADIUS_RANGE_KM.contains(&kilometres) {
            Ok(Self(kilometres))
        } else {
            Err(SiteError::InvalidRadius(kilometres))
        }
    }

    /// Radius in kilometres.
    #[must_use]
    pub const fn kilometres(self) -> f64 {
        self.0
    }
}

impl Default for ServiceRadius {
    fn default() -> Self {
        Self(DEFAULT_SERVICE_RADIUS_KM)
    }
}

impl TryFrom<f64> for ServiceRadius {
    type Error = SiteError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ServiceRadius> for f64 {
    fn from(value: ServiceRadius) -> Self {
        value.0
    }
}

/// Inclusive band of service radii in kilometres.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadiusBand {
    /// Lower bound in kilometres.
    pub min_km: f64,
    /// Upper bound in kilometres.
    pub max_km: f64,
}

impl RadiusBand {
    /// Construct a band from its bounds.
    #[must_use]
    pub const fn new(min_km: f64, max_km: f64) -> Self {
        Self { min_km, max_km }
    }

    /// Whether `radius` lies inside the band, bounds included.
    #[must_use]
    pub fn contains(&self, radius: ServiceRadius) -> bool {
        (self.min_km..=self.max_km).contains(&radius.kilometres())
    }
}
