//! Geocoding provider trait.

use std::sync::Arc;

use crate::Coordinate;

use super::error::ProviderError;

/// Look up a single address with an external geocoder.
///
/// Implementations apply their own per-attempt timeout and report it as
/// [`ProviderError::Timeout`]. They must not retry internally; retrying is
/// the job of [`GeoResolver`](super::GeoResolver).
///
/// # Examples
///
/// ```rust
/// use placewell_core::{Coordinate, GeocodingProvider, ProviderError};
///
/// struct CityHall;
///
/// impl GeocodingProvider for CityHall {
///     fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
///         if address.eq_ignore_ascii_case("200 E Santa Clara St") {
///             Coordinate::new(37.3382, -121.8863)
///                 .map(Some)
///                 .map_err(|err| ProviderError::Parse { message: err.to_string() })
///         } else {
///             Ok(None)
///         }
///     }
/// }
///
/// let found = CityHall.geocode("200 E Santa Clara St")?;
/// assert!(found.is_some());
/// assert_eq!(CityHall.geocode("nowhere")?, None);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait GeocodingProvider: Send + Sync {
    /// Resolve `address` to a coordinate.
    ///
    /// Returns `Ok(None)` when the geocoder has no match.
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError>;
}

impl<T: GeocodingProvider + ?Sized> GeocodingProvider for Box<T> {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        (**self).geocode(address)
    }
}

impl<T: GeocodingProvider + ?Sized> GeocodingProvider for Arc<T> {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        (**self).geocode(address)
    }
}
