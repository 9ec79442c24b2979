//! Nominatim search API response types.
//!
//! With `format=jsonv2` the search endpoint answers with an array of places.
//! Coordinates are encoded as decimal strings.
//!
//! See: <https://nominatim.org/release-docs/latest/api/Search/>

use placewell_core::{Coordinate, ProviderError};
use serde::Deserialize;

/// One place returned by the search endpoint.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    /// Latitude as a decimal string.
    pub lat: String,
    /// Longitude as a decimal string.
    pub lon: String,
    /// Full formatted address, when supplied.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimPlace {
    /// Parse the place's coordinate.
    pub fn coordinate(&self) -> Result<Coordinate, ProviderError> {
        let latitude = parse_degrees("lat", &self.lat)?;
        let longitude = parse_degrees("lon", &self.lon)?;
        Coordinate::new(latitude, longitude).map_err(|err| ProviderError::Parse {
            message: err.to_string(),
        })
    }

    /// Human-readable name for log lines.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or("unnamed place")
    }
}

fn parse_degrees(field: &str, raw: &str) -> Result<f64, ProviderError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| ProviderError::Parse {
            message: format!("invalid {field} value {raw:?}: {err}"),
        })
}
