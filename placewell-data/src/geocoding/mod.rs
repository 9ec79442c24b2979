//! HTTP-based geocoding providers.
//!
//! This module provides [`NominatimGeocoder`], an implementation of
//! [`placewell_core::GeocodingProvider`] that resolves free-text addresses
//! through the Nominatim search API.
//!
//! # Architecture
//!
//! Each call issues a single search request with a per-request timeout. The
//! provider does not retry; bounded retry with a delay is the job of
//! [`placewell_core::GeoResolver`], which only retries timeouts. The
//! synchronous provider trait is implemented by blocking on async HTTP calls
//! internally, keeping the core library embeddable in synchronous contexts.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use placewell_core::GeoResolver;
//! use placewell_data::geocoding::{NominatimConfig, NominatimGeocoder};
//!
//! let config = NominatimConfig::new("http://localhost:8080/search")
//!     .with_timeout(Duration::from_secs(5))
//!     .with_user_agent("my-app/1.0");
//! let geocoder = NominatimGeocoder::with_config(config)?;
//!
//! let coordinate = GeoResolver::new(geocoder).resolve("200 E Santa Clara St, San Jose")?;
//! println!("{coordinate}");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod nominatim;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use provider::{
    DEFAULT_NOMINATIM_URL, DEFAULT_USER_AGENT, NominatimConfig, NominatimGeocoder,
    ProviderBuildError,
};
