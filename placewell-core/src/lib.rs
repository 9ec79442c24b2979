//! Core domain types for the PlaceWell site evaluation engine.
//!
//! This crate owns everything the scoring rules stand on:
//! - validated [`Coordinate`]s and the planar and haversine metrics;
//! - the read-only reference tables ([`ReferenceData`]) and their
//!   [`SpatialIndex`];
//! - address resolution through a [`GeocodingProvider`] wrapped in a
//!   retrying [`GeoResolver`];
//! - engine constants and geofences ([`EngineConfig`]).
//!
//! Constructors return `Result` so invalid input is rejected at the edge and
//! never reaches the scoring code.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
mod coordinate;
mod facility;
pub mod geocode;
mod reference;
mod site;
mod spatial;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use config::{
    ConfigError, CoverageConstants, EngineConfig, Geofence, Geofences, ScoringConstants, Zone,
};
pub use coordinate::{Coordinate, CoordinateError, EARTH_RADIUS_KM};
pub use facility::FacilityType;
pub use geocode::{
    GeoResolver, GeocodeError, GeocodingProvider, ProviderError, RetryPolicy, Sleeper,
    ThreadSleeper,
};
pub use reference::{
    PitSummary, PopulationCell, ReferenceData, ReferenceError, ReferenceTables, Shelter, Tract,
};
pub use site::{
    DEFAULT_SERVICE_RADIUS_KM, DEFAULT_SITE_SIZE_SQM, MIN_SITE_SIZE_SQM, RadiusBand,
    SERVICE_RADIUS_RANGE_KM, ServiceRadius, SiteError, SiteSize,
};
pub use spatial::{PopulationMatch, ReferenceTable, ShelterMatch, SpatialError, SpatialIndex};
