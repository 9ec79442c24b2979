//! Facade crate for the PlaceWell site evaluation engine.
//!
//! This crate re-exports the core domain types and the scoring pipeline, and
//! exposes the Nominatim geocoder behind the `nominatim` feature flag.

#![forbid(unsafe_code)]

pub use placewell_core::{
    Coordinate, CoordinateError, CoverageConstants, EngineConfig, FacilityType, GeoResolver,
    GeocodeError, GeocodingProvider, Geofence, Geofences, PitSummary, PopulationCell,
    ProviderError, ReferenceData, ReferenceError, ReferenceTables, RetryPolicy, ScoringConstants,
    ServiceRadius, Shelter, SiteError, SiteSize, Sleeper, SpatialError, SpatialIndex,
    ThreadSleeper, Tract, Zone,
};
pub use placewell_scorer::{
    CompositeScorer, CoverageEstimator, CoverageResult, EvaluationError, FeasibilityEngine,
    FeasibilityResult, NarrativeContext, Narrator, RiskCategory, RiskClassifier, RiskReport,
    ScoreBundle, ScoreComponent, SiteEvaluation, SiteEvaluator, SiteRequest,
};

#[cfg(feature = "nominatim")]
pub use placewell_data::geocoding::{NominatimConfig, NominatimGeocoder, ProviderBuildError};

#[cfg(feature = "test-support")]
pub use placewell_core::test_support;
