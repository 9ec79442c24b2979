//! Error type raised while evaluating a site.
#![forbid(unsafe_code)]

use placewell_core::{ConfigError, GeocodeError, SiteError, SpatialError};
use thiserror::Error;

/// Failures surfaced by [`SiteEvaluator`](crate::SiteEvaluator).
///
/// Each variant keeps the underlying error so callers can report a message
/// specific to the kind of failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    /// The address could not be resolved to a coordinate.
    #[error("failed to resolve site address: {0}")]
    Geocode(#[from] GeocodeError),
    /// A reference table needed for scoring is empty.
    #[error("failed to query reference data: {0}")]
    Spatial(#[from] SpatialError),
    /// The site size or service radius is invalid.
    #[error("invalid site parameters: {0}")]
    Site(#[from] SiteError),
    /// The engine configuration failed validation.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}
