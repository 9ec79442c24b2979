//! Error types emitted by the PlaceWell CLI.

use std::sync::Arc;

use camino::Utf8PathBuf;
use placewell_core::{ReferenceError, SiteError};
use placewell_data::geocoding::ProviderBuildError;
use placewell_scorer::EvaluationError;
use thiserror::Error;

/// Errors emitted by the PlaceWell CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The facility type is not one the engine understands.
    #[error("{message}; expected one of temporary-shelter, transitional-housing, supportive-housing, emergency-shelter")]
    InvalidFacilityType { message: String },
    /// Site size or service radius failed validation.
    #[error(transparent)]
    InvalidSite(#[from] SiteError),
    /// The reference snapshot path does not exist.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// The reference snapshot path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// The reference snapshot path could not be inspected.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the reference snapshot failed.
    #[error("failed to open reference snapshot at {path:?}: {source}")]
    OpenReference {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The reference snapshot is not valid JSON for the reference tables.
    #[error("failed to parse reference snapshot JSON at {path:?}: {source}")]
    ParseReference {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The reference snapshot decoded but failed validation.
    #[error("reference snapshot in {path:?} failed validation: {source}")]
    InvalidReference {
        path: Utf8PathBuf,
        #[source]
        source: ReferenceError,
    },
    /// Constructing the geocoding provider failed.
    #[error("failed to build geocoder for {base_url:?}: {source}")]
    BuildGeocoder {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The evaluation itself failed.
    #[error(transparent)]
    Evaluate(#[from] EvaluationError),
    /// Serialising the evaluation failed.
    #[error("failed to serialise site evaluation: {0}")]
    SerialiseEvaluation(#[source] serde_json::Error),
    /// Writing the evaluation output failed.
    #[error("failed to write evaluation output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
