//! Evaluate command implementation for the PlaceWell CLI.

use std::io::{BufReader, Write};
use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::{debug, info};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use placewell_core::{
    EngineConfig, FacilityType, GeoResolver, GeocodingProvider, ReferenceData, ReferenceTables,
    ServiceRadius, SiteSize, SpatialIndex,
};
use placewell_data::geocoding::{NominatimConfig, NominatimGeocoder};
use placewell_scorer::{SiteEvaluation, SiteEvaluator, SiteRequest};
use serde::{Deserialize, Serialize};

use crate::fs::{file_is_file, open_utf8_file};
use crate::{
    ARG_ADDRESS, ARG_FACILITY_TYPE, ARG_NOMINATIM_URL, ARG_RADIUS_KM, ARG_REFERENCE, ARG_SIZE_SQM,
    ARG_TIMEOUT_SECS, CliError, ENV_ADDRESS, ENV_REFERENCE,
};

/// CLI arguments for the `evaluate` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "evaluate",
    long_about = "Resolve an address with Nominatim and evaluate the site \
                 against a JSON snapshot of reference tables (tracts, \
                 shelters, population cells). Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Evaluate a candidate site address"
)]
#[ortho_config(prefix = "PLACEWELL")]
pub(crate) struct EvaluateArgs {
    /// Street address of the candidate site.
    #[arg(value_name = "address")]
    #[serde(default)]
    pub(crate) address: Option<String>,
    /// Path to a JSON snapshot of the reference tables.
    #[arg(long = ARG_REFERENCE, value_name = "path")]
    #[serde(default)]
    pub(crate) reference: Option<Utf8PathBuf>,
    /// Facility type, e.g. `emergency-shelter` (default).
    #[arg(long = ARG_FACILITY_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) facility_type: Option<String>,
    /// Proposed floor area in square metres (default 1000).
    #[arg(long = ARG_SIZE_SQM, value_name = "sqm")]
    #[serde(default)]
    pub(crate) size_sqm: Option<f64>,
    /// Service radius in kilometres, between 1 and 50 (default 10).
    #[arg(long = ARG_RADIUS_KM, value_name = "km")]
    #[serde(default)]
    pub(crate) radius_km: Option<f64>,
    /// Nominatim search endpoint.
    #[arg(long = ARG_NOMINATIM_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) nominatim_url: Option<String>,
    /// Per-attempt geocoding timeout in seconds (default 10).
    #[arg(long = ARG_TIMEOUT_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) timeout_secs: Option<u64>,
}

impl EvaluateArgs {
    pub(crate) fn into_config(self) -> Result<EvaluateConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        EvaluateConfig::try_from(merged)
    }
}

/// Resolved `evaluate` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EvaluateConfig {
    /// Address to geocode.
    pub(crate) address: String,
    /// Path to the reference snapshot.
    pub(crate) reference: Utf8PathBuf,
    pub(crate) facility_type: FacilityType,
    pub(crate) size: SiteSize,
    pub(crate) radius: ServiceRadius,
    /// Nominatim search endpoint.
    pub(crate) nominatim_url: String,
    /// Per-attempt geocoding timeout.
    pub(crate) timeout: Duration,
}

impl EvaluateConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        let field = ARG_REFERENCE;
        match file_is_file(&self.reference) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: self.reference.clone(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: self.reference.clone(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: self.reference.clone(),
                source,
            }),
        }
    }

    pub(crate) fn site_request(&self) -> SiteRequest {
        SiteRequest::new(self.address.clone(), self.facility_type)
            .with_size(self.size)
            .with_radius(self.radius)
    }
}

impl TryFrom<EvaluateArgs> for EvaluateConfig {
    type Error = CliError;

    fn try_from(args: EvaluateArgs) -> Result<Self, Self::Error> {
        let address = args
            .address
            .filter(|address| !address.trim().is_empty())
            .ok_or(CliError::MissingArgument {
                field: ARG_ADDRESS,
                env: ENV_ADDRESS,
            })?;
        let reference = args.reference.ok_or(CliError::MissingArgument {
            field: ARG_REFERENCE,
            env: ENV_REFERENCE,
        })?;

        let facility_type = match args.facility_type {
            Some(raw) => raw
                .parse::<FacilityType>()
                .map_err(|message| CliError::InvalidFacilityType { message })?,
            None => FacilityType::EmergencyShelter,
        };
        let size = args.size_sqm.map(SiteSize::new).transpose()?.unwrap_or_default();
        let radius = args
            .radius_km
            .map(ServiceRadius::new)
            .transpose()?
            .unwrap_or_default();

        let defaults = NominatimConfig::default();
        let nominatim_url = args.nominatim_url.unwrap_or(defaults.base_url);
        let timeout = args
            .timeout_secs
            .map_or(defaults.timeout, Duration::from_secs);

        Ok(Self {
            address,
            reference,
            facility_type,
            size,
            radius,
            nominatim_url,
            timeout,
        })
    }
}

/// Builds the geocoding provider for the current evaluate invocation.
pub(crate) trait GeocoderBuilder {
    fn build(&self, config: &EvaluateConfig) -> Result<Box<dyn GeocodingProvider>, CliError>;
}

pub(crate) struct NominatimGeocoderBuilder;

impl GeocoderBuilder for NominatimGeocoderBuilder {
    fn build(&self, config: &EvaluateConfig) -> Result<Box<dyn GeocodingProvider>, CliError> {
        let provider_config =
            NominatimConfig::new(config.nominatim_url.clone()).with_timeout(config.timeout);
        let geocoder = NominatimGeocoder::with_config(provider_config).map_err(|source| {
            CliError::BuildGeocoder {
                base_url: config.nominatim_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(geocoder))
    }
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_evaluate_with(args, &NominatimGeocoderBuilder, &mut stdout)
}

pub(crate) fn run_evaluate_with(
    args: EvaluateArgs,
    builder: &dyn GeocoderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let evaluation = execute_evaluate(args, builder)?;
    write_evaluation(writer, &evaluation)
}

fn execute_evaluate(
    args: EvaluateArgs,
    builder: &dyn GeocoderBuilder,
) -> Result<SiteEvaluation, CliError> {
    let config = resolve_evaluate_config(args)?;
    let data = load_reference_data(&config.reference)?;
    let index = Arc::new(SpatialIndex::new(Arc::new(data)));
    let resolver = GeoResolver::new(builder.build(&config)?);
    let evaluator = SiteEvaluator::new(resolver, index, EngineConfig::default())?;

    info!(
        "evaluating {} for {:?}",
        config.facility_type, config.address
    );
    Ok(evaluator.evaluate(&config.site_request())?)
}

fn resolve_evaluate_config(args: EvaluateArgs) -> Result<EvaluateConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Loads and validates a JSON snapshot of [`ReferenceTables`].
pub(crate) fn load_reference_data(path: &Utf8Path) -> Result<ReferenceData, CliError> {
    let file = open_utf8_file(path).map_err(|source| CliError::OpenReference {
        path: path.to_path_buf(),
        source,
    })?;
    let tables: ReferenceTables =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            CliError::ParseReference {
                path: path.to_path_buf(),
                source,
            }
        })?;
    debug!(
        "loaded {} tracts, {} shelters and {} population cells from {path}",
        tables.tracts.len(),
        tables.shelters.len(),
        tables.population.len()
    );
    ReferenceData::new(tables).map_err(|source| CliError::InvalidReference {
        path: path.to_path_buf(),
        source,
    })
}

fn write_evaluation(writer: &mut dyn Write, evaluation: &SiteEvaluation) -> Result<(), CliError> {
    let payload =
        serde_json::to_string_pretty(evaluation).map_err(CliError::SerialiseEvaluation)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<EvaluateConfig, CliError> {
    let merged = EvaluateArgs::merge_from_layers(layers).map_err(CliError::from)?;
    EvaluateConfig::try_from(merged)
}
