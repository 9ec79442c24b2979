//! End-to-end evaluation of a candidate site.
//!
//! [`SiteEvaluator`] resolves an address, then runs the composite score,
//! feasibility rules, risk classification and coverage estimate over the
//! resulting coordinate. Batches are evaluated in parallel with `rayon`.

use std::sync::Arc;

use placewell_core::{
    Coordinate, EngineConfig, FacilityType, GeoResolver, GeocodingProvider, ServiceRadius,
    SiteSize, Sleeper, SpatialIndex, ThreadSleeper,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::composite::{CompositeScorer, ScoreBundle};
use crate::coverage::{CoverageEstimator, CoverageResult};
use crate::error::EvaluationError;
use crate::feasibility::{FeasibilityEngine, FeasibilityResult};
use crate::narrative::{NarrativeContext, Narrator};
use crate::risk::{RiskClassifier, RiskReport};

/// A site to evaluate, identified by its street address.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRequest {
    /// Free-text street address.
    pub address: String,
    /// Facility being planned.
    pub facility_type: FacilityType,
    /// Proposed floor area.
    pub size: SiteSize,
    /// Service radius used for coverage.
    pub radius: ServiceRadius,
}

impl SiteRequest {
    /// Create a request with the default size and radius.
    #[must_use]
    pub fn new(address: impl Into<String>, facility_type: FacilityType) -> Self {
        Self {
            address: address.into(),
            facility_type,
            size: SiteSize::default(),
            radius: ServiceRadius::default(),
        }
    }

    /// Set the proposed floor area.
    #[must_use]
    pub fn with_size(mut self, size: SiteSize) -> Self {
        self.size = size;
        self
    }

    /// Set the service radius.
    #[must_use]
    pub fn with_radius(mut self, radius: ServiceRadius) -> Self {
        self.radius = radius;
        self
    }
}

/// Complete result for one site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteEvaluation {
    /// Address that was geocoded, when the site came from an address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Facility being planned.
    pub facility_type: FacilityType,
    /// Site location.
    pub coordinate: Coordinate,
    /// Composite suitability score.
    pub score: ScoreBundle,
    /// Build feasibility.
    pub feasibility: FeasibilityResult,
    /// Categorised risks.
    pub risks: RiskReport,
    /// Coverage estimate.
    pub coverage: CoverageResult,
    /// Optional prose explanation.
    pub narrative: Option<String>,
}

/// Runs every analysis for a site.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use placewell_core::test_support::{ScriptedGeocoder, at, sample_reference_data};
/// use placewell_core::{EngineConfig, FacilityType, GeoResolver, SpatialIndex};
/// use placewell_scorer::{SiteEvaluator, SiteRequest};
///
/// let geocoder = ScriptedGeocoder::always(Ok(Some(at(37.335, -121.885))));
/// let index = Arc::new(SpatialIndex::new(Arc::new(sample_reference_data())));
/// let evaluator = SiteEvaluator::new(GeoResolver::new(geocoder), index, EngineConfig::default())
///     .expect("default configuration is valid");
///
/// let request = SiteRequest::new("200 E Santa Clara St", FacilityType::EmergencyShelter);
/// let evaluation = evaluator.evaluate(&request).expect("site evaluates");
/// assert_eq!(evaluation.feasibility.zoning_score, 90.0);
/// assert!(evaluation.narrative.is_none());
/// ```
pub struct SiteEvaluator<P, S = ThreadSleeper> {
    resolver: GeoResolver<P, S>,
    scorer: CompositeScorer,
    feasibility: FeasibilityEngine,
    risks: RiskClassifier,
    coverage: CoverageEstimator,
    narrator: Option<Box<dyn Narrator>>,
}

impl<P, S> SiteEvaluator<P, S> {
    /// Build an evaluator from a resolver, shared index and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Config`] when `config` fails validation.
    pub fn new(
        resolver: GeoResolver<P, S>,
        index: Arc<SpatialIndex>,
        config: EngineConfig,
    ) -> Result<Self, EvaluationError> {
        config.validate()?;
        let EngineConfig {
            scoring,
            geofences,
            coverage,
        } = config;
        Ok(Self {
            resolver,
            scorer: CompositeScorer::new(Arc::clone(&index), scoring),
            feasibility: FeasibilityEngine::new(geofences.clone()),
            risks: RiskClassifier::new(geofences),
            coverage: CoverageEstimator::new(index, coverage),
            narrator: None,
        })
    }

    /// Attach a narrator consulted after every evaluation.
    #[must_use]
    pub fn with_narrator<N>(mut self, narrator: N) -> Self
    where
        N: Narrator + 'static,
    {
        self.narrator = Some(Box::new(narrator));
        self
    }

    /// The resolver used for addresses.
    #[must_use]
    pub const fn resolver(&self) -> &GeoResolver<P, S> {
        &self.resolver
    }

    /// Evaluate a site whose coordinate is already known.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Spatial`] when a reference table is empty.
    pub fn evaluate_at(
        &self,
        coordinate: Coordinate,
        facility_type: FacilityType,
        size: SiteSize,
        radius: ServiceRadius,
    ) -> Result<SiteEvaluation, EvaluationError> {
        self.analyse(None, coordinate, facility_type, size, radius)
    }

    fn analyse(
        &self,
        address: Option<&str>,
        coordinate: Coordinate,
        facility_type: FacilityType,
        size: SiteSize,
        radius: ServiceRadius,
    ) -> Result<SiteEvaluation, EvaluationError> {
        let score = self.scorer.score(coordinate)?;
        let feasibility = self.feasibility.assess(coordinate, facility_type, size);
        let risks = self
            .risks
            .classify(coordinate, facility_type, size, &feasibility);
        let coverage = self.coverage.estimate(coordinate, radius, facility_type)?;

        let narrative = self.narrator.as_ref().and_then(|narrator| {
            narrator.explain(&NarrativeContext {
                address,
                facility_type,
                coordinate,
                score: &score,
                feasibility: &feasibility,
                risks: &risks,
                coverage: &coverage,
            })
        });
        log::debug!(
            "evaluated {facility_type} at {coordinate}: score {}, feasibility {}",
            score.total_score,
            feasibility.overall_score
        );
        Ok(SiteEvaluation {
            address: address.map(str::to_owned),
            facility_type,
            coordinate,
            score,
            feasibility,
            risks,
            coverage,
            narrative,
        })
    }
}

impl<P: GeocodingProvider, S: Sleeper> SiteEvaluator<P, S> {
    /// Resolve the request's address and evaluate the site.
    ///
    /// # Errors
    ///
    /// Returns [`EvaluationError::Geocode`] when the address cannot be
    /// resolved and [`EvaluationError::Spatial`] when a reference table is
    /// empty.
    pub fn evaluate(&self, request: &SiteRequest) -> Result<SiteEvaluation, EvaluationError> {
        let coordinate = self.resolver.resolve(&request.address)?;
        self.analyse(
            Some(&request.address),
            coordinate,
            request.facility_type,
            request.size,
            request.radius,
        )
    }

    /// Evaluate many requests in parallel.
    ///
    /// Results are returned in request order. One failing request does not
    /// affect the others.
    #[must_use]
    pub fn evaluate_batch(
        &self,
        requests: &[SiteRequest],
    ) -> Vec<Result<SiteEvaluation, EvaluationError>> {
        log::debug!("evaluating a batch of {} sites", requests.len());
        requests
            .par_iter()
            .map(|request| self.evaluate(request))
            .collect()
    }
}

impl<P, S> std::fmt::Debug for SiteEvaluator<P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteEvaluator")
            .field("scorer", &self.scorer)
            .field("feasibility", &self.feasibility)
            .field("risks", &self.risks)
            .field("coverage", &self.coverage)
            .field("narrator", &self.narrator.is_some())
            .finish_non_exhaustive()
    }
}
