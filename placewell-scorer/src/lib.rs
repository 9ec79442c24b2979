//! Site analysis for emergency and interim housing.
//!
//! The crate turns a coordinate (or an address, via
//! [`GeoResolver`](placewell_core::GeoResolver)) into four independent
//! analyses:
//! - **Composite scoring** weighs access to services, infrastructure and
//!   community impact into a `0.0..=1.0` total using the tract and shelter
//!   tables held by a [`SpatialIndex`](placewell_core::SpatialIndex).
//! - **Feasibility** applies a zoning and infrastructure rule table keyed by
//!   geofence, facility type and site size.
//! - **Risk classification** derives categorised notes from the feasibility
//!   scores and the site attributes.
//! - **Coverage** sums the population reached within a service radius.
//!
//! [`SiteEvaluator`] runs all four, optionally asks a [`Narrator`] for a
//! prose explanation, and evaluates batches in parallel.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use placewell_core::test_support::{ScriptedGeocoder, at, sample_reference_data};
//! use placewell_core::{FacilityType, GeoResolver, ServiceRadius, SiteSize, SpatialIndex};
//! use placewell_scorer::SiteEvaluator;
//!
//! let index = Arc::new(SpatialIndex::new(Arc::new(sample_reference_data())));
//! let resolver = GeoResolver::new(ScriptedGeocoder::always(Ok(None)));
//! let evaluator = SiteEvaluator::new(resolver, index, Default::default())
//!     .expect("default configuration is valid");
//! let evaluation = evaluator
//!     .evaluate_at(
//!         at(37.335, -121.885),
//!         FacilityType::TemporaryShelter,
//!         SiteSize::default(),
//!         ServiceRadius::default(),
//!     )
//!     .expect("reference tables are populated");
//! assert_eq!(evaluation.feasibility.overall_score, 93.4);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod composite;
mod coverage;
mod error;
mod evaluation;
mod feasibility;
mod narrative;
mod risk;

pub use composite::{
    COMMUNITY_WEIGHT, CompositeScorer, INFRASTRUCTURE_WEIGHT, SERVICES_WEIGHT, ScoreBundle,
    ScoreComponent,
};
pub use coverage::{CoverageEstimator, CoverageResult};
pub use error::EvaluationError;
pub use evaluation::{SiteEvaluation, SiteEvaluator, SiteRequest};
pub use feasibility::{FeasibilityEngine, FeasibilityResult, ZONING_WEIGHT};
pub use narrative::{NarrativeContext, Narrator};
pub use risk::{RiskCategory, RiskClassifier, RiskReport};

/// Weight of the infrastructure score in the feasibility overall score.
pub const FEASIBILITY_INFRASTRUCTURE_WEIGHT: f64 = feasibility::INFRASTRUCTURE_WEIGHT;

#[cfg(test)]
mod tests;
