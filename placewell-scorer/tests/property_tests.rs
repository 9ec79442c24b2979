//! Property-based tests for site scoring.
//!
//! These tests use `proptest` to assert invariants that must hold for any
//! valid reference data and site, complementing the behavioural scenarios.
//!
//! # Invariants tested
//!
//! - **Component bounds:** every composite sub-score lies in `[0, 1]` and the
//!   total lies in `[0, 1]`.
//! - **Feasibility bounds:** zoning, infrastructure and overall scores lie in
//!   `[0, 100]`; zoning and infrastructure are whole numbers.
//! - **Idempotence:** scoring the same site twice yields bit-identical
//!   results.
//! - **Risk completeness:** every risk category carries at least one note.

use std::sync::Arc;

use placewell_core::test_support::{at, cell, shelter, tract};
use placewell_core::{
    Coordinate, FacilityType, ReferenceData, ReferenceTables, ScoringConstants, SiteSize,
    SpatialIndex,
};
use placewell_scorer::{CompositeScorer, FeasibilityEngine, RiskCategory, RiskClassifier};
use proptest::prelude::*;

fn site_strategy() -> impl Strategy<Value = Coordinate> {
    (37.25_f64..=37.42, -121.98_f64..=-121.83)
        .prop_map(|(latitude, longitude)| at(latitude, longitude))
}

fn facility_strategy() -> impl Strategy<Value = FacilityType> {
    prop::sample::select(FacilityType::ALL.to_vec())
}

fn size_strategy() -> impl Strategy<Value = SiteSize> {
    (100.0_f64..=5000.0).prop_map(|sqm| SiteSize::new(sqm).expect("strategy stays in range"))
}

/// Random tract and shelter tables scattered around San Jose.
fn tables_strategy() -> impl Strategy<Value = ReferenceTables> {
    let tracts = prop::collection::vec((site_strategy(), 0.0_f64..=100.0, 0_u32..=2000), 1..12);
    let shelters = prop::collection::vec((site_strategy(), 0_u32..=300, 0_u32..=400), 1..12);
    (tracts, shelters).prop_map(|(tracts, shelters)| ReferenceTables {
        tracts: tracts
            .into_iter()
            .enumerate()
            .map(|(position, (location, poverty, unhoused))| {
                tract(&format!("T-{position}"), location, poverty, unhoused)
            })
            .collect(),
        shelters: shelters
            .into_iter()
            .enumerate()
            .map(|(position, (location, capacity, occupancy))| {
                shelter(&format!("S-{position}"), location, capacity, occupancy)
            })
            .collect(),
        population: vec![cell("P-0", at(37.335, -121.885), 1000)],
        pit_summaries: Vec::new(),
    })
}

fn scorer_for(tables: ReferenceTables) -> CompositeScorer {
    let data = ReferenceData::new(tables).expect("generated tables validate");
    CompositeScorer::new(
        Arc::new(SpatialIndex::new(Arc::new(data))),
        ScoringConstants::default(),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: composite sub-scores and the total stay in the unit interval.
    #[test]
    fn composite_scores_are_bounded(tables in tables_strategy(), site in site_strategy()) {
        let bundle = scorer_for(tables).score(site).expect("tables populated");

        prop_assert!((0.0..=1.0).contains(&bundle.total_score));
        for (component, value) in &bundle.component_scores {
            prop_assert!(
                (0.0..=1.0).contains(value),
                "{component} = {value} is outside [0, 1]"
            );
        }
    }

    /// Property: scoring is a pure function of its inputs.
    #[test]
    fn composite_scoring_is_idempotent(tables in tables_strategy(), site in site_strategy()) {
        let scorer = scorer_for(tables);
        let first = scorer.score(site).expect("tables populated");
        let second = scorer.score(site).expect("tables populated");

        prop_assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
        prop_assert_eq!(first, second);
    }

    /// Property: feasibility scores stay in `[0, 100]`.
    #[test]
    fn feasibility_scores_are_bounded(
        site in site_strategy(),
        facility in facility_strategy(),
        size in size_strategy(),
    ) {
        let result = FeasibilityEngine::default().assess(site, facility, size);

        for score in [result.zoning_score, result.infrastructure_score, result.overall_score] {
            prop_assert!((0.0..=100.0).contains(&score), "score {score} out of range");
        }
        prop_assert_eq!(result.zoning_score, result.zoning_score.round());
        prop_assert_eq!(result.infrastructure_score, result.infrastructure_score.round());
    }

    /// Property: no risk category is ever empty.
    #[test]
    fn every_risk_category_has_notes(
        site in site_strategy(),
        facility in facility_strategy(),
        size in size_strategy(),
    ) {
        let feasibility = FeasibilityEngine::default().assess(site, facility, size);
        let report = RiskClassifier::default().classify(site, facility, size, &feasibility);

        for category in RiskCategory::ALL {
            prop_assert!(!report.notes(category).is_empty(), "{category} has no notes");
        }
    }
}
