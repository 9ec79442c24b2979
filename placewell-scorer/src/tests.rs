//! Unit coverage for composite scoring and site evaluation.
#![forbid(unsafe_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use placewell_core::test_support::{
    RecordingSleeper, ScriptedGeocoder, at, sample_reference_data, sample_tables, shelter,
    timeout,
};
use placewell_core::{
    ConfigError, EngineConfig, FacilityType, GeoResolver, GeocodeError, ReferenceData,
    ReferenceTable, ReferenceTables, ScoringConstants, ServiceRadius, SiteSize, SpatialError,
    SpatialIndex,
};
use rstest::{fixture, rstest};

use crate::composite::round_to_hundredths;
use crate::{
    CompositeScorer, EvaluationError, NarrativeContext, Narrator, ScoreComponent, SiteEvaluator,
    SiteRequest,
};

fn index_for(tables: ReferenceTables) -> Arc<SpatialIndex> {
    let data = ReferenceData::new(tables).expect("tables validate");
    Arc::new(SpatialIndex::new(Arc::new(data)))
}

#[fixture]
fn index() -> Arc<SpatialIndex> {
    Arc::new(SpatialIndex::new(Arc::new(sample_reference_data())))
}

#[fixture]
fn scorer(index: Arc<SpatialIndex>) -> CompositeScorer {
    CompositeScorer::new(index, ScoringConstants::default())
}

type TestEvaluator = SiteEvaluator<Arc<ScriptedGeocoder>, Arc<RecordingSleeper>>;

fn evaluator_with(geocoder: &Arc<ScriptedGeocoder>, index: Arc<SpatialIndex>) -> TestEvaluator {
    let resolver =
        GeoResolver::new(Arc::clone(geocoder)).with_sleeper(Arc::new(RecordingSleeper::default()));
    SiteEvaluator::new(resolver, index, EngineConfig::default()).expect("valid configuration")
}

#[rstest]
fn downtown_score_matches_hand_computation(scorer: CompositeScorer) {
    let bundle = scorer.score(at(37.335, -121.885)).expect("tables populated");

    assert_eq!(bundle.matched_tract_id, "T-DOWNTOWN");
    assert_eq!(bundle.nearby_shelters, 2);
    assert_eq!(bundle.total_score, 0.63);
    assert_eq!(bundle.component(ScoreComponent::PovertyRate), Some(0.5));
    assert_eq!(bundle.component(ScoreComponent::UnhousedCount), Some(0.5));
    assert_eq!(
        bundle.component(ScoreComponent::CommunityImpact),
        Some(0.549_999_999_999_999_9)
    );
    assert_eq!(
        bundle.component(ScoreComponent::Infrastructure),
        Some(0.816_666_666_666_666_8)
    );
    assert_eq!(
        bundle.component(ScoreComponent::ShelterAccess),
        Some(0.099_999_999_999_999_98)
    );
    assert_eq!(bundle.component(ScoreComponent::AccessToServices), Some(0.55));
    assert_eq!(
        bundle.component(ScoreComponent::EnvironmentalJustice),
        Some(0.65)
    );
}

#[rstest]
fn caps_need_signals_at_one(scorer: CompositeScorer) {
    let bundle = scorer.score(at(37.300, -121.890)).expect("tables populated");

    assert_eq!(bundle.matched_tract_id, "T-RES");
    assert_eq!(bundle.component(ScoreComponent::PovertyRate), Some(1.0));
    assert_eq!(bundle.component(ScoreComponent::UnhousedCount), Some(1.0));
    assert_eq!(
        bundle.component(ScoreComponent::CommunityImpact),
        Some(0.883_333_333_333_333_3)
    );
}

#[rstest]
fn isolated_site_uses_fixed_shelter_access() {
    let tables = ReferenceTables {
        shelters: vec![shelter("S-FAR", at(37.500, -121.700), 200, 20)],
        ..sample_tables()
    };
    let scorer = CompositeScorer::new(index_for(tables), ScoringConstants::default());

    let bundle = scorer.score(at(37.335, -121.885)).expect("tables populated");

    assert_eq!(bundle.nearby_shelters, 0);
    assert_eq!(bundle.component(ScoreComponent::ShelterAccess), Some(0.2));
    assert_eq!(bundle.component(ScoreComponent::AccessToServices), Some(0.575));
    assert_eq!(bundle.total_score, 0.64);
}

#[rstest]
fn over_capacity_shelters_clamp_access_to_zero() {
    let tables = ReferenceTables {
        shelters: vec![shelter("S-FULL", at(37.336, -121.884), 10, 15)],
        ..sample_tables()
    };
    let scorer = CompositeScorer::new(index_for(tables), ScoringConstants::default());

    let bundle = scorer.score(at(37.335, -121.885)).expect("tables populated");

    assert_eq!(bundle.component(ScoreComponent::ShelterAccess), Some(0.0));
}

#[rstest]
fn over_reported_shelter_still_counts_against_spare_neighbours() {
    let tables = ReferenceTables {
        shelters: vec![
            shelter("S-OVER", at(37.336, -121.884), 100, 150),
            shelter("S-EMPTY", at(37.334, -121.886), 100, 0),
        ],
        ..sample_tables()
    };
    let scorer = CompositeScorer::new(index_for(tables), ScoringConstants::default());

    let bundle = scorer.score(at(37.335, -121.885)).expect("tables populated");

    assert_eq!(bundle.nearby_shelters, 2);
    assert_eq!(bundle.component(ScoreComponent::ShelterAccess), Some(0.25));
}

#[rstest]
#[case(ReferenceTable::Tracts)]
#[case(ReferenceTable::Shelters)]
fn empty_tables_are_reported(#[case] table: ReferenceTable) {
    let mut tables = sample_tables();
    match table {
        ReferenceTable::Tracts => tables.tracts.clear(),
        ReferenceTable::Shelters => tables.shelters.clear(),
        ReferenceTable::Population => tables.population.clear(),
    }
    let scorer = CompositeScorer::new(index_for(tables), ScoringConstants::default());

    assert_eq!(
        scorer.score(at(37.335, -121.885)),
        Err(SpatialError::EmptyReferenceSet { table })
    );
}

#[rstest]
fn repeated_scoring_is_bit_identical(scorer: CompositeScorer) {
    let site = at(37.3301, -121.8812);
    let first = scorer.score(site).expect("tables populated");
    let second = scorer.score(site).expect("tables populated");
    assert_eq!(first, second);
    assert_eq!(first.total_score.to_bits(), second.total_score.to_bits());
}

#[rstest]
#[case(0.625, 0.62)]
#[case(0.635, 0.64)]
#[case(0.644_999, 0.64)]
#[case(0.005, 0.0)]
#[case(0.015, 0.02)]
fn rounds_ties_to_even(#[case] raw: f64, #[case] expected: f64) {
    assert_eq!(round_to_hundredths(raw), expected);
}

#[rstest]
fn evaluates_resolved_address(index: Arc<SpatialIndex>) {
    let geocoder = Arc::new(ScriptedGeocoder::always(Ok(Some(at(37.335, -121.885)))));
    let evaluator = evaluator_with(&geocoder, index);
    let request = SiteRequest::new("  200 E Santa Clara St  ", FacilityType::EmergencyShelter)
        .with_size(SiteSize::new(800.0).expect("valid size"))
        .with_radius(ServiceRadius::new(2.0).expect("valid radius"));

    let evaluation = evaluator.evaluate(&request).expect("site evaluates");

    assert_eq!(geocoder.queries(), vec!["200 E Santa Clara St".to_owned()]);
    assert_eq!(
        evaluation.address.as_deref(),
        Some("  200 E Santa Clara St  ")
    );
    assert_eq!(evaluation.score.total_score, 0.63);
    assert_eq!(evaluation.feasibility.overall_score, 88.0);
    assert_eq!(evaluation.coverage.population_covered, 7000);
    assert!(evaluation.coverage.within_recommended_radius);
    assert!(evaluation.narrative.is_none());
}

#[rstest]
fn geocoding_failures_surface_as_geocode_errors(index: Arc<SpatialIndex>) {
    let geocoder = Arc::new(ScriptedGeocoder::always(Err(timeout())));
    let evaluator = evaluator_with(&geocoder, index);
    let request = SiteRequest::new("1 Nowhere Lane", FacilityType::TemporaryShelter);

    let outcome = evaluator.evaluate(&request);

    assert_eq!(
        outcome,
        Err(EvaluationError::Geocode(GeocodeError::Timeout { attempts: 3 }))
    );
    assert_eq!(geocoder.calls(), 3);
}

#[rstest]
fn evaluate_at_skips_geocoding(index: Arc<SpatialIndex>) {
    let geocoder = Arc::new(ScriptedGeocoder::always(Ok(None)));
    let evaluator = evaluator_with(&geocoder, index);

    let evaluation = evaluator
        .evaluate_at(
            at(37.300, -121.890),
            FacilityType::TransitionalHousing,
            SiteSize::default(),
            ServiceRadius::default(),
        )
        .expect("site evaluates");

    assert_eq!(geocoder.calls(), 0);
    assert!(evaluation.address.is_none());
    assert_eq!(evaluation.feasibility.zoning_score, 85.0);
}

#[rstest]
fn invalid_configuration_is_rejected(index: Arc<SpatialIndex>) {
    let mut config = EngineConfig::default();
    config.scoring.environmental_justice = 1.5;
    let resolver = GeoResolver::new(ScriptedGeocoder::always(Ok(None)));

    let outcome = SiteEvaluator::new(resolver, index, config);

    assert!(matches!(
        outcome,
        Err(EvaluationError::Config(ConfigError::ScoreOutOfRange { .. }))
    ));
}

struct CountingNarrator {
    calls: AtomicUsize,
}

impl Narrator for CountingNarrator {
    fn explain(&self, context: &NarrativeContext<'_>) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Some(format!(
            "{} at {} scores {:.2}",
            context.facility_type, context.coordinate, context.score.total_score
        ))
    }
}

#[rstest]
fn narrator_only_adds_prose(index: Arc<SpatialIndex>) {
    let geocoder = Arc::new(ScriptedGeocoder::always(Ok(Some(at(37.335, -121.885)))));
    let request = SiteRequest::new("200 E Santa Clara St", FacilityType::EmergencyShelter);
    let plain = evaluator_with(&geocoder, Arc::clone(&index))
        .evaluate(&request)
        .expect("site evaluates");

    let narrator = Arc::new(CountingNarrator {
        calls: AtomicUsize::new(0),
    });
    let narrated = evaluator_with(&geocoder, index)
        .with_narrator(Arc::clone(&narrator))
        .evaluate(&request)
        .expect("site evaluates");

    assert_eq!(narrator.calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        narrated.narrative.as_deref(),
        Some("Emergency Shelter at (37.335000, -121.885000) scores 0.63")
    );
    assert_eq!(narrated.score, plain.score);
    assert_eq!(narrated.feasibility, plain.feasibility);
    assert_eq!(narrated.risks, plain.risks);
    assert_eq!(narrated.coverage, plain.coverage);
}

#[rstest]
fn batch_preserves_order_and_isolates_failures(index: Arc<SpatialIndex>) {
    let geocoder = Arc::new(ScriptedGeocoder::always(Ok(Some(at(37.335, -121.885)))));
    let evaluator = evaluator_with(&geocoder, index);
    let requests = vec![
        SiteRequest::new("200 E Santa Clara St", FacilityType::EmergencyShelter),
        SiteRequest::new("   ", FacilityType::EmergencyShelter),
        SiteRequest::new("200 E Santa Clara St", FacilityType::TransitionalHousing),
    ];

    let results = evaluator.evaluate_batch(&requests);

    assert_eq!(results.len(), 3);
    let zoning: Vec<Option<f64>> = results
        .iter()
        .map(|result| {
            result
                .as_ref()
                .ok()
                .map(|evaluation| evaluation.feasibility.zoning_score)
        })
        .collect();
    assert_eq!(zoning, vec![Some(90.0), None, Some(75.0)]);
    assert!(matches!(
        results.get(1),
        Some(Err(EvaluationError::Geocode(
            GeocodeError::AddressNotFound { .. }
        )))
    ));
}

#[rstest]
fn evaluation_serialises_every_section(index: Arc<SpatialIndex>) {
    let geocoder = Arc::new(ScriptedGeocoder::always(Ok(Some(at(37.335, -121.885)))));
    let evaluation = evaluator_with(&geocoder, index)
        .evaluate(&SiteRequest::new(
            "200 E Santa Clara St",
            FacilityType::SupportiveHousing,
        ))
        .expect("site evaluates");

    let json = serde_json::to_value(&evaluation).expect("serialise evaluation");

    for key in ["coordinate", "score", "feasibility", "risks", "coverage"] {
        assert!(json.get(key).is_some(), "missing {key}");
    }
    assert_eq!(
        json.pointer("/score/component_scores/shelter_access"),
        Some(&serde_json::json!(0.099_999_999_999_999_98))
    );
    assert_eq!(
        json.pointer("/risks/zoning_challenges/1"),
        Some(&serde_json::json!(
            "Permanent housing zoning requirements apply"
        ))
    );
}
