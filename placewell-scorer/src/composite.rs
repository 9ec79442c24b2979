//! Weighted multi-factor suitability score for a coordinate.

use std::collections::BTreeMap;
use std::sync::Arc;

use placewell_core::{Coordinate, ScoringConstants, ShelterMatch, SpatialError, SpatialIndex};
use serde::Serialize;

/// Weight of the access-to-services sub-score in the total.
pub const SERVICES_WEIGHT: f64 = 0.4;
/// Weight of the infrastructure sub-score in the total.
pub const INFRASTRUCTURE_WEIGHT: f64 = 0.3;
/// Weight of the community-impact sub-score in the total.
pub const COMMUNITY_WEIGHT: f64 = 0.3;

const WEIGHT_SUM: f64 = SERVICES_WEIGHT + INFRASTRUCTURE_WEIGHT + COMMUNITY_WEIGHT;
const _: () = assert!(
    WEIGHT_SUM > 1.0 - f64::EPSILON && WEIGHT_SUM < 1.0 + f64::EPSILON,
    "composite weights must sum to 1.0"
);

/// Named sub-scores carried by a [`ScoreBundle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreComponent {
    /// Weighted services signal including shelter access.
    AccessToServices,
    /// Infrastructure readiness.
    Infrastructure,
    /// Community need and impact.
    CommunityImpact,
    /// Poverty rate of the matched tract, normalised.
    PovertyRate,
    /// Unhoused count of the matched tract, normalised.
    UnhousedCount,
    /// Spare capacity at nearby shelters.
    ShelterAccess,
    /// Environmental justice signal.
    EnvironmentalJustice,
}

impl ScoreComponent {
    /// Return the human-readable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AccessToServices => "Access to Services",
            Self::Infrastructure => "Infrastructure",
            Self::CommunityImpact => "Community Impact",
            Self::PovertyRate => "Poverty Rate",
            Self::UnhousedCount => "Unhoused Count",
            Self::ShelterAccess => "Shelter Access",
            Self::EnvironmentalJustice => "Environmental Justice",
        }
    }
}

impl std::fmt::Display for ScoreComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total score and every sub-score behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBundle {
    /// Weighted total in `[0, 1]`, rounded to two decimal places.
    pub total_score: f64,
    /// Unrounded sub-scores, each in `[0, 1]`.
    pub component_scores: BTreeMap<ScoreComponent, f64>,
    /// Identifier of the tract matched to the coordinate.
    pub matched_tract_id: String,
    /// Number of shelters found within the search radius.
    pub nearby_shelters: usize,
}

impl ScoreBundle {
    /// Look up a single sub-score.
    #[must_use]
    pub fn component(&self, component: ScoreComponent) -> Option<f64> {
        self.component_scores.get(&component).copied()
    }
}

/// Scores coordinates against the shared reference tables.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use placewell_core::test_support::{at, sample_reference_data};
/// use placewell_core::{ScoringConstants, SpatialIndex};
/// use placewell_scorer::CompositeScorer;
///
/// let index = Arc::new(SpatialIndex::new(Arc::new(sample_reference_data())));
/// let scorer = CompositeScorer::new(index, ScoringConstants::default());
/// let bundle = scorer.score(at(37.335, -121.885)).expect("tables are populated");
/// assert_eq!(bundle.matched_tract_id, "T-DOWNTOWN");
/// assert_eq!(bundle.total_score, 0.63);
/// ```
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    index: Arc<SpatialIndex>,
    constants: ScoringConstants,
}

impl CompositeScorer {
    /// Create a scorer over `index` using `constants`.
    #[must_use]
    pub const fn new(index: Arc<SpatialIndex>, constants: ScoringConstants) -> Self {
        Self { index, constants }
    }

    /// The constants in use.
    #[must_use]
    pub const fn constants(&self) -> &ScoringConstants {
        &self.constants
    }

    /// Score `coordinate`.
    ///
    /// Having no shelter within the search radius is a valid outcome and is
    /// scored as isolation.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyReferenceSet`] when the tract or shelter
    /// table is empty.
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted scoring requires float maths"
    )]
    pub fn score(&self, coordinate: Coordinate) -> Result<ScoreBundle, SpatialError> {
        let constants = &self.constants;
        let tract = self.index.nearest_tract(coordinate)?;

        let poverty = (tract.poverty_rate_pct / constants.poverty_rate_cap_pct).min(1.0);
        let unhoused =
            (f64::from(tract.unhoused_count) / constants.unhoused_count_cap).min(1.0);
        let environmental = constants.environmental_justice;
        let community = mean(&[poverty, unhoused, environmental]);

        let infrastructure = mean(&constants.infrastructure_factors);

        let nearby = self
            .index
            .shelters_within(coordinate, constants.shelter_search_radius_km)?;
        let shelter_access = shelter_access(&nearby, constants.isolated_shelter_access);
        let [health, food, employment] = constants.service_factors;
        let services = mean(&[shelter_access, health, food, employment]);

        let total = round_to_hundredths(
            SERVICES_WEIGHT * services
                + INFRASTRUCTURE_WEIGHT * infrastructure
                + COMMUNITY_WEIGHT * community,
        );
        log::debug!(
            "scored {coordinate} against tract {}: total {total}",
            tract.id
        );

        let component_scores = BTreeMap::from([
            (ScoreComponent::AccessToServices, services),
            (ScoreComponent::Infrastructure, infrastructure),
            (ScoreComponent::CommunityImpact, community),
            (ScoreComponent::PovertyRate, poverty),
            (ScoreComponent::UnhousedCount, unhoused),
            (ScoreComponent::ShelterAccess, shelter_access),
            (ScoreComponent::EnvironmentalJustice, environmental),
        ]);
        Ok(ScoreBundle {
            total_score: total,
            component_scores,
            matched_tract_id: tract.id.clone(),
            nearby_shelters: nearby.len(),
        })
    }
}

/// Spare-capacity signal for the shelters near a site.
#[expect(
    clippy::float_arithmetic,
    reason = "averaging occupancy ratios requires float maths"
)]
fn shelter_access(nearby: &[ShelterMatch<'_>], isolated: f64) -> f64 {
    if nearby.is_empty() {
        return isolated;
    }
    for found in nearby {
        if found.shelter.is_over_capacity() {
            log::warn!(
                "shelter {} reports occupancy {} above capacity {}; clamping",
                found.shelter.id,
                found.shelter.current_occupancy,
                found.shelter.capacity
            );
        }
    }
    let ratios: Vec<f64> = nearby
        .iter()
        .map(|found| found.shelter.occupancy_ratio())
        .collect();
    (1.0 - mean(&ratios)).clamp(0.0, 1.0)
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "sub-score lists are short and averaging requires float maths"
)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Round to two decimal places, resolving exact ties to the even neighbour.
#[expect(clippy::float_arithmetic, reason = "decimal rounding requires float maths")]
pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
