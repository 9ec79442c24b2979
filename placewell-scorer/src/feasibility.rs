//! Rule-based build feasibility for a site.
//!
//! Scores follow a fixed order: base score, geofence and facility-type rule,
//! facility-type multiplier, then clamp to `[0, 100]` and round to an integer.

use placewell_core::{Coordinate, FacilityType, Geofences, SiteSize, Zone};
use serde::Serialize;

/// Weight of the zoning score in the overall score.
pub const ZONING_WEIGHT: f64 = 0.6;
/// Weight of the infrastructure score in the overall score.
pub const INFRASTRUCTURE_WEIGHT: f64 = 0.4;

const WEIGHT_SUM: f64 = ZONING_WEIGHT + INFRASTRUCTURE_WEIGHT;
const _: () = assert!(
    WEIGHT_SUM > 1.0 - f64::EPSILON && WEIGHT_SUM < 1.0 + f64::EPSILON,
    "feasibility weights must sum to 1.0"
);

const DOWNTOWN_FAVOURABLE: f64 = 90.0;
const DOWNTOWN_OTHER: f64 = 75.0;
const RESIDENTIAL_FAVOURABLE: f64 = 85.0;
const RESIDENTIAL_OTHER: f64 = 55.0;
const OUTSIDE_GEOFENCES: f64 = 80.0;

const LARGE_SITE_SQM: f64 = 2000.0;
const MEDIUM_SITE_SQM: f64 = 1000.0;

const TEMPORARY_ZONING_MULTIPLIER: f64 = 1.1;
const SUPPORTIVE_INFRASTRUCTURE_MULTIPLIER: f64 = 0.9;

/// Feasibility scores for one site, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeasibilityResult {
    /// Zoning score, a whole number.
    pub zoning_score: f64,
    /// Infrastructure score, a whole number.
    pub infrastructure_score: f64,
    /// Weighted overall score, rounded to one decimal place.
    pub overall_score: f64,
    /// Zone the site falls into.
    pub zone: Zone,
}

/// Applies the zoning and infrastructure rule table.
///
/// # Examples
/// ```
/// use placewell_core::{Coordinate, FacilityType, Geofences, SiteSize};
/// use placewell_scorer::FeasibilityEngine;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = FeasibilityEngine::new(Geofences::default());
/// let result = engine.assess(
///     Coordinate::new(37.335, -121.885)?,
///     FacilityType::EmergencyShelter,
///     SiteSize::new(800.0)?,
/// );
/// assert_eq!(result.zoning_score, 90.0);
/// assert_eq!(result.infrastructure_score, 85.0);
/// assert_eq!(result.overall_score, 88.0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FeasibilityEngine {
    geofences: Geofences,
}

impl FeasibilityEngine {
    /// Create an engine using `geofences` for zoning.
    #[must_use]
    pub const fn new(geofences: Geofences) -> Self {
        Self { geofences }
    }

    /// The geofences in use.
    #[must_use]
    pub const fn geofences(&self) -> &Geofences {
        &self.geofences
    }

    /// Assess a site.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "weighted scoring requires float maths"
    )]
    pub fn assess(
        &self,
        coordinate: Coordinate,
        facility: FacilityType,
        size: SiteSize,
    ) -> FeasibilityResult {
        let zone = self.geofences.zone(coordinate);

        let mut zoning = zoning_base(zone, facility);
        let mut infrastructure = infrastructure_base(size);
        match facility {
            FacilityType::TemporaryShelter => zoning *= TEMPORARY_ZONING_MULTIPLIER,
            FacilityType::SupportiveHousing => {
                infrastructure *= SUPPORTIVE_INFRASTRUCTURE_MULTIPLIER;
            }
            FacilityType::TransitionalHousing | FacilityType::EmergencyShelter => {}
        }
        let zoning_score = to_whole_score(zoning);
        let infrastructure_score = to_whole_score(infrastructure);
        let overall_score = round_to_tenths(
            ZONING_WEIGHT * zoning_score + INFRASTRUCTURE_WEIGHT * infrastructure_score,
        );
        log::debug!(
            "feasibility for {facility} at {coordinate} ({zone}): zoning {zoning_score}, \
             infrastructure {infrastructure_score}, overall {overall_score}"
        );
        FeasibilityResult {
            zoning_score,
            infrastructure_score,
            overall_score,
            zone,
        }
    }
}

const fn zoning_base(zone: Zone, facility: FacilityType) -> f64 {
    match (zone, facility) {
        (Zone::Downtown, FacilityType::EmergencyShelter | FacilityType::TemporaryShelter) => {
            DOWNTOWN_FAVOURABLE
        }
        (Zone::Downtown, _) => DOWNTOWN_OTHER,
        (Zone::Residential, FacilityType::TransitionalHousing) => RESIDENTIAL_FAVOURABLE,
        (Zone::Residential, _) => RESIDENTIAL_OTHER,
        (Zone::Outside, _) => OUTSIDE_GEOFENCES,
    }
}

fn infrastructure_base(size: SiteSize) -> f64 {
    let sqm = size.square_metres();
    if sqm > LARGE_SITE_SQM {
        60.0
    } else if sqm > MEDIUM_SITE_SQM {
        75.0
    } else {
        85.0
    }
}

/// Clamp to `[0, 100]` and round, with exact halves going to the even score.
fn to_whole_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0).round_ties_even()
}

#[expect(clippy::float_arithmetic, reason = "decimal rounding requires float maths")]
fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use placewell_core::test_support::at;
    use rstest::{fixture, rstest};

    #[fixture]
    fn engine() -> FeasibilityEngine {
        FeasibilityEngine::default()
    }

    fn size(sqm: f64) -> SiteSize {
        SiteSize::new(sqm).expect("valid size")
    }

    const DOWNTOWN: (f64, f64) = (37.335, -121.885);
    const RESIDENTIAL: (f64, f64) = (37.300, -121.890);
    const OUTSIDE: (f64, f64) = (37.400, -121.950);

    #[rstest]
    #[case(DOWNTOWN, FacilityType::EmergencyShelter, 90.0)]
    #[case(DOWNTOWN, FacilityType::TemporaryShelter, 99.0)]
    #[case(DOWNTOWN, FacilityType::SupportiveHousing, 75.0)]
    #[case(DOWNTOWN, FacilityType::TransitionalHousing, 75.0)]
    #[case(RESIDENTIAL, FacilityType::TransitionalHousing, 85.0)]
    #[case(RESIDENTIAL, FacilityType::EmergencyShelter, 55.0)]
    #[case(RESIDENTIAL, FacilityType::TemporaryShelter, 61.0)]
    #[case(OUTSIDE, FacilityType::EmergencyShelter, 80.0)]
    #[case(OUTSIDE, FacilityType::TemporaryShelter, 88.0)]
    fn zoning_follows_rule_table(
        engine: FeasibilityEngine,
        #[case] location: (f64, f64),
        #[case] facility: FacilityType,
        #[case] expected: f64,
    ) {
        let result = engine.assess(at(location.0, location.1), facility, size(500.0));
        assert_eq!(result.zoning_score, expected);
    }

    #[rstest]
    #[case(500.0, FacilityType::EmergencyShelter, 85.0)]
    #[case(1000.0, FacilityType::EmergencyShelter, 85.0)]
    #[case(1000.5, FacilityType::EmergencyShelter, 75.0)]
    #[case(2000.0, FacilityType::EmergencyShelter, 75.0)]
    #[case(2500.0, FacilityType::EmergencyShelter, 60.0)]
    #[case(500.0, FacilityType::SupportiveHousing, 76.0)]
    #[case(1500.0, FacilityType::SupportiveHousing, 68.0)]
    #[case(2500.0, FacilityType::SupportiveHousing, 54.0)]
    fn infrastructure_follows_size_steps(
        engine: FeasibilityEngine,
        #[case] sqm: f64,
        #[case] facility: FacilityType,
        #[case] expected: f64,
    ) {
        let result = engine.assess(at(DOWNTOWN.0, DOWNTOWN.1), facility, size(sqm));
        assert_eq!(result.infrastructure_score, expected);
    }

    #[rstest]
    fn overall_uses_sixty_forty_weighting(engine: FeasibilityEngine) {
        let result = engine.assess(
            at(DOWNTOWN.0, DOWNTOWN.1),
            FacilityType::TemporaryShelter,
            size(500.0),
        );
        assert_eq!(result.overall_score, 93.4);
        assert_eq!(result.zone, Zone::Downtown);
    }

    #[rstest]
    fn large_sites_score_sixty_regardless_of_location(engine: FeasibilityEngine) {
        for location in [DOWNTOWN, RESIDENTIAL, OUTSIDE] {
            let result = engine.assess(
                at(location.0, location.1),
                FacilityType::TransitionalHousing,
                size(2500.0),
            );
            assert_eq!(result.infrastructure_score, 60.0);
        }
    }

    #[rstest]
    fn whole_score_clamps_before_rounding() {
        assert_eq!(to_whole_score(120.4), 100.0);
        assert_eq!(to_whole_score(-3.0), 0.0);
        assert_eq!(to_whole_score(67.5), 68.0);
        assert_eq!(to_whole_score(76.5), 76.0);
    }

    #[rstest]
    fn small_supportive_housing_rounds_half_to_even(engine: FeasibilityEngine) {
        let result = engine.assess(
            at(DOWNTOWN.0, DOWNTOWN.1),
            FacilityType::SupportiveHousing,
            size(800.0),
        );
        assert_eq!(result.zoning_score, 75.0);
        assert_eq!(result.infrastructure_score, 76.0);
        assert_eq!(result.overall_score, 75.4);
    }
}
