//! Categorised risk notes derived from a feasibility assessment.

use std::collections::BTreeMap;

use placewell_core::{Coordinate, FacilityType, Geofences, SiteSize, Zone};
use serde::Serialize;

use crate::feasibility::FeasibilityResult;

const HIGH_ZONING_RISK_BELOW: f64 = 70.0;
const FAVOURABLE_ZONING_FROM: f64 = 85.0;
const HIGH_CONSTRUCTION_RISK_BELOW: f64 = 60.0;
const MODERATE_CONSTRUCTION_RISK_BELOW: f64 = 80.0;
const LARGE_SITE_SQM: f64 = 2000.0;
const MEDIUM_SITE_SQM: f64 = 1000.0;

/// Groups of risk notes, ordered as they are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Permitting and land-use risks.
    ZoningChallenges,
    /// Site works and utility risks.
    ConstructionRisks,
    /// Neighbourhood and stakeholder concerns.
    PoliticalSensitivities,
    /// Environmental review items.
    EnvironmentalFlags,
}

impl RiskCategory {
    /// Every category in reporting order.
    pub const ALL: [Self; 4] = [
        Self::ZoningChallenges,
        Self::ConstructionRisks,
        Self::PoliticalSensitivities,
        Self::EnvironmentalFlags,
    ];

    /// Return the human-readable label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ZoningChallenges => "Zoning Challenges",
            Self::ConstructionRisks => "Construction Risks",
            Self::PoliticalSensitivities => "Political Sensitivities",
            Self::EnvironmentalFlags => "Environmental Flags",
        }
    }
}

impl std::fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk notes keyed by category. Every category is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RiskReport {
    notes: BTreeMap<RiskCategory, Vec<&'static str>>,
}

impl RiskReport {
    /// Notes recorded under `category`.
    #[must_use]
    pub fn notes(&self, category: RiskCategory) -> &[&'static str] {
        self.notes.get(&category).map_or(&[], Vec::as_slice)
    }

    /// Iterate categories and their notes in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, &[&'static str])> {
        self.notes
            .iter()
            .map(|(category, notes)| (*category, notes.as_slice()))
    }

    /// Total number of notes across all categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notes.values().map(Vec::len).sum()
    }

    /// Whether no notes were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Turns feasibility scores and site attributes into risk notes.
///
/// # Examples
/// ```
/// use placewell_core::{Coordinate, FacilityType, SiteSize};
/// use placewell_scorer::{FeasibilityEngine, RiskCategory, RiskClassifier};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let site = Coordinate::new(37.335, -121.885)?;
/// let size = SiteSize::new(800.0)?;
/// let feasibility =
///     FeasibilityEngine::default().assess(site, FacilityType::EmergencyShelter, size);
/// let report =
///     RiskClassifier::default().classify(site, FacilityType::EmergencyShelter, size, &feasibility);
/// assert_eq!(report.notes(RiskCategory::ConstructionRisks).len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    geofences: Geofences,
}

impl RiskClassifier {
    /// Create a classifier using `geofences` for neighbourhood notes.
    #[must_use]
    pub const fn new(geofences: Geofences) -> Self {
        Self { geofences }
    }

    /// Classify the risks of building `facility` at `coordinate`.
    #[must_use]
    pub fn classify(
        &self,
        coordinate: Coordinate,
        facility: FacilityType,
        size: SiteSize,
        feasibility: &FeasibilityResult,
    ) -> RiskReport {
        let notes = BTreeMap::from([
            (
                RiskCategory::ZoningChallenges,
                zoning_notes(feasibility.zoning_score, facility),
            ),
            (
                RiskCategory::ConstructionRisks,
                construction_notes(feasibility.infrastructure_score),
            ),
            (
                RiskCategory::PoliticalSensitivities,
                political_notes(self.geofences.zone(coordinate)),
            ),
            (RiskCategory::EnvironmentalFlags, environmental_notes(size)),
        ]);
        let report = RiskReport { notes };
        log::debug!("classified {} risk notes for {coordinate}", report.len());
        report
    }
}

fn zoning_notes(zoning_score: f64, facility: FacilityType) -> Vec<&'static str> {
    let mut notes = vec![if zoning_score < HIGH_ZONING_RISK_BELOW {
        "High risk of zoning conflicts; a zoning variance is likely required"
    } else if zoning_score < FAVOURABLE_ZONING_FROM {
        "Moderate zoning risk; a conditional use permit may be required"
    } else {
        "Zoning is favourable; standard permits should suffice"
    }];
    match facility {
        FacilityType::TemporaryShelter => {
            notes.push("A temporary use permit is required");
        }
        FacilityType::SupportiveHousing => {
            notes.push("Permanent housing zoning requirements apply");
        }
        FacilityType::TransitionalHousing | FacilityType::EmergencyShelter => {}
    }
    notes
}

fn construction_notes(infrastructure_score: f64) -> Vec<&'static str> {
    if infrastructure_score < HIGH_CONSTRUCTION_RISK_BELOW {
        vec![
            "Significant utility upgrades are likely required",
            "A full geotechnical soil survey is recommended",
            "Stormwater drainage capacity must be assessed",
        ]
    } else if infrastructure_score < MODERATE_CONSTRUCTION_RISK_BELOW {
        vec![
            "Moderate utility upgrades may be required",
            "Standard soil testing is recommended",
            "Existing drainage should be reviewed",
        ]
    } else {
        vec!["Existing infrastructure appears adequate"]
    }
}

fn political_notes(zone: Zone) -> Vec<&'static str> {
    match zone {
        Zone::Downtown => vec![
            "Business district stakeholders are likely to engage",
            "High visibility location draws public scrutiny",
            "Coordination with downtown associations is advised",
        ],
        Zone::Residential => vec![
            "Neighbourhood opposition is likely",
            "Community outreach should begin early",
            "Property value concerns are commonly raised",
        ],
        Zone::Outside => vec!["Standard community engagement is advised"],
    }
}

fn environmental_notes(size: SiteSize) -> Vec<&'static str> {
    let sqm = size.square_metres();
    if sqm > LARGE_SITE_SQM {
        vec![
            "A full environmental impact assessment is required",
            "A traffic study is required",
            "Noise impact must be evaluated",
        ]
    } else if sqm > MEDIUM_SITE_SQM {
        vec![
            "A basic environmental review is required",
            "Parking impact should be assessed",
            "Construction noise must be managed",
        ]
    } else {
        vec!["Environmental impact is expected to be minimal"]
    }
}
