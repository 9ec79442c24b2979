//! Optional prose explanation of an evaluation.

use placewell_core::{Coordinate, FacilityType};

use crate::composite::ScoreBundle;
use crate::coverage::CoverageResult;
use crate::feasibility::FeasibilityResult;
use crate::risk::RiskReport;

/// Everything a [`Narrator`] may draw on when explaining a site.
#[derive(Debug, Clone, Copy)]
pub struct NarrativeContext<'a> {
    /// Address as supplied by the caller, when the site was geocoded.
    pub address: Option<&'a str>,
    /// Facility being planned.
    pub facility_type: FacilityType,
    /// Site location.
    pub coordinate: Coordinate,
    /// Composite suitability score.
    pub score: &'a ScoreBundle,
    /// Build feasibility.
    pub feasibility: &'a FeasibilityResult,
    /// Categorised risks.
    pub risks: &'a RiskReport,
    /// Coverage estimate.
    pub coverage: &'a CoverageResult,
}

/// Produces a human-readable explanation of an evaluation.
///
/// Implementations typically wrap a language model or a templating engine.
/// Returning `None` leaves the evaluation without a narrative; the numeric
/// results are unaffected either way.
///
/// # Examples
/// ```
/// use placewell_scorer::{NarrativeContext, Narrator};
///
/// struct Headline;
///
/// impl Narrator for Headline {
///     fn explain(&self, context: &NarrativeContext<'_>) -> Option<String> {
///         Some(format!(
///             "{} scores {:.2}",
///             context.facility_type, context.score.total_score
///         ))
///     }
/// }
/// ```
pub trait Narrator: Send + Sync {
    /// Explain the evaluation described by `context`.
    fn explain(&self, context: &NarrativeContext<'_>) -> Option<String>;
}

impl<T: Narrator + ?Sized> Narrator for Box<T> {
    fn explain(&self, context: &NarrativeContext<'_>) -> Option<String> {
        (**self).explain(context)
    }
}

impl<T: Narrator + ?Sized> Narrator for std::sync::Arc<T> {
    fn explain(&self, context: &NarrativeContext<'_>) -> Option<String> {
        (**self).explain(context)
    }
}
