//! Population reach of a service radius.

use std::f64::consts::PI;
use std::sync::Arc;

use placewell_core::{
    Coordinate, CoverageConstants, FacilityType, RadiusBand, ServiceRadius, SpatialError,
    SpatialIndex,
};
use serde::Serialize;

/// Population and area reached from a site.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageResult {
    /// People living in population cells inside the radius.
    pub population_covered: u64,
    /// Area of the service circle in square kilometres.
    pub area_covered_km2: f64,
    /// Covered population against the target density, in `[0, 100]`.
    pub coverage_efficiency_pct: f64,
    /// Radius band recommended for the facility type.
    pub recommended_radius_km: RadiusBand,
    /// Whether the requested radius lies inside the recommended band.
    pub within_recommended_radius: bool,
}

/// Estimates how much of the population a facility would serve.
#[derive(Debug, Clone)]
pub struct CoverageEstimator {
    index: Arc<SpatialIndex>,
    constants: CoverageConstants,
}

impl CoverageEstimator {
    /// Create an estimator over `index`.
    #[must_use]
    pub const fn new(index: Arc<SpatialIndex>, constants: CoverageConstants) -> Self {
        Self { index, constants }
    }

    /// Estimate coverage of a `radius` circle around `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyReferenceSet`] when no population cells
    /// are loaded.
    #[expect(
        clippy::float_arithmetic,
        reason = "area and efficiency require float maths"
    )]
    pub fn estimate(
        &self,
        coordinate: Coordinate,
        radius: ServiceRadius,
        facility: FacilityType,
    ) -> Result<CoverageResult, SpatialError> {
        let radius_km = radius.kilometres();
        let cells = self.index.population_within(coordinate, radius_km)?;
        let population_covered = cells
            .iter()
            .map(|found| u64::from(found.cell.population))
            .sum();
        let population: f64 = cells
            .iter()
            .map(|found| f64::from(found.cell.population))
            .sum();

        let area_covered_km2 = PI * radius_km * radius_km;
        let target = area_covered_km2 * self.constants.target_density_per_km2;
        let coverage_efficiency_pct = (100.0 * population / target).clamp(0.0, 100.0);

        let recommended_radius_km = facility.recommended_radius();
        let within_recommended_radius = recommended_radius_km.contains(radius);
        if !within_recommended_radius {
            log::debug!(
                "radius {radius_km} km lies outside the {}..={} km band for {facility}",
                recommended_radius_km.min_km,
                recommended_radius_km.max_km
            );
        }
        Ok(CoverageResult {
            population_covered,
            area_covered_km2,
            coverage_efficiency_pct,
            recommended_radius_km,
            within_recommended_radius,
        })
    }
}
