//! Nearest-match and radius queries over the shared reference tables.
//!
//! Shelters and population cells are bulk-loaded into R\*-trees keyed by
//! their position in the table. Radius queries prefilter candidates with a
//! conservative degree envelope and then apply the exact haversine test, so
//! the tree only ever narrows the work and never changes the answer.

use std::sync::Arc;

use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use thiserror::Error;

use crate::coordinate::EARTH_RADIUS_KM;
use crate::{Coordinate, PopulationCell, ReferenceData, Shelter, Tract};

/// Kilometres spanned by one degree of latitude.
const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

/// Slack applied to the longitude span of the prefilter envelope.
const ENVELOPE_SLACK: f64 = 1.1;

/// Entry stored in the R\*-trees: `[longitude, latitude]` plus table position.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Reference table a query depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    /// Census tracts.
    Tracts,
    /// Shelters.
    Shelters,
    /// Population cells.
    Population,
}

impl ReferenceTable {
    /// Return the table name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tracts => "tracts",
            Self::Shelters => "shelters",
            Self::Population => "population",
        }
    }
}

impl std::fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from [`SpatialIndex`] queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SpatialError {
    /// The queried table holds no records.
    ///
    /// This is a data problem, not a transient failure, and must not be
    /// papered over with default scores.
    #[error("reference table `{table}` is empty")]
    EmptyReferenceSet {
        /// The empty table.
        table: ReferenceTable,
    },
}

/// A shelter found by [`SpatialIndex::shelters_within`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShelterMatch<'a> {
    /// The matched shelter.
    pub shelter: &'a Shelter,
    /// Great-circle distance from the query point, in kilometres.
    pub distance_km: f64,
}

/// A population cell found by [`SpatialIndex::population_within`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationMatch<'a> {
    /// The matched cell.
    pub cell: &'a PopulationCell,
    /// Great-circle distance from the query point, in kilometres.
    pub distance_km: f64,
}

/// Read-only spatial lookups over [`ReferenceData`].
///
/// The index is immutable once built and is safe to share between threads.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use placewell_core::{Coordinate, ReferenceData, ReferenceTables, SpatialIndex, Tract};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let tables = ReferenceTables {
///     tracts: vec![Tract {
///         id: "T-1".into(),
///         location: Coordinate::new(37.33, -121.88)?,
///         poverty_rate_pct: 20.0,
///         unhoused_count: 80,
///     }],
///     ..ReferenceTables::default()
/// };
/// let index = SpatialIndex::new(Arc::new(ReferenceData::new(tables)?));
/// let tract = index.nearest_tract(Coordinate::new(37.0, -121.0)?)?;
/// assert_eq!(tract.id, "T-1");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SpatialIndex {
    data: Arc<ReferenceData>,
    shelters: RTree<IndexedPoint>,
    population: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Build the index for `data`.
    #[must_use]
    pub fn new(data: Arc<ReferenceData>) -> Self {
        let shelters = build_tree(data.shelters().iter().map(|shelter| shelter.location));
        let population = build_tree(data.population().iter().map(|cell| cell.location));
        log::debug!(
            "indexed {} shelters and {} population cells",
            shelters.size(),
            population.size()
        );
        Self {
            data,
            shelters,
            population,
        }
    }

    /// The reference data behind the index.
    #[must_use]
    pub fn data(&self) -> &Arc<ReferenceData> {
        &self.data
    }

    /// Tract whose representative point is closest to `coordinate`.
    ///
    /// Distance is planar over raw degrees. Ties resolve to the tract that
    /// appears first in the table.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyReferenceSet`] when there are no tracts.
    pub fn nearest_tract(&self, coordinate: Coordinate) -> Result<&Tract, SpatialError> {
        self.data
            .tracts()
            .iter()
            .map(|tract| (tract, coordinate.planar_distance(&tract.location)))
            // `min_by` keeps the first of several equal minima.
            .min_by(|(_, lhs), (_, rhs)| lhs.total_cmp(rhs))
            .map(|(tract, _)| tract)
            .ok_or(SpatialError::EmptyReferenceSet {
                table: ReferenceTable::Tracts,
            })
    }

    /// Shelters within `radius_km` of `coordinate`, boundary included.
    ///
    /// Matches are returned in table order together with their distance.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyReferenceSet`] when there are no shelters.
    pub fn shelters_within(
        &self,
        coordinate: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<ShelterMatch<'_>>, SpatialError> {
        let shelters = self.data.shelters();
        if shelters.is_empty() {
            return Err(SpatialError::EmptyReferenceSet {
                table: ReferenceTable::Shelters,
            });
        }
        Ok(
            within_radius(&self.shelters, coordinate, radius_km, |position| {
                shelters.get(position).map(|shelter| shelter.location)
            })
            .into_iter()
            .filter_map(|(position, distance_km)| {
                shelters.get(position).map(|shelter| ShelterMatch {
                    shelter,
                    distance_km,
                })
            })
            .collect(),
        )
    }

    /// Population cells whose centre lies within `radius_km` of `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::EmptyReferenceSet`] when there are no cells.
    pub fn population_within(
        &self,
        coordinate: Coordinate,
        radius_km: f64,
    ) -> Result<Vec<PopulationMatch<'_>>, SpatialError> {
        let cells = self.data.population();
        if cells.is_empty() {
            return Err(SpatialError::EmptyReferenceSet {
                table: ReferenceTable::Population,
            });
        }
        Ok(
            within_radius(&self.population, coordinate, radius_km, |position| {
                cells.get(position).map(|cell| cell.location)
            })
            .into_iter()
            .filter_map(|(position, distance_km)| {
                cells
                    .get(position)
                    .map(|cell| PopulationMatch { cell, distance_km })
            })
            .collect(),
        )
    }
}

fn build_tree(locations: impl Iterator<Item = Coordinate>) -> RTree<IndexedPoint> {
    let entries = locations
        .enumerate()
        .map(|(position, location)| {
            GeomWithData::new([location.longitude(), location.latitude()], position)
        })
        .collect();
    RTree::bulk_load(entries)
}

/// Table positions and distances of entries within `radius_km`, in table order.
fn within_radius(
    tree: &RTree<IndexedPoint>,
    origin: Coordinate,
    radius_km: f64,
    location_of: impl Fn(usize) -> Option<Coordinate>,
) -> Vec<(usize, f64)> {
    let envelope = search_envelope(origin, radius_km);
    let mut hits: Vec<(usize, f64)> = tree
        .locate_in_envelope_intersecting(&envelope)
        .filter_map(|entry| {
            let location = location_of(entry.data)?;
            let distance_km = origin.haversine_km(&location);
            (distance_km <= radius_km).then_some((entry.data, distance_km))
        })
        .collect();
    hits.sort_unstable_by_key(|(position, _)| *position);
    hits
}

/// Degree envelope guaranteed to contain every point within `radius_km`.
fn search_envelope(origin: Coordinate, radius_km: f64) -> AABB<[f64; 2]> {
    let lat_span = radius_km.max(0.0) / KM_PER_DEGREE;
    let south = (origin.latitude() - lat_span).max(-90.0);
    let north = (origin.latitude() + lat_span).min(90.0);

    let widest_latitude = south.abs().max(north.abs()).to_radians();
    let lon_span = lat_span * ENVELOPE_SLACK / widest_latitude.cos();
    let west = origin.longitude() - lon_span;
    let east = origin.longitude() + lon_span;

    // Near the poles or across the antimeridian fall back to every longitude.
    let wraps = !lon_span.is_finite() || west < -180.0 || east > 180.0;
    let (west, east) = if wraps {
        (-180.0, 180.0)
    } else {
        (west, east)
    };
    AABB::from_corners([west, south], [east, north])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, sample_reference_data};
    use crate::{ReferenceTables, Shelter};
    use rstest::{fixture, rstest};

    #[fixture]
    fn index() -> SpatialIndex {
        SpatialIndex::new(Arc::new(sample_reference_data()))
    }

    fn empty_index() -> SpatialIndex {
        SpatialIndex::new(Arc::new(ReferenceData::default()))
    }

    #[rstest]
    fn nearest_tract_picks_closest(index: SpatialIndex) {
        let tract = index
            .nearest_tract(at(37.301, -121.891))
            .expect("tracts present");
        assert_eq!(tract.id, "T-RES");
    }

    #[rstest]
    fn nearest_tract_prefers_first_on_tie() {
        let tie = crate::Tract {
            id: "first".into(),
            location: at(0.0, 1.0),
            poverty_rate_pct: 0.0,
            unhoused_count: 0,
        };
        let other = crate::Tract {
            id: "second".into(),
            location: at(0.0, -1.0),
            ..tie.clone()
        };
        let data = ReferenceData::new(ReferenceTables {
            tracts: vec![tie, other],
            ..ReferenceTables::default()
        })
        .expect("valid tables");
        let index = SpatialIndex::new(Arc::new(data));
        let tract = index.nearest_tract(at(0.0, 0.0)).expect("tracts present");
        assert_eq!(tract.id, "first");
    }

    #[rstest]
    fn empty_tables_report_the_table() {
        let index = empty_index();
        assert_eq!(
            index.nearest_tract(at(0.0, 0.0)),
            Err(SpatialError::EmptyReferenceSet {
                table: ReferenceTable::Tracts
            })
        );
        assert_eq!(
            index.shelters_within(at(0.0, 0.0), 3.0),
            Err(SpatialError::EmptyReferenceSet {
                table: ReferenceTable::Shelters
            })
        );
        assert_eq!(
            index.population_within(at(0.0, 0.0), 3.0),
            Err(SpatialError::EmptyReferenceSet {
                table: ReferenceTable::Population
            })
        );
    }

    #[rstest]
    fn shelters_within_returns_table_order_with_distances(index: SpatialIndex) {
        let matches = index
            .shelters_within(at(37.335, -121.885), 3.0)
            .expect("shelters present");
        let ids: Vec<&str> = matches.iter().map(|m| m.shelter.id.as_str()).collect();
        assert_eq!(ids, ["S-CITY", "S-MARKET"]);
        assert!(matches.iter().all(|m| m.distance_km <= 3.0));
    }

    #[rstest]
    fn shelters_within_can_be_empty(index: SpatialIndex) {
        let matches = index
            .shelters_within(at(36.0, -120.0), 3.0)
            .expect("shelters present");
        assert!(matches.is_empty());
    }

    #[rstest]
    fn radius_boundary_is_inclusive() {
        let origin = at(0.0, 0.0);
        let shelter = Shelter {
            id: "edge".into(),
            location: at(0.0, 0.5),
            capacity: 10,
            current_occupancy: 0,
        };
        let exact = origin.haversine_km(&shelter.location);
        let data = ReferenceData::new(ReferenceTables {
            shelters: vec![shelter],
            ..ReferenceTables::default()
        })
        .expect("valid tables");
        let index = SpatialIndex::new(Arc::new(data));

        let hits = index.shelters_within(origin, exact).expect("shelters");
        assert_eq!(hits.len(), 1);
        let misses = index
            .shelters_within(origin, exact - 1e-9)
            .expect("shelters");
        assert!(misses.is_empty());
    }

    #[rstest]
    fn envelope_covers_high_latitudes() {
        let origin = at(89.99, 10.0);
        let shelter = Shelter {
            id: "pole".into(),
            location: at(89.995, -170.0),
            capacity: 1,
            current_occupancy: 0,
        };
        let data = ReferenceData::new(ReferenceTables {
            shelters: vec![shelter],
            ..ReferenceTables::default()
        })
        .expect("valid tables");
        let index = SpatialIndex::new(Arc::new(data));
        let hits = index.shelters_within(origin, 5.0).expect("shelters");
        assert_eq!(hits.len(), 1, "polar neighbour across the pole is found");
    }

    #[rstest]
    fn population_within_filters_by_distance(index: SpatialIndex) {
        let cells = index
            .population_within(at(37.335, -121.885), 2.0)
            .expect("population present");
        let ids: Vec<&str> = cells.iter().map(|m| m.cell.id.as_str()).collect();
        assert_eq!(ids, ["P-CORE", "P-EAST"]);
    }
}
