//! Read-only reference tables consulted during site evaluation.
//!
//! Tables arrive as a [`ReferenceTables`] bundle, usually decoded from a
//! snapshot, and are validated once into [`ReferenceData`]. The validated
//! form is immutable and is shared across evaluations behind an `Arc`.

use thiserror::Error;

use crate::Coordinate;

/// A census tract with its socio-economic indicators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tract {
    /// Census tract identifier.
    pub id: String,
    /// Representative point of the tract.
    pub location: Coordinate,
    /// Share of residents below the poverty line, in percent.
    pub poverty_rate_pct: f64,
    /// Point-in-time count of unhoused residents.
    pub unhoused_count: u32,
}

/// An operating shelter.
///
/// Occupancy is expected not to exceed capacity, but data feeds are not
/// always consistent; see [`Shelter::occupancy_ratio`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Shelter {
    /// Shelter identifier.
    pub id: String,
    /// Shelter location.
    pub location: Coordinate,
    /// Number of beds.
    pub capacity: u32,
    /// Number of occupied beds.
    pub current_occupancy: u32,
}

impl Shelter {
    /// Occupied share of the shelter's beds.
    ///
    /// Over-reported occupancy yields a ratio above one; callers clamp
    /// whatever they derive from it. A shelter without beds cannot take
    /// anyone in and counts as full.
    ///
    /// # Examples
    /// ```
    /// use placewell_core::{Coordinate, Shelter};
    ///
    /// # fn main() -> Result<(), placewell_core::CoordinateError> {
    /// let shelter = Shelter {
    ///     id: "S-1".into(),
    ///     location: Coordinate::new(37.33, -121.88)?,
    ///     capacity: 40,
    ///     current_occupancy: 30,
    /// };
    /// assert_eq!(shelter.occupancy_ratio(), 0.75);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn occupancy_ratio(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        f64::from(self.current_occupancy) / f64::from(self.capacity)
    }

    /// Whether the reported occupancy exceeds the reported capacity.
    #[must_use]
    pub const fn is_over_capacity(&self) -> bool {
        self.current_occupancy > self.capacity
    }
}

/// A population grid cell used for coverage estimates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationCell {
    /// Cell identifier.
    pub id: String,
    /// Centre of the cell.
    pub location: Coordinate,
    /// Residents living in the cell.
    pub population: u32,
}

/// Annual point-in-time homelessness summary.
///
/// Carried with the snapshot for presentation; scoring does not read it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PitSummary {
    /// Survey year.
    pub year: u16,
    /// People counted in shelters.
    pub sheltered: u32,
    /// People counted outside shelters.
    pub unsheltered: u32,
}

/// Unvalidated reference tables, typically decoded from a snapshot file.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReferenceTables {
    /// Census tracts.
    pub tracts: Vec<Tract>,
    /// Operating shelters.
    pub shelters: Vec<Shelter>,
    /// Population grid cells.
    pub population: Vec<PopulationCell>,
    /// Point-in-time summaries.
    pub pit_summaries: Vec<PitSummary>,
}

/// Errors returned when validating [`ReferenceTables`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    /// A tract carried a negative or non-finite poverty rate.
    #[error("tract {tract_id} has invalid poverty rate {value}")]
    InvalidPovertyRate {
        /// Identifier of the offending tract.
        tract_id: String,
        /// Rate as supplied.
        value: f64,
    },
    /// A record had an empty identifier.
    #[error("{table} record at position {position} has an empty identifier")]
    MissingIdentifier {
        /// Table containing the record.
        table: &'static str,
        /// Zero-based position of the record in its table.
        position: usize,
    },
}

/// Validated, immutable reference tables.
///
/// Empty tables are accepted here; queries that need a table report
/// [`crate::SpatialError::EmptyReferenceSet`] instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    tables: ReferenceTables,
}

impl ReferenceData {
    /// Validate `tables` and freeze them.
    ///
    /// # Errors
    ///
    /// Returns [`ReferenceError`] for the first invalid record found.
    pub fn new(tables: ReferenceTables) -> Result<Self, ReferenceError> {
        for (position, tract) in tables.tracts.iter().enumerate() {
            require_id(&tract.id, "tracts", position)?;
            if !tract.poverty_rate_pct.is_finite() || tract.poverty_rate_pct < 0.0 {
                return Err(ReferenceError::InvalidPovertyRate {
                    tract_id: tract.id.clone(),
                    value: tract.poverty_rate_pct,
                });
            }
        }
        for (position, shelter) in tables.shelters.iter().enumerate() {
            require_id(&shelter.id, "shelters", position)?;
        }
        for (position, cell) in tables.population.iter().enumerate() {
            require_id(&cell.id, "population", position)?;
        }
        Ok(Self { tables })
    }

    /// Census tracts in table order.
    #[must_use]
    pub fn tracts(&self) -> &[Tract] {
        &self.tables.tracts
    }

    /// Shelters in table order.
    #[must_use]
    pub fn shelters(&self) -> &[Shelter] {
        &self.tables.shelters
    }

    /// Population cells in table order.
    #[must_use]
    pub fn population(&self) -> &[PopulationCell] {
        &self.tables.population
    }

    /// Point-in-time summaries in table order.
    #[must_use]
    pub fn pit_summaries(&self) -> &[PitSummary] {
        &self.tables.pit_summaries
    }
}

impl TryFrom<ReferenceTables> for ReferenceData {
    type Error = ReferenceError;

    fn try_from(tables: ReferenceTables) -> Result<Self, Self::Error> {
        Self::new(tables)
    }
}

fn require_id(id: &str, table: &'static str, position: usize) -> Result<(), ReferenceError> {
    if id.trim().is_empty() {
        return Err(ReferenceError::MissingIdentifier { table, position });
    }
    Ok(())
}
