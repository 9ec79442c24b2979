//! Test doubles and fixtures shared by unit, behaviour and downstream tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use crate::{
    Coordinate, GeocodingProvider, PitSummary, PopulationCell, ProviderError, ReferenceData,
    ReferenceTables, Shelter, Sleeper, Tract,
};

/// Outcome a [`ScriptedGeocoder`] hands back for one lookup.
pub type ScriptedResponse = Result<Option<Coordinate>, ProviderError>;

/// `GeocodingProvider` replaying a fixed script of responses.
///
/// Once the script runs out every further call receives the fallback
/// response. Calls and queries are recorded for assertions.
#[derive(Debug)]
pub struct ScriptedGeocoder {
    script: Mutex<VecDeque<ScriptedResponse>>,
    fallback: ScriptedResponse,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl ScriptedGeocoder {
    /// Create a geocoder that answers every call with `response`.
    #[must_use]
    pub fn always(response: ScriptedResponse) -> Self {
        Self::sequence([], response)
    }

    /// Create a geocoder that replays `script` and then repeats `fallback`.
    #[must_use]
    pub fn sequence<I>(script: I, fallback: ScriptedResponse) -> Self
    where
        I: IntoIterator<Item = ScriptedResponse>,
    {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fallback,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Number of lookups performed so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Addresses passed to the provider, in call order.
    #[must_use]
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl GeocodingProvider for ScriptedGeocoder {
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(address.to_owned());
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// `Sleeper` that records requested pauses instead of sleeping.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Pauses requested so far.
    #[must_use]
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

/// The provider timeout used throughout the tests.
#[must_use]
pub fn timeout() -> ProviderError {
    ProviderError::Timeout {
        url: "http://geocoder.test/search".to_owned(),
        timeout_secs: 10,
    }
}

/// Build a coordinate from known-good literals.
///
/// # Panics
///
/// Panics when the literals are out of range.
#[must_use]
pub fn at(latitude: f64, longitude: f64) -> Coordinate {
    Coordinate::new(latitude, longitude).expect("fixture coordinates are valid")
}

/// A small San José reference snapshot.
///
/// - Tracts: one downtown, one in the residential belt, one to the north.
/// - Shelters: two downtown (one full) and one far to the east.
/// - Population: two cells near downtown, one in the residential belt and
///   one to the north.
#[must_use]
pub fn sample_tables() -> ReferenceTables {
    ReferenceTables {
        tracts: vec![
            tract("T-DOWNTOWN", at(37.335, -121.885), 25.0, 200),
            tract("T-RES", at(37.300, -121.890), 60.0, 500),
            tract("T-NORTH", at(37.400, -121.950), 10.0, 40),
        ],
        shelters: vec![
            shelter("S-CITY", at(37.338, -121.886), 100, 80),
            shelter("S-MARKET", at(37.330, -121.880), 50, 50),
            shelter("S-FAR", at(37.500, -121.700), 200, 20),
        ],
        population: vec![
            cell("P-CORE", at(37.335, -121.885), 4000),
            cell("P-EAST", at(37.335, -121.870), 3000),
            cell("P-SOUTH", at(37.300, -121.890), 5000),
            cell("P-NORTH", at(37.400, -121.950), 1000),
        ],
        pit_summaries: vec![PitSummary {
            year: 2023,
            sheltered: 1_500,
            unsheltered: 4_900,
        }],
    }
}

/// [`sample_tables`] validated into [`ReferenceData`].
///
/// # Panics
///
/// Panics if the sample tables stop validating.
#[must_use]
pub fn sample_reference_data() -> ReferenceData {
    ReferenceData::new(sample_tables()).expect("sample tables are valid")
}

/// Build a tract fixture.
#[must_use]
pub fn tract(id: &str, location: Coordinate, poverty_rate_pct: f64, unhoused: u32) -> Tract {
    Tract {
        id: id.to_owned(),
        location,
        poverty_rate_pct,
        unhoused_count: unhoused,
    }
}

/// Build a shelter fixture.
#[must_use]
pub fn shelter(id: &str, location: Coordinate, capacity: u32, occupancy: u32) -> Shelter {
    Shelter {
        id: id.to_owned(),
        location,
        capacity,
        current_occupancy: occupancy,
    }
}

/// Build a population cell fixture.
#[must_use]
pub fn cell(id: &str, location: Coordinate, population: u32) -> PopulationCell {
    PopulationCell {
        id: id.to_owned(),
        location,
        population,
    }
}
