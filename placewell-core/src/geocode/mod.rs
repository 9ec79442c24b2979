//! Resolve free-text addresses to coordinates.
//!
//! The [`GeocodingProvider`] trait abstracts a single lookup against an
//! external geocoder. [`GeoResolver`] wraps a provider with a bounded,
//! fixed-delay retry policy that only retries timeouts: an address the
//! provider cannot find is reported at once.
//!
//! Retry state lives on the stack of each [`GeoResolver::resolve`] call, so a
//! resolver can be shared freely between threads.

mod error;
mod provider;
mod resolver;

pub use error::{GeocodeError, ProviderError};
pub use provider::GeocodingProvider;
pub use resolver::{GeoResolver, RetryPolicy, Sleeper, ThreadSleeper};
