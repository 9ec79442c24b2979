//! Bounded fixed-delay retry around a [`GeocodingProvider`].

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::Coordinate;

use super::error::{GeocodeError, ProviderError};
use super::provider::GeocodingProvider;

/// Default number of attempts, the first one included.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default pause between attempts.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// How many times to try and how long to wait in between.
///
/// The delay is fixed; it does not grow between attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Set the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the pause between attempts.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Blocks the calling thread between attempts.
///
/// Abstracted so tests can observe retries without waiting.
pub trait Sleeper: Send + Sync {
    /// Pause for `duration`.
    fn sleep(&self, duration: Duration);
}

/// [`Sleeper`] backed by [`std::thread::sleep`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<T: Sleeper + ?Sized> Sleeper for Arc<T> {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration);
    }
}

/// Resolve addresses through a provider, retrying timeouts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use placewell_core::{Coordinate, GeoResolver, GeocodingProvider, ProviderError, RetryPolicy};
///
/// struct Fixed(Coordinate);
///
/// impl GeocodingProvider for Fixed {
///     fn geocode(&self, _address: &str) -> Result<Option<Coordinate>, ProviderError> {
///         Ok(Some(self.0))
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let point = Coordinate::new(37.3382, -121.8863)?;
/// let resolver = GeoResolver::new(Fixed(point))
///     .with_policy(RetryPolicy::default().with_delay(Duration::ZERO));
/// assert_eq!(resolver.resolve("200 E Santa Clara St")?, point);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GeoResolver<P, S = ThreadSleeper> {
    provider: P,
    sleeper: S,
    policy: RetryPolicy,
}

impl<P> GeoResolver<P> {
    /// Wrap `provider` with the default policy: three attempts, two seconds
    /// apart.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            sleeper: ThreadSleeper,
            policy: RetryPolicy::default(),
        }
    }
}

impl<P, S> GeoResolver<P, S> {
    /// Replace the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the sleeper used between attempts.
    #[must_use]
    pub fn with_sleeper<T>(self, sleeper: T) -> GeoResolver<P, T> {
        GeoResolver {
            provider: self.provider,
            sleeper,
            policy: self.policy,
        }
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// The active retry policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<P: GeocodingProvider, S: Sleeper> GeoResolver<P, S> {
    /// Resolve `address` to a coordinate.
    ///
    /// Only [`ProviderError::Timeout`] is retried. A blank address is
    /// reported as not found without contacting the provider.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::AddressNotFound`] when the provider has no match.
    /// - [`GeocodeError::Timeout`] when every attempt timed out.
    /// - [`GeocodeError::Provider`] for any other provider failure.
    pub fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let query = address.trim();
        if query.is_empty() {
            return Err(GeocodeError::AddressNotFound {
                address: address.to_owned(),
            });
        }

        let attempts = self.policy.attempts();
        for attempt in 1..=attempts {
            debug!("geocoding {query:?} (attempt {attempt}/{attempts})");
            match self.provider.geocode(query) {
                Ok(Some(coordinate)) => return Ok(coordinate),
                Ok(None) => {
                    return Err(GeocodeError::AddressNotFound {
                        address: address.to_owned(),
                    });
                }
                Err(err @ ProviderError::Timeout { .. }) if attempt < attempts => {
                    warn!(
                        "geocoding attempt {attempt}/{attempts} failed: {err}; retrying in {:?}",
                        self.policy.delay
                    );
                    self.sleeper.sleep(self.policy.delay);
                }
                Err(ProviderError::Timeout { .. }) => {}
                Err(err) => return Err(GeocodeError::Provider(err)),
            }
        }

        warn!("geocoding {query:?} gave up after {attempts} timed out attempts");
        Err(GeocodeError::Timeout { attempts })
    }
}
