use thiserror::Error;

/// Failure of a single geocoding attempt, as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The attempt exceeded the provider's per-attempt timeout.
    ///
    /// This is the only retryable failure.
    #[error("geocoding request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint that timed out.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// A transport error other than a timeout.
    #[error("network error contacting geocoder at {url}: {message}")]
    Network {
        /// Endpoint that failed.
        url: String,
        /// Underlying error description.
        message: String,
    },
    /// The geocoder answered with an HTTP error status.
    #[error("geocoder at {url} returned HTTP {status}: {message}")]
    Http {
        /// Endpoint that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Underlying error description.
        message: String,
    },
    /// The response could not be decoded into a coordinate.
    #[error("failed to parse geocoder response: {message}")]
    Parse {
        /// Description of the decoding failure.
        message: String,
    },
}

impl ProviderError {
    /// Whether the resolver should try again after this failure.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

/// Errors from [`crate::geocode::GeoResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// Every attempt timed out.
    #[error("geocoding timed out after {attempts} attempts")]
    Timeout {
        /// Number of attempts made.
        attempts: u32,
    },
    /// The geocoder has no match for the address.
    #[error("address not found: {address:?}")]
    AddressNotFound {
        /// Address as supplied by the caller.
        address: String,
    },
    /// A non-retryable provider failure.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
