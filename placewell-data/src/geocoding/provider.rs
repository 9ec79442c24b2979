//! HTTP-based `GeocodingProvider` using the Nominatim search API.
//!
//! This module provides [`NominatimGeocoder`], an implementation of the
//! [`GeocodingProvider`] trait that resolves addresses via HTTP.
//!
//! # Blocking behaviour
//!
//! [`GeocodingProvider::geocode`] is a blocking call, so the resolver's
//! retry loop stays plain synchronous code. Each lookup drives an async
//! `reqwest` request to completion on a Tokio runtime.
//!
//! # Example
//!
//! ```no_run
//! use placewell_core::GeocodingProvider;
//! use placewell_data::geocoding::NominatimGeocoder;
//!
//! let geocoder = NominatimGeocoder::new("http://localhost:8080/search")?;
//! let found = geocoder.geocode("200 E Santa Clara St, San Jose")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use log::debug;
use placewell_core::{Coordinate, GeocodingProvider, ProviderError};
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::nominatim::NominatimPlace;

/// Error type for [`NominatimGeocoder`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The `reqwest` client rejected the configuration.
    HttpClient(reqwest::Error),
    /// No Tokio runtime could be created for blocking lookups.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "cannot create geocoding HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "cannot create geocoding runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// Public Nominatim search endpoint.
pub const DEFAULT_NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Default user agent for Nominatim requests. The public service rejects
/// requests without an identifying agent.
pub const DEFAULT_USER_AGENT: &str = "placewell-geocoder/0.1";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for [`NominatimGeocoder`].
#[derive(Debug, Clone)]
pub struct NominatimConfig {
    /// Search endpoint URL (e.g., `"https://nominatim.openstreetmap.org/search"`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Identifying `User-Agent` header sent with every search.
    pub user_agent: String,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_NOMINATIM_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl NominatimConfig {
    /// Create a new configuration with the given search endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Override the per-attempt timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the identifying user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Geocoder backed by the Nominatim search API.
///
/// The provider owns a Tokio runtime that is reused across calls. When
/// called from within an existing multi-threaded Tokio runtime it uses that
/// runtime's handle with [`tokio::task::block_in_place`] instead, avoiding
/// nested runtime panics. From a `current_thread` runtime it falls back to
/// its own runtime.
///
/// An empty result array is reported as `Ok(None)`; only the first match is
/// requested.
pub struct NominatimGeocoder {
    client: Client,
    config: NominatimConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for NominatimGeocoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocoder")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl NominatimGeocoder {
    /// Create a new geocoder with default settings for `base_url`.
    ///
    /// # Errors
    ///
    /// See [`NominatimGeocoder::with_config`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(NominatimConfig::new(base_url))
    }

    /// Create a new geocoder with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the client or runtime cannot be created.
    pub fn with_config(config: NominatimConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &NominatimConfig {
        &self.config
    }

    /// Search for `address` asynchronously.
    async fn search_async(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        let url = self.config.base_url.as_str();
        debug!("querying Nominatim at {url} for {address:?}");

        let response = self
            .client
            .get(url)
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        let places: Vec<NominatimPlace> = response.json().await.map_err(|err| {
            if err.is_decode() {
                ProviderError::Parse {
                    message: err.to_string(),
                }
            } else {
                self.convert_reqwest_error(&err, url)
            }
        })?;

        let Some(place) = places.first() else {
            debug!("Nominatim found no match for {address:?}");
            return Ok(None);
        };
        let coordinate = place.coordinate()?;
        debug!("Nominatim resolved {address:?} to {coordinate} ({})", place.label());
        Ok(Some(coordinate))
    }

    /// Convert a reqwest error to a `ProviderError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> ProviderError {
        if error.is_timeout() {
            return ProviderError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return ProviderError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        ProviderError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

impl GeocodingProvider for NominatimGeocoder {
    /// Resolve `address` with a single search request.
    ///
    /// # Calling from async code
    ///
    /// When called from within an existing Tokio runtime, the runtime should
    /// be multi-threaded. From a `current_thread` runtime the method falls
    /// back to its own runtime, which may block the caller's runtime.
    fn geocode(&self, address: &str) -> Result<Option<Coordinate>, ProviderError> {
        let future = self.search_async(address);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // Outside Tokio, or on a current-thread runtime.
            _ => self.runtime.block_on(future),
        }
    }
}
