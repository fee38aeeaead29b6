//! OSM service configuration

use serde::{Deserialize, Serialize};
use url::Url;

const DEFAULT_USER_AGENT: &str = "Veloroute/0.4 (https://github.com/twohreichel/Veloroute)";

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in minutes (0 to disable caching)
    #[serde(default = "default_cache_ttl_minutes")]
    pub cache_ttl_minutes: u64,

    /// Minimum spacing between two requests, per the Nominatim usage policy
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// User-Agent sent with every request; Nominatim rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Optional `Accept-Language` preference, e.g. "fr,en"
    #[serde(default)]
    pub accept_language: Option<String>,

    /// Optional ISO 3166-1 country code filter, e.g. "fr"
    #[serde(default)]
    pub country_filter: Option<String>,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    10
}

const fn default_cache_ttl_minutes() -> u64 {
    60
}

const fn default_min_request_interval_ms() -> u64 {
    1100
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            cache_ttl_minutes: default_cache_ttl_minutes(),
            min_request_interval_ms: default_min_request_interval_ms(),
            user_agent: default_user_agent(),
            accept_language: None,
            country_filter: None,
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            cache_ttl_minutes: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }

    /// Check if caching is enabled
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache_ttl_minutes > 0
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;

        if self.timeout_secs == 0 {
            return Err("geocoding timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.trim().is_empty() {
            return Err("geocoding user_agent must not be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration for the OSRM routing service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsrmConfig {
    /// Base URL for the OSRM HTTP API
    #[serde(default = "default_routing_base_url")]
    pub base_url: String,

    /// Routing profile segment of the request path
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Request timeout in seconds
    #[serde(default = "default_routing_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_routing_base_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_profile() -> String {
    "bike".to_string()
}

const fn default_routing_timeout_secs() -> u64 {
    30
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: default_routing_base_url(),
            profile: default_profile(),
            timeout_secs: default_routing_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl OsrmConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_base_url(&self.base_url)?;

        if self.timeout_secs == 0 {
            return Err("routing timeout_secs must be greater than 0".to_string());
        }

        if self.profile.is_empty() || self.profile.contains('/') {
            return Err(format!("invalid routing profile: {:?}", self.profile));
        }

        Ok(())
    }
}

fn validate_base_url(base_url: &str) -> Result<(), String> {
    if base_url.is_empty() {
        return Err("base_url must not be empty".to_string());
    }
    let url = Url::parse(base_url).map_err(|e| format!("invalid base_url {base_url}: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("base_url must be http or https: {base_url}"));
    }
    Ok(())
}
