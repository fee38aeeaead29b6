//! Nominatim geocoding client
//!
//! Resolves free-text place names to ranked candidate coordinates using
//! the [Nominatim](https://nominatim.openstreetmap.org) search API.
//!
//! Spaces requests according to the Nominatim usage policy and caches
//! result lists per query to minimize API calls.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use domain::GeoPoint;
use moka::future::Cache;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::error::GeocodingError;
use crate::models::Place;

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Search for places matching `query`, best match first, at most `limit`
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodingError>;
}

/// Nominatim-based geocoding client with request spacing and caching
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
    cache: Option<Cache<String, Vec<Place>>>,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let cache = config.caching_enabled().then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(config.cache_ttl_minutes * 60))
                .build()
        });

        Ok(Self {
            client,
            config: config.clone(),
            cache,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Wait until the configured spacing since the previous request has passed
    async fn rate_limit(&self) {
        let interval = Duration::from_millis(self.config.min_request_interval_ms);
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed);
                debug!(?wait, "Rate limiting geocoding request");
                tokio::time::sleep(wait).await;
            }
        }
        *last = Some(Instant::now());
    }

    /// Parse a Nominatim `format=json` body into places, keeping service order
    fn parse_search_response(body: &str, limit: usize) -> Result<Vec<Place>, GeocodingError> {
        let raw: Vec<RawPlace> =
            serde_json::from_str(body).map_err(|e| GeocodingError::Malformed(e.to_string()))?;

        raw.into_iter()
            .take(limit)
            .map(Self::convert_place)
            .collect()
    }

    fn convert_place(raw: RawPlace) -> Result<Place, GeocodingError> {
        let latitude = raw.lat.as_f64().ok_or_else(|| {
            GeocodingError::Malformed(format!("invalid latitude for {}", raw.display_name))
        })?;
        let longitude = raw.lon.as_f64().ok_or_else(|| {
            GeocodingError::Malformed(format!("invalid longitude for {}", raw.display_name))
        })?;
        let point = GeoPoint::new(latitude, longitude)
            .map_err(|e| GeocodingError::Malformed(e.to_string()))?;

        Ok(Place {
            display_name: raw.display_name,
            point,
            osm_id: raw.osm_id.and_then(|id| id.into_string()),
        })
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Place>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let cache_key = format!("{limit}:{}", query.to_lowercase());
        if let Some(cache) = &self.cache {
            if let Some(places) = cache.get(&cache_key).await {
                debug!(%query, "Geocoding cache hit");
                return Ok(places);
            }
        }

        self.rate_limit().await;

        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
            ("limit", limit.to_string()),
        ];

        if let Some(language) = &self.config.accept_language {
            params.push(("accept-language", language.clone()));
        }
        if let Some(countries) = &self.config.country_filter {
            params.push(("countrycodes", countries.clone()));
        }

        debug!(%query, "Geocoding query");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::Unavailable(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| GeocodingError::Malformed(e.to_string()))?;

        let places = Self::parse_search_response(&body, limit)?;

        if let Some(cache) = &self.cache {
            cache.insert(cache_key, places.clone()).await;
        }
        debug!(%query, count = places.len(), "Geocoded query");

        Ok(places)
    }
}

/// Raw Nominatim search result
#[derive(Debug, Deserialize)]
struct RawPlace {
    display_name: String,
    lat: RawNumber,
    lon: RawNumber,
    #[serde(default)]
    osm_id: Option<RawNumber>,
}

/// Nominatim reports coordinates as decimal strings; numbers are accepted too
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(serde_json::Number),
    Text(String),
}

impl RawNumber {
    /// Finite value, if the field holds one
    fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(n) => n.as_f64()?,
            Self::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }

    fn into_string(self) -> Option<String> {
        let s = match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        };
        (!s.is_empty()).then_some(s)
    }
}
