//! Geocoding adapter - Implements GeocodingPort using integration_osm

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::GeocodeCandidate;
use integration_osm::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, Place,
};
use tracing::{debug, instrument, warn};

/// Place search backed by Nominatim
pub struct NominatimGeocodingAdapter {
    client: NominatimGeocodingClient,
}

impl std::fmt::Debug for NominatimGeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NominatimGeocodingAdapter")
            .field("client", &"NominatimGeocodingClient")
            .finish()
    }
}

impl NominatimGeocodingAdapter {
    pub const fn new(client: NominatimGeocodingClient) -> Self {
        Self { client }
    }

    /// Create the adapter and its HTTP client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn from_config(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::new(client))
    }

    fn convert_place(place: Place) -> GeocodeCandidate {
        let candidate = GeocodeCandidate::new(place.display_name, place.point);
        match place.osm_id {
            Some(id) => candidate.with_external_id(id),
            None => candidate,
        }
    }

    fn convert_error(error: GeocodingError) -> ApplicationError {
        match error {
            GeocodingError::Malformed(msg) => ApplicationError::GeocodeMalformed(msg),
            other => ApplicationError::GeocodeUnavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl GeocodingPort for NominatimGeocodingAdapter {
    #[instrument(skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, ApplicationError> {
        let places = self.client.search(query, limit).await.map_err(|e| {
            warn!(%query, error = %e, "Place search failed");
            Self::convert_error(e)
        })?;

        debug!(%query, count = places.len(), "Places found");
        Ok(places.into_iter().map(Self::convert_place).collect())
    }
}
