//! Geocoding search candidates

use serde::{Deserialize, Serialize};

use crate::value_objects::GeoPoint;

/// A place returned by a free-text geocoding lookup
///
/// Candidates are produced by the geocoder and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeCandidate {
    /// Human-readable name as ranked by the geocoding service
    pub display_name: String,

    /// Resolved coordinate
    pub point: GeoPoint,

    /// Stable identifier assigned by the service (e.g. an OSM id)
    pub external_id: Option<String>,
}

impl GeocodeCandidate {
    /// Create a candidate without an external identifier
    #[must_use]
    pub fn new(display_name: impl Into<String>, point: GeoPoint) -> Self {
        Self {
            display_name: display_name.into(),
            point,
            external_id: None,
        }
    }

    /// Attach the service's identifier
    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Key used to identify this candidate in a rendered list
    ///
    /// Falls back to the position in the result list when the service did
    /// not provide an identifier.
    #[must_use]
    pub fn list_key(&self, index: usize) -> String {
        self.external_id
            .clone()
            .unwrap_or_else(|| format!("fallback-{index}"))
    }
}
