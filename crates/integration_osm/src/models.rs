//! OSM data models
//!
//! Typed representations of Nominatim places and OSRM routes.

use domain::GeoPoint;
use serde::{Deserialize, Serialize};

/// A place returned by Nominatim `/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Full display name, e.g. "Lyon, Métropole de Lyon, Rhône, France"
    pub display_name: String,
    /// Coordinate of the place
    pub point: GeoPoint,
    /// OpenStreetMap object id, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub osm_id: Option<String>,
}

/// First route of an OSRM `/route` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclingRoute {
    /// Distance in meters
    pub distance: f64,
    /// Duration in seconds
    pub duration: f64,
    /// Decoded geometry in travel order
    pub geometry: Vec<GeoPoint>,
}

impl CyclingRoute {
    /// Number of geometry points
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.geometry.len()
    }
}
