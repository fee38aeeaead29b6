//! Route endpoints and intermediate waypoints

use serde::{Deserialize, Serialize};

use super::GeocodeCandidate;
use crate::value_objects::{GeoPoint, WaypointId};

/// Start or end of a route: a free-text label plus the coordinate chosen for it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteEndpoint {
    /// Text shown in the input field
    pub label: String,

    /// Coordinate set by an explicit candidate selection
    pub position: Option<GeoPoint>,
}

impl RouteEndpoint {
    /// An endpoint already resolved to a point
    #[must_use]
    pub fn resolved(label: impl Into<String>, position: GeoPoint) -> Self {
        Self {
            label: label.into(),
            position: Some(position),
        }
    }

    /// Whether a coordinate has been selected
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.position.is_some()
    }

    /// Replace the label; a changed label drops the previously selected position
    pub fn set_label(&mut self, text: &str) {
        if self.label != text {
            self.label = text.to_string();
            self.position = None;
        }
    }

    /// Take label and position from a selected candidate
    pub fn resolve(&mut self, candidate: &GeocodeCandidate) {
        self.label.clone_from(&candidate.display_name);
        self.position = Some(candidate.point);
    }
}

/// A user-added intermediate stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Identity, never reused within a list
    pub id: WaypointId,

    /// Text shown in the input field
    pub label: String,

    /// Coordinate set by an explicit candidate selection
    pub position: Option<GeoPoint>,
}

impl Waypoint {
    /// An empty, unresolved waypoint with a fresh id
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: WaypointId::new(),
            label: String::new(),
            position: None,
        }
    }

    /// Whether a coordinate has been selected
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.position.is_some()
    }

    /// Replace the label; a changed label drops the previously selected position
    pub fn set_label(&mut self, text: &str) {
        if self.label != text {
            self.label = text.to_string();
            self.position = None;
        }
    }

    /// Take label and position from a selected candidate
    pub fn resolve(&mut self, candidate: &GeocodeCandidate) {
        self.label.clone_from(&candidate.display_name);
        self.position = Some(candidate.point);
    }
}

impl Default for Waypoint {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lyon() -> GeocodeCandidate {
        GeocodeCandidate::new("Lyon, France", GeoPoint::new(45.764, 4.8357).unwrap())
    }

    #[test]
    fn new_waypoint_is_empty_and_unresolved() {
        let waypoint = Waypoint::new();
        assert!(waypoint.label.is_empty());
        assert!(!waypoint.is_resolved());
    }

    #[test]
    fn resolve_sets_label_and_position() {
        let mut waypoint = Waypoint::new();
        waypoint.resolve(&lyon());
        assert_eq!(waypoint.label, "Lyon, France");
        assert!(waypoint.is_resolved());
    }

    #[test]
    fn editing_label_drops_position() {
        let mut endpoint = RouteEndpoint::default();
        endpoint.resolve(&lyon());
        endpoint.set_label("Lyo");
        assert_eq!(endpoint.label, "Lyo");
        assert!(!endpoint.is_resolved());
    }

    #[test]
    fn setting_same_label_keeps_position() {
        let mut waypoint = Waypoint::new();
        waypoint.resolve(&lyon());
        waypoint.set_label("Lyon, France");
        assert!(waypoint.is_resolved());
    }
}
