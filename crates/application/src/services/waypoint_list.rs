//! Ordered intermediate stops with one search field each

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use domain::{DomainError, GeocodeCandidate, Waypoint, WaypointId};
use tokio::sync::watch;
use tracing::debug;

use super::debounced_search::{DebouncedSearch, SearchSettings, SearchSnapshot};
use crate::ports::GeocodingPort;

/// Ordered waypoints and the search state of each, keyed by waypoint id
///
/// At most one waypoint (the active one) shows candidates at a time.
pub struct WaypointList {
    geocoder: Arc<dyn GeocodingPort>,
    settings: SearchSettings,
    waypoints: Vec<Waypoint>,
    searches: HashMap<WaypointId, DebouncedSearch>,
    active: Option<WaypointId>,
}

impl fmt::Debug for WaypointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaypointList")
            .field("waypoints", &self.waypoints)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

impl WaypointList {
    /// Create an empty list whose fields search with `settings`
    pub fn new(geocoder: Arc<dyn GeocodingPort>, settings: SearchSettings) -> Self {
        Self {
            geocoder,
            settings,
            waypoints: Vec::new(),
            searches: HashMap::new(),
            active: None,
        }
    }

    /// Append an empty, unresolved waypoint
    pub fn add(&mut self) -> WaypointId {
        let waypoint = Waypoint::new();
        let id = waypoint.id;
        self.searches.insert(
            id,
            DebouncedSearch::new(Arc::clone(&self.geocoder), self.settings.clone()),
        );
        self.waypoints.push(waypoint);
        debug!(%id, count = self.waypoints.len(), "Waypoint added");
        id
    }

    /// Set the label typed into a waypoint and search for it
    ///
    /// A changed label drops the waypoint's previous position.
    pub fn update_label(&mut self, id: WaypointId, text: &str) -> Result<(), DomainError> {
        self.get_mut(id)?.set_label(text);
        self.activate(id);
        if let Some(search) = self.searches.get(&id) {
            search.update_query(text);
        }
        Ok(())
    }

    /// Make a waypoint the one whose candidates are shown
    pub fn focus(&mut self, id: WaypointId) -> Result<(), DomainError> {
        self.get(id).ok_or_else(|| not_found(id))?;
        self.activate(id);
        Ok(())
    }

    /// Resolve a waypoint from one of its candidates and close its list
    pub fn select_candidate(
        &mut self,
        id: WaypointId,
        candidate: &GeocodeCandidate,
    ) -> Result<(), DomainError> {
        self.get_mut(id)?.resolve(candidate);
        if let Some(search) = self.searches.get(&id) {
            search.dismiss();
        }
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(())
    }

    /// Delete a waypoint and its search state; unknown ids are ignored
    pub fn remove(&mut self, id: WaypointId) -> bool {
        let before = self.waypoints.len();
        self.waypoints.retain(|w| w.id != id);
        self.searches.remove(&id);
        if self.active == Some(id) {
            self.active = None;
        }
        before != self.waypoints.len()
    }

    /// Replace the order wholesale
    ///
    /// `order` must be a permutation of the current ids; anything else is
    /// rejected and the current order kept.
    pub fn reorder(&mut self, order: &[WaypointId]) -> Result<(), DomainError> {
        if order.len() != self.waypoints.len() {
            return Err(DomainError::ValidationError(format!(
                "reorder lists {} waypoints, expected {}",
                order.len(),
                self.waypoints.len()
            )));
        }
        let mut seen = HashSet::with_capacity(order.len());
        for id in order {
            if !seen.insert(*id) {
                return Err(DomainError::ValidationError(format!(
                    "waypoint {id} listed twice"
                )));
            }
            if self.get(*id).is_none() {
                return Err(not_found(*id));
            }
        }

        let mut by_id: HashMap<WaypointId, Waypoint> =
            self.waypoints.drain(..).map(|w| (w.id, w)).collect();
        self.waypoints = order.iter().filter_map(|id| by_id.remove(id)).collect();
        Ok(())
    }

    /// Waypoints in route order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn get(&self, id: WaypointId) -> Option<&Waypoint> {
        self.waypoints.iter().find(|w| w.id == id)
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Id of the waypoint currently showing candidates
    pub const fn active(&self) -> Option<WaypointId> {
        self.active
    }

    /// Candidates of the active waypoint, if any
    pub fn active_candidates(&self) -> Option<(WaypointId, Vec<GeocodeCandidate>)> {
        let id = self.active?;
        let search = self.searches.get(&id)?;
        Some((id, search.results()))
    }

    /// Search state of one waypoint
    pub fn search_snapshot(&self, id: WaypointId) -> Option<SearchSnapshot> {
        self.searches.get(&id).map(DebouncedSearch::snapshot)
    }

    /// Receive search state changes of one waypoint
    pub fn subscribe(&self, id: WaypointId) -> Option<watch::Receiver<SearchSnapshot>> {
        self.searches.get(&id).map(DebouncedSearch::subscribe)
    }

    /// Wait until no waypoint has a pending or running lookup
    pub async fn settled(&self) {
        for search in self.searches.values() {
            search.settled().await;
        }
    }

    fn get_mut(&mut self, id: WaypointId) -> Result<&mut Waypoint, DomainError> {
        self.waypoints
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| not_found(id))
    }

    fn activate(&mut self, id: WaypointId) {
        if self.active == Some(id) {
            return;
        }
        for (other, search) in &self.searches {
            if *other != id {
                search.dismiss();
            }
        }
        self.active = Some(id);
    }
}

fn not_found(id: WaypointId) -> DomainError {
    DomainError::not_found("Waypoint", id.to_string())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use domain::GeoPoint;

    use super::*;
    use crate::ports::MockGeocodingPort;

    fn list_with(mock: MockGeocodingPort) -> WaypointList {
        let settings = SearchSettings {
            min_query_chars: 3,
            ..SearchSettings::default()
        };
        WaypointList::new(Arc::new(mock), settings)
    }

    fn echo_mock() -> MockGeocodingPort {
        let mut mock = MockGeocodingPort::new();
        mock.expect_search().returning(|query, _| {
            Ok(vec![GeocodeCandidate::new(query, GeoPoint::paris())])
        });
        mock
    }

    fn dijon() -> GeocodeCandidate {
        GeocodeCandidate::new("Dijon", GeoPoint::new(47.322, 5.0415).unwrap())
    }

    #[tokio::test]
    async fn add_appends_unresolved_waypoints() {
        let mut list = list_with(MockGeocodingPort::new());
        let a = list.add();
        let b = list.add();

        let ids: Vec<_> = list.waypoints().iter().map(|w| w.id).collect();
        assert_eq!(ids, [a, b]);
        assert!(list.waypoints().iter().all(|w| !w.is_resolved()));
    }

    #[tokio::test]
    async fn removed_ids_are_never_reused() {
        let mut list = list_with(MockGeocodingPort::new());
        let a = list.add();
        assert!(list.remove(a));
        let b = list.add();
        assert_ne!(a, b);
        assert!(list.get(a).is_none());
        assert!(list.search_snapshot(a).is_none());
    }

    #[tokio::test]
    async fn remove_unknown_id_is_noop() {
        let mut list = list_with(MockGeocodingPort::new());
        list.add();
        assert!(!list.remove(WaypointId::new()));
        assert_eq!(list.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn select_candidate_resolves_and_closes_list() {
        let mut list = list_with(echo_mock());
        let id = list.add();

        list.update_label(id, "Dijon").unwrap();
        list.settled().await;
        assert_eq!(list.active_candidates().unwrap().1.len(), 1);

        list.select_candidate(id, &dijon()).unwrap();
        let waypoint = list.get(id).unwrap();
        assert_eq!(waypoint.label, "Dijon");
        assert!(waypoint.is_resolved());
        assert!(list.active_candidates().is_none());
        assert!(list.search_snapshot(id).unwrap().results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn short_label_clears_without_lookup() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_search().times(0);
        let mut list = list_with(mock);
        let id = list.add();

        list.update_label(id, "Di").unwrap();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(list.search_snapshot(id).unwrap().is_idle());
        assert_eq!(list.get(id).unwrap().label, "Di");
    }

    #[tokio::test(start_paused = true)]
    async fn focusing_one_waypoint_closes_the_others() {
        let mut list = list_with(echo_mock());
        let a = list.add();
        let b = list.add();

        list.update_label(a, "Dijon").unwrap();
        list.settled().await;
        assert_eq!(list.active(), Some(a));

        list.focus(b).unwrap();
        assert_eq!(list.active(), Some(b));
        assert!(list.search_snapshot(a).unwrap().results.is_empty());
    }

    #[tokio::test]
    async fn unknown_ids_are_reported() {
        let mut list = list_with(MockGeocodingPort::new());
        let missing = WaypointId::new();
        assert!(matches!(
            list.update_label(missing, "Dijon"),
            Err(DomainError::NotFound { .. })
        ));
        assert!(list.focus(missing).is_err());
        assert!(list.select_candidate(missing, &dijon()).is_err());
    }

    #[tokio::test]
    async fn reorder_applies_permutation() {
        let mut list = list_with(MockGeocodingPort::new());
        let a = list.add();
        let b = list.add();
        let c = list.add();

        list.reorder(&[c, a, b]).unwrap();
        let ids: Vec<_> = list.waypoints().iter().map(|w| w.id).collect();
        assert_eq!(ids, [c, a, b]);
    }

    #[tokio::test]
    async fn reorder_rejects_dropped_duplicated_or_foreign_ids() {
        let mut list = list_with(MockGeocodingPort::new());
        let a = list.add();
        let b = list.add();

        assert!(list.reorder(&[a]).is_err());
        assert!(list.reorder(&[a, a]).is_err());
        assert!(list.reorder(&[a, WaypointId::new()]).is_err());

        let ids: Vec<_> = list.waypoints().iter().map(|w| w.id).collect();
        assert_eq!(ids, [a, b]);
    }

    #[tokio::test(start_paused = true)]
    async fn reorder_keeps_search_state_with_its_waypoint() {
        let mut list = list_with(echo_mock());
        let a = list.add();
        let b = list.add();

        list.update_label(b, "Beaune").unwrap();
        list.settled().await;
        list.reorder(&[b, a]).unwrap();

        let (active, candidates) = list.active_candidates().unwrap();
        assert_eq!(active, b);
        assert_eq!(candidates[0].display_name, "Beaune");
    }
}
