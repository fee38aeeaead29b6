//! End-to-end route building through the application services

use std::sync::Arc;
use std::time::Duration;

use application::{
    ApplicationError, GeocodingPort, PlannerSettings, RoutePlanner, RoutePointBuilder,
    RoutingPort, RouteFailure, SummaryEditing,
};
use async_trait::async_trait;
use domain::{
    GeoPoint, GeocodeCandidate, RouteEndpoint, RouteInputState, RoutePath, RouteRequest, Waypoint,
};
use parking_lot::Mutex;

/// Records every query and answers from a fixed gazetteer
#[derive(Default)]
struct RecordingGeocoder {
    queries: Mutex<Vec<String>>,
}

#[async_trait]
impl GeocodingPort for RecordingGeocoder {
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, ApplicationError> {
        self.queries.lock().push(query.to_string());
        let all = [
            ("Paris, Île-de-France, France", 48.8566, 2.3522),
            ("Paris, Texas, United States", 33.6609, -95.5555),
            ("Lyon, Auvergne-Rhône-Alpes, France", 45.764, 4.8357),
        ];
        Ok(all
            .iter()
            .filter(|(name, _, _)| name.starts_with(query))
            .take(limit)
            .map(|(name, lat, lon)| GeocodeCandidate::new(*name, GeoPoint::new(*lat, *lon).unwrap()))
            .collect())
    }
}

/// Returns a canned answer and remembers the requests it saw
struct StubRouter {
    answer: Option<RoutePath>,
    requests: Mutex<Vec<RouteRequest>>,
}

impl StubRouter {
    fn answering(answer: Option<RoutePath>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            requests: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl RoutingPort for StubRouter {
    async fn route(&self, request: &RouteRequest) -> Result<Option<RoutePath>, ApplicationError> {
        self.requests.lock().push(request.clone());
        Ok(self.answer.clone())
    }
}

fn paris() -> GeocodeCandidate {
    GeocodeCandidate::new("Paris", GeoPoint::new(48.8566, 2.3522).unwrap())
}

fn lyon() -> GeocodeCandidate {
    GeocodeCandidate::new("Lyon", GeoPoint::new(45.764, 4.8357).unwrap())
}

fn paris_lyon_path() -> RoutePath {
    RoutePath {
        distance_meters: 462_000.0,
        duration_seconds: 72_000.0,
        coordinates: vec![
            GeoPoint::new(48.8566, 2.3522).unwrap(),
            GeoPoint::new(47.322, 5.0415).unwrap(),
            GeoPoint::new(45.764, 4.8357).unwrap(),
        ],
    }
}

fn planner_with(router: Arc<StubRouter>) -> RoutePlanner {
    RoutePlanner::new(
        Arc::new(RecordingGeocoder::default()),
        router,
        &PlannerSettings::default(),
    )
}

#[tokio::test]
async fn paris_to_lyon_applies_decoded_path() {
    let router = StubRouter::answering(Some(paris_lyon_path()));
    let mut planner = planner_with(router.clone());

    planner.select_start(&paris()).await.unwrap();
    planner.select_end(&lyon()).await.unwrap();
    planner.confirm_route().await.unwrap();

    let requests = router.requests.lock().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].points(), &[paris().point, lyon().point]);

    let session = planner.session_snapshot();
    assert_eq!(session.current_path, Some(paris_lyon_path()));
    assert!(!session.is_loading);
    assert!(session.last_error.is_none());
}

#[tokio::test]
async fn empty_routes_report_no_route_found() {
    let router = StubRouter::answering(None);
    let mut planner = planner_with(router);

    planner.select_start(&paris()).await.unwrap();
    planner.select_end(&lyon()).await.unwrap();
    planner.confirm_route().await.unwrap();

    let session = planner.session_snapshot();
    assert!(session.current_path.is_none());
    assert_eq!(session.last_error, Some(RouteFailure::NoRoute));
    assert_eq!(session.last_error.unwrap().to_string(), "no route found");
    assert!(!session.is_loading);
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_lookup() {
    let geocoder = Arc::new(RecordingGeocoder::default());
    let mut planner = RoutePlanner::new(
        geocoder.clone(),
        StubRouter::answering(None),
        &PlannerSettings::default(),
    );

    for text in ["Pa", "Par", "Pari", "Paris"] {
        planner.set_start_text(text).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(geocoder.queries.lock().is_empty());

    planner.settled().await;
    assert_eq!(*geocoder.queries.lock(), vec!["Paris".to_string()]);

    let candidates = planner.input_snapshot().start_candidates;
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].display_name, "Paris, Île-de-France, France");
}

#[tokio::test]
async fn unresolved_waypoint_is_skipped() {
    let router = StubRouter::answering(Some(paris_lyon_path()));
    let mut planner = planner_with(router.clone());

    planner.select_start(&paris()).await.unwrap();
    planner.select_end(&lyon()).await.unwrap();

    let first = planner.add_waypoint().unwrap();
    let second = planner.add_waypoint().unwrap();
    let dijon = GeocodeCandidate::new("Dijon", GeoPoint::new(47.322, 5.0415).unwrap());
    planner.select_waypoint_candidate(first, &dijon).await.unwrap();
    planner.update_waypoint_label(second, "Mâcon").unwrap();

    let request = planner.input().route_request().unwrap();
    assert_eq!(request.len(), 3);
    assert_eq!(request.points()[1], dijon.point);

    planner.confirm_route().await.unwrap();
    assert_eq!(router.requests.lock()[0].len(), 3);
}

#[tokio::test]
async fn summary_needs_end_confirmation() {
    let mut planner = planner_with(StubRouter::answering(None));

    planner.focus_end().unwrap();
    assert_eq!(planner.input().state(), RouteInputState::EditingEnd);
    assert!(!planner.submit_end());
    assert_ne!(planner.input().state(), RouteInputState::Summary);

    planner.set_end_text("Lyon").unwrap();
    assert!(planner.submit_end());
    assert_eq!(planner.input().state(), RouteInputState::Summary);
    assert_eq!(
        planner.input().policy(),
        SummaryEditing::Locked,
        "endpoints are read-only in the summary by default"
    );
}

#[tokio::test]
async fn waypoint_ids_survive_remove_and_reorder() {
    let mut planner = planner_with(StubRouter::answering(None));
    planner.select_start(&paris()).await.unwrap();
    planner.select_end(&lyon()).await.unwrap();

    let a = planner.add_waypoint().unwrap();
    let b = planner.add_waypoint().unwrap();
    assert!(planner.remove_waypoint(a).await.unwrap());
    let c = planner.add_waypoint().unwrap();
    assert_ne!(a, c);

    assert!(planner.reorder_waypoints(&[c]).await.is_err());
    assert!(planner.reorder_waypoints(&[b, a]).await.is_err());
    let ids: Vec<_> = planner.input_snapshot().waypoints.iter().map(|w| w.id).collect();
    assert_eq!(ids, [b, c]);

    planner.reorder_waypoints(&[c, b]).await.unwrap();
    let ids: Vec<_> = planner.input_snapshot().waypoints.iter().map(|w| w.id).collect();
    assert_eq!(ids, [c, b]);
}

#[test]
fn builder_matches_form_order() {
    let start = RouteEndpoint::resolved("Paris", paris().point);
    let end = RouteEndpoint::resolved("Lyon", lyon().point);
    let mut labelled_only = Waypoint::new();
    labelled_only.set_label("Auxerre");

    let request = RoutePointBuilder::build(&start, &[labelled_only], &end).unwrap();
    assert_eq!(request.points(), &[paris().point, lyon().point]);
}
