//! Route planner behaviour settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::debounced_search::SearchSettings;

/// Whether start and end may be edited again once the summary is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryEditing {
    /// Start and end are read-only in the summary; only waypoints change
    #[default]
    Locked,
    /// Start and end stay editable without leaving the summary
    Editable,
}

/// When a route computation is started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTrigger {
    /// Only on an explicit "confirm route" action
    #[default]
    OnConfirm,
    /// Whenever the resolved points change and both endpoints are resolved
    WhenEndpointsResolved,
}

/// Settings shared by the route input and the route session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerSettings {
    /// Quiescence window before a typed query is looked up
    pub quiet_period: Duration,
    /// Maximum candidates shown per field
    pub max_results: usize,
    /// Minimum trimmed characters before start/end fields search
    pub endpoint_min_chars: usize,
    /// Minimum trimmed characters before a waypoint field searches
    pub waypoint_min_chars: usize,
    pub summary_editing: SummaryEditing,
    pub route_trigger: RouteTrigger,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            quiet_period: SearchSettings::DEFAULT_QUIET_PERIOD,
            max_results: SearchSettings::DEFAULT_MAX_RESULTS,
            endpoint_min_chars: 1,
            waypoint_min_chars: 3,
            summary_editing: SummaryEditing::default(),
            route_trigger: RouteTrigger::default(),
        }
    }
}

impl PlannerSettings {
    /// Search settings for the start and end fields
    #[must_use]
    pub fn endpoint_search(&self) -> SearchSettings {
        SearchSettings {
            quiet_period: self.quiet_period,
            max_results: self.max_results,
            min_query_chars: self.endpoint_min_chars,
        }
    }

    /// Search settings for waypoint fields
    #[must_use]
    pub fn waypoint_search(&self) -> SearchSettings {
        SearchSettings {
            quiet_period: self.quiet_period,
            max_results: self.max_results,
            min_query_chars: self.waypoint_min_chars,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_reference_behaviour() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.quiet_period, Duration::from_millis(400));
        assert_eq!(settings.max_results, 5);
        assert_eq!(settings.summary_editing, SummaryEditing::Locked);
        assert_eq!(settings.route_trigger, RouteTrigger::OnConfirm);
    }

    #[test]
    fn field_search_thresholds_differ() {
        let settings = PlannerSettings::default();
        assert_eq!(settings.endpoint_search().min_query_chars, 1);
        assert_eq!(settings.waypoint_search().min_query_chars, 3);
    }

    #[test]
    fn policies_use_snake_case_names() {
        let json = serde_json::to_string(&RouteTrigger::WhenEndpointsResolved).unwrap();
        assert_eq!(json, "\"when_endpoints_resolved\"");
        let editing: SummaryEditing = serde_json::from_str("\"editable\"").unwrap();
        assert_eq!(editing, SummaryEditing::Editable);
    }
}
