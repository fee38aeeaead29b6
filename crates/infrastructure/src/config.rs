//! Application configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `veloroute.toml`, then `VELOROUTE_*` environment variables where nested
//! keys are separated by a double underscore
//! (e.g. `VELOROUTE_ROUTING__PROFILE=foot`).

use std::fmt;
use std::path::Path;
use std::time::Duration;

use application::{PlannerSettings, RouteTrigger, SummaryEditing};
use domain::{DomainError, GeoPoint, MapRegion};
use integration_osm::{NominatimConfig, OsrmConfig};
use serde::{Deserialize, Serialize};

/// Name of the optional configuration file, without extension
pub const CONFIG_FILE_NAME: &str = "veloroute";

/// Prefix of the environment variables overriding the configuration
pub const ENV_PREFIX: &str = "VELOROUTE";

/// Upper bound for the per-field result cap
const MAX_RESULTS_LIMIT: usize = 50;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid log format: {s}. Use 'text' or 'json'")),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub log_format: LogFormat,

    /// Nominatim place search
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// OSRM routing
    #[serde(default)]
    pub routing: OsrmConfig,

    /// Route form behaviour
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Map defaults handed to the renderer
    #[serde(default)]
    pub map: MapConfig,
}

/// Route form behaviour
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Quiescence window before a typed query is looked up
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,

    /// Candidates shown per field
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Minimum characters before start/end fields search
    #[serde(default = "default_endpoint_min_chars")]
    pub endpoint_min_chars: usize,

    /// Minimum characters before a waypoint field searches
    #[serde(default = "default_waypoint_min_chars")]
    pub waypoint_min_chars: usize,

    /// Whether start and end stay editable in the summary
    #[serde(default)]
    pub summary_editing: SummaryEditing,

    /// When routes are computed
    #[serde(default)]
    pub route_trigger: RouteTrigger,
}

const fn default_quiet_period_ms() -> u64 {
    400
}

const fn default_max_results() -> usize {
    5
}

const fn default_endpoint_min_chars() -> usize {
    1
}

const fn default_waypoint_min_chars() -> usize {
    3
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: default_quiet_period_ms(),
            max_results: default_max_results(),
            endpoint_min_chars: default_endpoint_min_chars(),
            waypoint_min_chars: default_waypoint_min_chars(),
            summary_editing: SummaryEditing::default(),
            route_trigger: RouteTrigger::default(),
        }
    }
}

impl PlannerConfig {
    /// Settings for the application services
    #[must_use]
    pub const fn to_settings(&self) -> PlannerSettings {
        PlannerSettings {
            quiet_period: Duration::from_millis(self.quiet_period_ms),
            max_results: self.max_results,
            endpoint_min_chars: self.endpoint_min_chars,
            waypoint_min_chars: self.waypoint_min_chars,
            summary_editing: self.summary_editing,
            route_trigger: self.route_trigger,
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the result cap is zero or above the limit.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_results == 0 || self.max_results > MAX_RESULTS_LIMIT {
            return Err(format!(
                "planner.max_results must be between 1 and {MAX_RESULTS_LIMIT}, got {}",
                self.max_results
            ));
        }
        Ok(())
    }
}

/// Map defaults used when no route is shown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default = "default_center_latitude")]
    pub default_latitude: f64,

    #[serde(default = "default_center_longitude")]
    pub default_longitude: f64,

    /// Span of the default region in degrees
    #[serde(default = "default_delta")]
    pub default_delta: f64,
}

const fn default_center_latitude() -> f64 {
    48.8566
}

const fn default_center_longitude() -> f64 {
    2.3522
}

const fn default_delta() -> f64 {
    0.5
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            default_latitude: default_center_latitude(),
            default_longitude: default_center_longitude(),
            default_delta: default_delta(),
        }
    }
}

impl MapConfig {
    /// Region shown before any route is computed
    ///
    /// # Errors
    ///
    /// Returns an error if the configured center is not a valid coordinate.
    pub fn default_region(&self) -> Result<MapRegion, DomainError> {
        Ok(MapRegion {
            center: GeoPoint::new(self.default_latitude, self.default_longitude)?,
            latitude_delta: self.default_delta,
            longitude_delta: self.default_delta,
        })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid center or a non-positive span.
    pub fn validate(&self) -> Result<(), String> {
        self.default_region().map_err(|e| format!("map: {e}"))?;
        if !(self.default_delta.is_finite() && self.default_delta > 0.0) {
            return Err(format!(
                "map.default_delta must be positive, got {}",
                self.default_delta
            ));
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load configuration from `veloroute.toml` (if present) and environment
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or deserialized.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::build(config::File::with_name(CONFIG_FILE_NAME).required(false))
    }

    /// Load configuration from an explicit file, then environment
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or a source cannot be deserialized.
    pub fn load_from(path: &Path) -> Result<Self, config::ConfigError> {
        Self::build(config::File::from(path).required(true))
    }

    fn build<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = config::Config::builder()
            .set_default("planner.quiet_period_ms", default_quiet_period_ms())?
            .set_default("planner.max_results", default_max_results() as u64)?
            .add_source(file)
            // Nested keys use a double underscore, e.g. VELOROUTE_GEOCODING__TIMEOUT_SECS
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        config.try_deserialize()
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns all problems found, joined by `; `.
    pub fn validate(&self) -> Result<(), String> {
        let problems: Vec<String> = [
            self.geocoding.validate().map_err(|e| format!("geocoding: {e}")),
            self.routing.validate().map_err(|e| format!("routing: {e}")),
            self.planner.validate(),
            self.map.validate(),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect();

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }
}
