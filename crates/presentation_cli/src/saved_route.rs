//! Saving a planned route to disk
//!
//! Writes the labels of the route form together with the computed path as a
//! pretty-printed JSON document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use domain::{RoutePath, RouteRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A planned route as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedRoute {
    /// When the route was saved
    pub saved_at: DateTime<Utc>,
    pub start: String,
    pub end: String,
    /// Labels of the waypoints, in route order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub via: Vec<String>,
    /// Points that were sent to the routing service
    pub request: RouteRequest,
    pub path: RoutePath,
}

impl SavedRoute {
    /// Stamp a planned route with the current time
    pub fn new(
        start: impl Into<String>,
        end: impl Into<String>,
        via: Vec<String>,
        request: RouteRequest,
        path: RoutePath,
    ) -> Self {
        Self {
            saved_at: Utc::now(),
            start: start.into(),
            end: end.into(),
            via,
            request,
            path,
        }
    }

    /// Default file name, e.g. `route-20260118-093000.json`
    pub fn default_file_name(&self) -> String {
        format!("route-{}.json", self.saved_at.format("%Y%m%d-%H%M%S"))
    }
}

/// Write `route` as JSON
///
/// When `output` is a directory the route is stored there under its default
/// file name. Returns the path written.
///
/// # Errors
///
/// Returns an error if the route cannot be serialized or the file written.
pub fn save_route(route: &SavedRoute, output: &Path) -> Result<PathBuf> {
    let target = if output.is_dir() {
        output.join(route.default_file_name())
    } else {
        output.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(route).context("Failed to serialize route")?;
    fs::write(&target, json)
        .with_context(|| format!("Failed to write route to {}", target.display()))?;

    debug!(path = %target.display(), points = route.path.coordinates.len(), "Route written");
    info!(path = %target.display(), "Route saved");
    Ok(target)
}

/// Read a route saved by [`save_route`]
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a saved route.
pub fn load_route(path: &Path) -> Result<SavedRoute> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read route from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("{} is not a saved route", path.display()))
}
