//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the OpenStreetMap clients,
//! loads the layered configuration and installs the tracing subscriber.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, LogFormat, MapConfig, PlannerConfig};
pub use telemetry::{TelemetryError, init_tracing};
