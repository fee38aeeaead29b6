//! Application-level errors

use domain::DomainError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Geocoding service unreachable or answering with an error status
    #[error("Geocoding unavailable: {0}")]
    GeocodeUnavailable(String),

    /// Geocoding response could not be read as candidates
    #[error("Malformed geocoding response: {0}")]
    GeocodeMalformed(String),

    /// Route request rejected before reaching the service
    #[error("Invalid route request: {0}")]
    InvalidRequest(String),

    /// Routing service unreachable or answering with an error status
    #[error("Routing unavailable: {0}")]
    RoutingUnavailable(String),

    /// Routing response or geometry could not be decoded
    #[error("Malformed routing response: {0}")]
    RoutingMalformed(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApplicationError::GeocodeUnavailable(_) | ApplicationError::RoutingUnavailable(_)
        )
    }
}
