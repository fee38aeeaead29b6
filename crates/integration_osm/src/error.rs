//! OSM service error types

use thiserror::Error;

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to the geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Geocoding service unavailable: {0}")]
    Unavailable(String),

    /// The response could not be read as a list of places
    #[error("Malformed geocoding response: {0}")]
    Malformed(String),

    /// Request timeout
    #[error("Geocoding request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Malformed(_))
    }
}

/// Errors that can occur during routing
#[derive(Debug, Error)]
pub enum RoutingError {
    /// The request itself is unusable (e.g. fewer than two points)
    #[error("Invalid routing request: {0}")]
    InvalidRequest(String),

    /// Connection to the routing service failed
    #[error("Routing connection failed: {0}")]
    ConnectionFailed(String),

    /// The service answered with a non-success status
    #[error("Routing service unavailable: {0}")]
    Unavailable(String),

    /// The response or its geometry could not be decoded
    #[error("Malformed routing response: {0}")]
    Malformed(String),

    /// Request timeout
    #[error("Routing request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Unavailable(_) | Self::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(RoutingError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(RoutingError::Unavailable("HTTP 503".to_string()).is_retryable());
        assert!(RoutingError::Timeout { timeout_secs: 30 }.is_retryable());
        assert!(GeocodingError::Unavailable("HTTP 503".to_string()).is_retryable());
        assert!(GeocodingError::Timeout { timeout_secs: 5 }.is_retryable());
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!RoutingError::InvalidRequest("1 point".to_string()).is_retryable());
        assert!(!RoutingError::Malformed("bad".to_string()).is_retryable());
        assert!(!GeocodingError::Malformed("bad".to_string()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = RoutingError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));

        let err = GeocodingError::Unavailable("HTTP 502 Bad Gateway".to_string());
        assert!(err.to_string().contains("502"));
    }
}
