//! Geocoding service port
//!
//! Defines the interface for free-text place lookup.
//! Adapters in the infrastructure layer implement this port using geocoding APIs.

use async_trait::async_trait;
use domain::GeocodeCandidate;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for place search
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Look up candidates for a trimmed, non-empty query
    ///
    /// Results keep the service's ranking and hold at most `limit` entries.
    async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodeCandidate>, ApplicationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn _assert_object_safe(_: &dyn GeocodingPort) {}

    #[test]
    fn trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn GeocodingPort>();
    }

    #[tokio::test]
    async fn mock_returns_configured_candidates() {
        let mut mock = MockGeocodingPort::new();
        mock.expect_search()
            .withf(|query, limit| query == "Lyon" && *limit == 5)
            .times(1)
            .returning(|_, _| {
                Ok(vec![GeocodeCandidate::new(
                    "Lyon",
                    domain::GeoPoint::new(45.764, 4.8357).unwrap(),
                )])
            });

        let results = mock.search("Lyon", 5).await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
