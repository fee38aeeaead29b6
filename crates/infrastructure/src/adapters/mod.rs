//! Adapters implementing application ports

mod geocoding_adapter;
mod routing_adapter;

pub use geocoding_adapter::NominatimGeocodingAdapter;
pub use routing_adapter::OsrmRoutingAdapter;
