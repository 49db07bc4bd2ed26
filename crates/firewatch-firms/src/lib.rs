//! NASA FIRMS fire-feed client.
//!
//! Fetches satellite fire detections for a named region via the FIRMS
//! area-CSV API, parses them into typed records, and renders them onto a
//! Leaflet map.

pub mod client;
pub mod map;
pub mod records;
pub mod regions;

pub use client::{FirmsClient, FirmsConfig, DEFAULT_DAY_RANGE, DEFAULT_SOURCE};
pub use records::{high_confidence, Confidence, FireDetection};
pub use regions::{lookup_region, BoundingBox};

#[derive(Debug, thiserror::Error)]
pub enum FirmsError {
    #[error("region not found for {country} - {state}")]
    RegionNotFound { country: String, state: String },

    #[error("FIRMS API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("feed parse error: {0}")]
    Parse(String),
}
