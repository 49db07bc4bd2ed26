//! FIRMS area API client.

use tracing::debug;

use crate::records::{parse_area_csv, FireDetection};
use crate::regions::lookup_region;
use crate::FirmsError;

pub(crate) const FIRMS_API_BASE: &str = "https://firms.modaps.eosdis.nasa.gov";

/// Default satellite source product.
pub const DEFAULT_SOURCE: &str = "VIIRS_SNPP_NRT";

/// Default recency window in days.
pub const DEFAULT_DAY_RANGE: u32 = 3;

/// FIRMS client configuration.
#[derive(Clone)]
pub struct FirmsConfig {
    pub map_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for FirmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirmsConfig")
            .field("map_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl FirmsConfig {
    pub fn new(map_key: impl Into<String>) -> Self {
        Self {
            map_key: map_key.into(),
            base_url: FIRMS_API_BASE.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// Client for the FIRMS area-CSV API.
pub struct FirmsClient {
    config: FirmsConfig,
    http: reqwest::Client,
}

impl FirmsClient {
    pub fn new(config: FirmsConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Fetch detections for a named region over the given recency window.
    /// The window is clamped to the feed's 1-10 day limit.
    pub async fn fetch_area(
        &self,
        country: &str,
        state: &str,
        source: &str,
        day_range: u32,
    ) -> Result<Vec<FireDetection>, FirmsError> {
        let bbox = lookup_region(country, state).ok_or_else(|| FirmsError::RegionNotFound {
            country: country.to_lowercase(),
            state: state.to_lowercase(),
        })?;

        let day_range = day_range.clamp(1, 10);
        let url = format!(
            "{}/api/area/csv/{}/{}/{}/{}",
            self.config.base_url,
            self.config.map_key,
            source,
            bbox.as_area(),
            day_range
        );

        debug!(country, state, source, day_range, "FIRMS area request");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| FirmsError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| FirmsError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(FirmsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        parse_area_csv(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_region_fails_before_any_request() {
        // Unroutable base URL: the lookup must fail first.
        let client = FirmsClient::new(
            FirmsConfig::new("test-key").with_base_url("http://127.0.0.1:1"),
        );
        let err = client
            .fetch_area("india", "unknown", DEFAULT_SOURCE, DEFAULT_DAY_RANGE)
            .await
            .unwrap_err();
        assert!(matches!(err, FirmsError::RegionNotFound { .. }));
        assert!(err.to_string().contains("region not found"));
    }

    #[test]
    fn config_debug_redacts_key() {
        let config = FirmsConfig::new("super-secret");
        assert!(!format!("{config:?}").contains("super-secret"));
    }
}
