//! Live fire-data lookup tool over the FIRMS feed.

use std::sync::Arc;

use async_trait::async_trait;

use firewatch_ai::ToolDefinition;
use firewatch_firms::{high_confidence, FireDetection, FirmsClient, FirmsError, DEFAULT_DAY_RANGE, DEFAULT_SOURCE};

use crate::registry::ToolHandler;

/// Returned instead of an empty result set so the model never mistakes
/// "nothing high-confidence" for data it can embellish.
pub const NO_VERIFIED_DATA: &str = "No verified data.";

/// Fetches real-time fire detections for a named region and reports the
/// high-confidence subset as JSON records.
pub struct FireDataTool {
    firms: Arc<FirmsClient>,
}

impl FireDataTool {
    pub fn new(firms: Arc<FirmsClient>) -> Self {
        Self { firms }
    }

    async fn fetch(&self, country: &str, state: &str, day_range: u32) -> Result<String, FirmsError> {
        let detections = self
            .firms
            .fetch_area(country, state, DEFAULT_SOURCE, day_range)
            .await?;
        Ok(render_fire_report(&detections))
    }
}

/// High-confidence records as a JSON array, or the sentinel when the
/// filter leaves nothing.
fn render_fire_report(detections: &[FireDetection]) -> String {
    let high = high_confidence(detections);
    if high.is_empty() {
        return NO_VERIFIED_DATA.to_string();
    }
    // Vec<FireDetection> serialization cannot fail.
    serde_json::to_string(&high).unwrap_or_else(|_| NO_VERIFIED_DATA.to_string())
}

#[async_trait]
impl ToolHandler for FireDataTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get_current_fire_data".to_string(),
            description: "Fetches real-time wildfire data for a specific state and country. \
                          Useful when the user asks about active fires, confidence levels, or coordinates."
                .to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "state": {
                        "type": "string",
                        "description": "State or subdivision name (e.g., 'up', 'maharashtra')"
                    },
                    "country": {
                        "type": "string",
                        "description": "Country name (default: 'india')"
                    },
                    "day_range": {
                        "type": "integer",
                        "description": "Recency window in days, 1-10 (default: 3)"
                    }
                },
                "required": ["state"]
            }),
        }
    }

    async fn call(&self, arguments: &serde_json::Value) -> String {
        let Some(state) = arguments["state"].as_str().filter(|s| !s.is_empty()) else {
            return "Error fetching fire data: missing required argument 'state'".to_string();
        };
        let country = arguments["country"].as_str().unwrap_or("india");
        let day_range = arguments["day_range"]
            .as_u64()
            .map(|d| d as u32)
            .unwrap_or(DEFAULT_DAY_RANGE);

        match self.fetch(country, state, day_range).await {
            Ok(report) => report,
            Err(e) => format!("Error fetching fire data: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use firewatch_firms::{Confidence, FirmsConfig};

    fn detection(confidence: Confidence) -> FireDetection {
        FireDetection {
            latitude: 26.9,
            longitude: 81.0,
            acq_date: NaiveDate::from_ymd_opt(2025, 11, 20).unwrap(),
            acq_time: "731".to_string(),
            confidence,
        }
    }

    #[test]
    fn empty_high_confidence_set_yields_the_sentinel() {
        let report = render_fire_report(&[
            detection(Confidence::Low),
            detection(Confidence::Nominal),
        ]);
        assert_eq!(report, NO_VERIFIED_DATA);
    }

    #[test]
    fn high_confidence_rows_serialize_as_json_records() {
        let report = render_fire_report(&[
            detection(Confidence::High),
            detection(Confidence::Low),
        ]);
        let records: Vec<serde_json::Value> = serde_json::from_str(&report).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["confidence"], "h");
        assert_eq!(records[0]["latitude"], 26.9);
    }

    #[tokio::test]
    async fn unknown_region_becomes_result_text() {
        // Unroutable base URL: the region lookup fails before any request.
        let tool = FireDataTool::new(Arc::new(FirmsClient::new(
            FirmsConfig::new("test-key").with_base_url("http://127.0.0.1:1"),
        )));
        let output = tool
            .call(&serde_json::json!({"state": "unknown", "country": "india"}))
            .await;
        assert!(output.starts_with("Error fetching fire data:"), "got: {output}");
        assert!(output.contains("region not found"), "got: {output}");
    }

    #[tokio::test]
    async fn missing_state_argument_becomes_result_text() {
        let tool = FireDataTool::new(Arc::new(FirmsClient::new(
            FirmsConfig::new("test-key").with_base_url("http://127.0.0.1:1"),
        )));
        let output = tool.call(&serde_json::json!({})).await;
        assert!(output.contains("missing required argument"), "got: {output}");
    }
}
