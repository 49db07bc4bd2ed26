//! Client for the external fire-detection inference service.
//!
//! Uploads a photo and gets the same image back with bounding boxes drawn
//! around detected fire regions. The detector itself (a pretrained vision
//! model behind an HTTP endpoint) is an external collaborator.

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("detector error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),
}

/// Detector service configuration.
#[derive(Clone)]
pub struct DetectorConfig {
    pub base_url: String,
    pub confidence_threshold: f64,
}

impl std::fmt::Debug for DetectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectorConfig")
            .field("base_url", &self.base_url)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish()
    }
}

impl DetectorConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            confidence_threshold: 0.25,
        }
    }

    pub fn with_confidence_threshold(mut self, threshold: f64) -> Self {
        self.confidence_threshold = threshold;
        self
    }
}

/// Fire-detector inference client.
pub struct DetectorClient {
    config: DetectorConfig,
    http: reqwest::Client,
}

impl DetectorClient {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::builder()
                .connect_timeout(std::time::Duration::from_secs(10))
                .timeout(std::time::Duration::from_secs(300))
                .build()
                .expect("failed to build HTTP client"),
        }
    }

    /// Send an image to the detector and return the annotated image bytes.
    ///
    /// `filename` is used for the multipart form and for mime sniffing.
    pub async fn draw_boxes(
        &self,
        image_data: Vec<u8>,
        filename: &str,
    ) -> Result<Vec<u8>, VisionError> {
        debug!(
            size = image_data.len(),
            filename, "detector inference request"
        );

        let mime = match filename.rsplit('.').next() {
            Some("png") => "image/png",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            _ => "image/jpeg",
        };

        let file_part = reqwest::multipart::Part::bytes(image_data)
            .file_name(filename.to_string())
            .mime_str(mime)
            .map_err(|e| VisionError::Network(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("conf", self.config.confidence_threshold.to_string());

        let url = format!("{}/detect", self.config.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VisionError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| VisionError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
