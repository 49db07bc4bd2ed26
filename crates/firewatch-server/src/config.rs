//! Environment configuration.

/// Runtime configuration read from the environment at startup.
#[derive(Clone)]
pub struct Config {
    /// Gemini API key (`GOOGLE_API_KEY`). Required.
    pub google_api_key: String,
    /// FIRMS map key (`MAP_KEY`). Required.
    pub map_key: String,
    /// Fire-detector inference service URL (`DETECTOR_URL`). Optional;
    /// without it the image endpoint reports the detector unavailable.
    pub detector_url: Option<String>,
    /// Gemini model override (`GEMINI_MODEL`).
    pub model: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("google_api_key", &"[REDACTED]")
            .field("map_key", &"[REDACTED]")
            .field("detector_url", &self.detector_url)
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingEnv(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl Config {
    /// Read configuration from the environment. Missing API keys are fatal
    /// at startup rather than surfaced per request.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            google_api_key: required("GOOGLE_API_KEY")?,
            map_key: required("MAP_KEY")?,
            detector_url: optional("DETECTOR_URL"),
            model: optional("GEMINI_MODEL"),
        })
    }
}
