use serde::Deserialize;

use crate::services::providers::clarifai::{DEFAULT_API_URL, DEFAULT_MODEL_ID};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Clarifai API key; ingredient detection is disabled without one
    #[serde(default)]
    pub clarifai_api_key: Option<String>,

    /// Clarifai API base URL
    #[serde(default = "default_clarifai_api_url")]
    pub clarifai_api_url: String,

    /// Clarifai model used for food recognition
    #[serde(default = "default_clarifai_model_id")]
    pub clarifai_model_id: String,

    /// Minimum concept confidence surfaced as an ingredient
    #[serde(default = "default_detection_min_confidence")]
    pub detection_min_confidence: f32,

    /// Maximum ingredients surfaced per image
    #[serde(default = "default_detection_max_results")]
    pub detection_max_results: usize,

    /// Largest accepted image upload in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_clarifai_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_clarifai_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_detection_min_confidence() -> f32 {
    0.85
}

fn default_detection_max_results() -> usize {
    12
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config = envy::from_iter::<_, Config>(vars)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

        if !(0.0..=1.0).contains(&config.detection_min_confidence) {
            anyhow::bail!(
                "DETECTION_MIN_CONFIDENCE must be between 0 and 1, got {}",
                config.detection_min_confidence
            );
        }

        Ok(config)
    }

    /// API key with blank values treated as unset
    pub fn clarifai_api_key(&self) -> Option<&str> {
        self.clarifai_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
