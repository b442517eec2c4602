use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{
    config::Config,
    models::{DetectedIngredients, ImageUpload},
    services::providers::IngredientDetector,
};

/// Content types the vision provider accepts
pub const SUPPORTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/heic"];

const BYTES_PER_KB: usize = 1024;
const BYTES_PER_MB: usize = 1024 * BYTES_PER_KB;

/// Failures of the ingredient detection flow
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("Clarifai API key is not configured on the server.")]
    NotConfigured,

    #[error("Image file is required.")]
    MissingImage,

    #[error("Unsupported file type. Please upload a JPG, PNG, or WebP image.")]
    UnsupportedFileType(Option<String>),

    #[error("File is too large. Maximum size is {limit}.")]
    FileTooLarge { size: usize, limit: String },

    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Something went wrong while processing the image. Please try again.")]
    Transport(#[from] reqwest::Error),

    #[error("No ingredients recognized. Try a clearer image.")]
    NothingRecognized,
}

impl DetectionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DetectionError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
            DetectionError::MissingImage => StatusCode::BAD_REQUEST,
            DetectionError::UnsupportedFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            DetectionError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            DetectionError::Provider { .. } | DetectionError::Transport(_) => {
                StatusCode::BAD_GATEWAY
            }
            DetectionError::NothingRecognized => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for DetectionError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

/// Limits applied to uploads and provider output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionSettings {
    /// Concepts below this confidence are discarded
    pub min_confidence: f32,
    /// At most this many ingredients are returned per image
    pub max_results: usize,
    pub max_upload_bytes: usize,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            min_confidence: 0.85,
            max_results: 12,
            max_upload_bytes: 5 * BYTES_PER_MB,
        }
    }
}

impl From<&Config> for DetectionSettings {
    fn from(config: &Config) -> Self {
        Self {
            min_confidence: config.detection_min_confidence,
            max_results: config.detection_max_results,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Human-readable size limit, in whole MB from 1 MiB up and whole KB below
///
/// Rounds up so a limit is never shown smaller than it is.
fn describe_limit(bytes: usize) -> String {
    if bytes >= BYTES_PER_MB {
        format!("{}MB", bytes.div_ceil(BYTES_PER_MB))
    } else {
        format!("{}KB", bytes.div_ceil(BYTES_PER_KB))
    }
}

/// Rejects uploads the provider would not accept, before any network call
pub fn validate_upload(
    upload: &ImageUpload,
    settings: &DetectionSettings,
) -> Result<(), DetectionError> {
    if upload.is_empty() {
        return Err(DetectionError::MissingImage);
    }

    let supported = upload
        .content_type
        .as_deref()
        .map(|content_type| content_type.trim().to_ascii_lowercase())
        .is_some_and(|content_type| SUPPORTED_IMAGE_TYPES.contains(&content_type.as_str()));
    if !supported {
        return Err(DetectionError::UnsupportedFileType(upload.content_type.clone()));
    }

    if upload.len() > settings.max_upload_bytes {
        return Err(DetectionError::FileTooLarge {
            size: upload.len(),
            limit: describe_limit(settings.max_upload_bytes),
        });
    }

    Ok(())
}

/// Detects ingredient names in an uploaded image
///
/// Validates the upload, asks the provider for concepts, keeps those at or
/// above the confidence threshold, and caps the count in provider order.
pub async fn detect_ingredients(
    detector: Option<&dyn IngredientDetector>,
    upload: &ImageUpload,
    settings: &DetectionSettings,
) -> Result<DetectedIngredients, DetectionError> {
    let detector = detector.ok_or(DetectionError::NotConfigured)?;

    validate_upload(upload, settings)?;

    let concepts = detector.detect(upload).await.map_err(|e| {
        if let DetectionError::Transport(source) = &e {
            tracing::error!(
                error = %source,
                provider = detector.name(),
                "Ingredient detection failed"
            );
        }
        e
    })?;

    let received = concepts.len();
    let ingredients: Vec<String> = concepts
        .into_iter()
        .filter(|concept| concept.confidence >= settings.min_confidence)
        .map(|concept| concept.name)
        .filter(|name| !name.trim().is_empty())
        .take(settings.max_results)
        .collect();

    tracing::info!(
        received,
        kept = ingredients.len(),
        file_name = upload.file_name.as_deref().unwrap_or("unnamed"),
        provider = detector.name(),
        "Detected ingredients"
    );

    if ingredients.is_empty() {
        return Err(DetectionError::NothingRecognized);
    }

    Ok(DetectedIngredients { ingredients })
}
