/// Clarifai food recognition provider
///
/// Posts the image as base64 JSON to the model outputs endpoint:
/// `POST {api_url}/v2/models/{model_id}/outputs` with `Authorization: Key {api_key}`.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client as HttpClient;

use crate::{
    models::{ClarifaiRequest, ClarifaiResponse, DetectedConcept, ImageUpload},
    services::{detection::DetectionError, providers::IngredientDetector},
};

pub const DEFAULT_API_URL: &str = "https://api.clarifai.com";
pub const DEFAULT_MODEL_ID: &str = "food-item-v1";

/// Shown when the provider fails without describing why
const FALLBACK_PROVIDER_MESSAGE: &str = "Unable to detect ingredients. Try another photo.";

#[derive(Clone)]
pub struct ClarifaiDetector {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model_id: String,
}

impl ClarifaiDetector {
    pub fn new(api_key: String, api_url: String, model_id: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
            model_id,
        }
    }

    fn outputs_url(&self) -> String {
        format!(
            "{}/v2/models/{}/outputs",
            self.api_url.trim_end_matches('/'),
            self.model_id
        )
    }
}

#[async_trait::async_trait]
impl IngredientDetector for ClarifaiDetector {
    async fn detect(&self, image: &ImageUpload) -> Result<Vec<DetectedConcept>, DetectionError> {
        let body = ClarifaiRequest::single_image(STANDARD.encode(&image.bytes));

        let response = self
            .http_client
            .post(self.outputs_url())
            .header("Authorization", format!("Key {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are best-effort; an unreadable one falls back to the generic message
            let message = response
                .json::<ClarifaiResponse>()
                .await
                .ok()
                .and_then(|body| body.error_description().map(str::to_string))
                .unwrap_or_else(|| FALLBACK_PROVIDER_MESSAGE.to_string());

            tracing::warn!(
                status = status.as_u16(),
                message = %message,
                provider = self.name(),
                "Ingredient detection rejected by provider"
            );

            return Err(DetectionError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ClarifaiResponse = response.json().await?;
        let concepts = parsed.into_concepts();

        tracing::info!(
            concepts = concepts.len(),
            bytes = image.len(),
            provider = self.name(),
            "Ingredient detection completed"
        );

        Ok(concepts)
    }

    fn name(&self) -> &'static str {
        "clarifai"
    }
}
