/// Ingredient detection provider abstraction
///
/// Vision backends (currently only Clarifai) sit behind one trait so the HTTP
/// layer and tests can swap them. Providers only report raw concepts; upload
/// validation, confidence filtering and capping happen in the detection service.
use crate::{
    models::{DetectedConcept, ImageUpload},
    services::detection::DetectionError,
};

pub mod clarifai;

pub use clarifai::ClarifaiDetector;

/// Trait for image-to-ingredient providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IngredientDetector: Send + Sync {
    /// Sends an already validated image to the provider
    ///
    /// Returns every concept the provider reported, in provider order.
    async fn detect(&self, image: &ImageUpload) -> Result<Vec<DetectedConcept>, DetectionError>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
