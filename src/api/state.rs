use std::sync::Arc;

use crate::{
    catalog::Catalog,
    config::Config,
    services::{
        providers::{ClarifaiDetector, IngredientDetector},
        DetectionSettings,
    },
};

/// Shared application state
///
/// Everything here is read-only after startup, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    /// `None` when no vision provider is configured
    pub detector: Option<Arc<dyn IngredientDetector>>,
    pub detection: DetectionSettings,
}

impl AppState {
    pub fn new(
        catalog: Catalog,
        detector: Option<Arc<dyn IngredientDetector>>,
        detection: DetectionSettings,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            detector,
            detection,
        }
    }

    /// Builds state from configuration, wiring Clarifai when a key is present
    pub fn from_config(config: &Config, catalog: Catalog) -> Self {
        let detector = config.clarifai_api_key().map(|api_key| {
            Arc::new(ClarifaiDetector::new(
                api_key.to_string(),
                config.clarifai_api_url.clone(),
                config.clarifai_model_id.clone(),
            )) as Arc<dyn IngredientDetector>
        });

        if detector.is_none() {
            tracing::warn!("CLARIFAI_API_KEY not set; ingredient detection is disabled");
        }

        Self::new(catalog, detector, DetectionSettings::from(config))
    }
}
