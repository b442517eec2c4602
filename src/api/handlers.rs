use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{
        normalize_ingredient, DetectedIngredients, ImageUpload, Recipe, Recommendation,
        RecommendationFilters, RecommendationSummary,
    },
    services::{detect_ingredients, get_recommendations, DetectionError},
};

use super::AppState;

/// Suggestions returned when the caller does not pass `limit`
const DEFAULT_SUGGESTION_LIMIT: usize = 8;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct IngredientQuery {
    /// Partial ingredient name; switches the endpoint to suggestions
    pub q: Option<String>,
    /// Comma-separated ingredients to leave out of suggestions
    pub selected: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct IngredientsResponse {
    pub ingredients: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub selected_ingredients: Vec<String>,
    #[serde(default)]
    pub filters: RecommendationFilters,
}

#[derive(Debug, Serialize)]
pub struct RecommendationView {
    pub recipe: Recipe,
    pub score: u8,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub reasons: Vec<String>,
}

impl From<Recommendation<'_>> for RecommendationView {
    fn from(recommendation: Recommendation<'_>) -> Self {
        Self {
            recipe: recommendation.recipe.clone(),
            score: recommendation.score,
            matched_ingredients: recommendation.matched_ingredients,
            missing_ingredients: recommendation.missing_ingredients,
            reasons: recommendation.reasons,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub total_recipes: usize,
    pub summary: Option<RecommendationSummary>,
    pub recommendations: Vec<RecommendationView>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get every recipe in catalog order
pub async fn list_recipes(State(state): State<AppState>) -> Json<Vec<Recipe>> {
    Json(state.catalog.recipes().to_vec())
}

/// Get a single recipe by id
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Recipe>> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} does not exist", id)))
}

/// List known ingredients, or suggestions when `q` is given
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientQuery>,
) -> Json<IngredientsResponse> {
    let ingredients = match params.q {
        Some(query) => {
            let selected: Vec<&str> = params
                .selected
                .as_deref()
                .map(|list| list.split(',').collect())
                .unwrap_or_default();
            let limit = params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);

            state
                .catalog
                .suggest_ingredients(&query, &selected, limit)
                .into_iter()
                .map(str::to_string)
                .collect()
        }
        None => state.catalog.all_ingredients().to_vec(),
    };

    Json(IngredientsResponse { ingredients })
}

/// Rank the catalog against the caller's ingredients and filters
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<RecommendationResponse>> {
    let has_ingredient = request
        .selected_ingredients
        .iter()
        .any(|name| !normalize_ingredient(name).is_empty());
    if !has_ingredient {
        return Err(AppError::InvalidInput(
            "Add at least one ingredient to generate recommendations.".to_string(),
        ));
    }

    tracing::info!(
        request_id = %request_id,
        selected = request.selected_ingredients.len(),
        filtered = !request.filters.is_empty(),
        "Processing recommendation request"
    );

    let ranked = get_recommendations(
        &state.catalog,
        &request.selected_ingredients,
        &request.filters,
    );
    let summary = RecommendationSummary::from_ranked(&ranked);

    tracing::info!(
        request_id = %request_id,
        returned = ranked.len(),
        top_score = summary.as_ref().map(|s| s.top_score),
        "Recommendations generated"
    );

    Ok(Json(RecommendationResponse {
        total_recipes: state.catalog.len(),
        summary,
        recommendations: ranked.into_iter().map(RecommendationView::from).collect(),
    }))
}

/// Detect ingredients in an uploaded image (multipart field `file`)
pub async fn detect(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    mut multipart: Multipart,
) -> AppResult<Json<DetectedIngredients>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Malformed upload: {}", e)))?;

        upload = Some(ImageUpload::new(file_name, content_type, bytes.to_vec()));
        break;
    }

    let upload = upload.ok_or(DetectionError::MissingImage)?;

    tracing::info!(
        request_id = %request_id,
        bytes = upload.len(),
        content_type = upload.content_type.as_deref().unwrap_or("unknown"),
        "Processing ingredient detection request"
    );

    let detected =
        detect_ingredients(state.detector.as_deref(), &upload, &state.detection).await?;

    Ok(Json(detected))
}
