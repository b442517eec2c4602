use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::{
    multipart::{MultipartForm, Part},
    TestServer,
};
use serde_json::{json, Value};

use smart_recipe_api::{
    api::{create_router, AppState},
    catalog::Catalog,
    models::{DetectedConcept, ImageUpload},
    services::{providers::IngredientDetector, DetectionError, DetectionSettings},
};

/// Detector returning a fixed set of concepts
struct StubDetector {
    concepts: Vec<DetectedConcept>,
}

#[async_trait::async_trait]
impl IngredientDetector for StubDetector {
    async fn detect(&self, _image: &ImageUpload) -> Result<Vec<DetectedConcept>, DetectionError> {
        Ok(self.concepts.clone())
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

fn concept(name: &str, confidence: f32) -> DetectedConcept {
    DetectedConcept {
        name: name.to_string(),
        confidence,
    }
}

fn create_test_server_with(detector: Option<Arc<dyn IngredientDetector>>) -> TestServer {
    let catalog = Catalog::builtin().unwrap();
    let state = AppState::new(catalog, detector, DetectionSettings::default());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn create_test_server() -> TestServer {
    create_test_server_with(None)
}

fn image_form(bytes: Vec<u8>, mime_type: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes)
            .file_name("fridge.png")
            .mime_type(mime_type),
    )
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_generated_and_echoed() {
    let server = create_test_server();

    let response = server.get("/health").await;
    let generated = response.header("x-request-id");
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());

    let id = uuid::Uuid::new_v4().to_string();
    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_str(&id).unwrap(),
        )
        .await;
    assert_eq!(response.header("x-request-id").to_str().unwrap(), id);
}

#[tokio::test]
async fn test_list_recipes() {
    let server = create_test_server();
    let response = server.get("/api/v1/recipes").await;
    response.assert_status_ok();

    let recipes: Vec<Value> = response.json();
    assert_eq!(recipes.len(), Catalog::builtin().unwrap().len());
    for recipe in &recipes {
        let prep = recipe["prep_time_minutes"].as_u64().unwrap();
        let cook = recipe["cook_time_minutes"].as_u64().unwrap();
        assert_eq!(recipe["total_time_minutes"].as_u64().unwrap(), prep + cook);
    }
}

#[tokio::test]
async fn test_get_recipe() {
    let server = create_test_server();

    let response = server.get("/api/v1/recipes/shakshuka").await;
    response.assert_status_ok();
    let recipe: Value = response.json();
    assert_eq!(recipe["title"], "Shakshuka");
    assert_eq!(recipe["difficulty"], "Easy");
    assert_eq!(recipe["dietary"], json!(["vegetarian", "gluten-free"]));

    let response = server.get("/api/v1/recipes/does-not-exist").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("does-not-exist"));
}

#[tokio::test]
async fn test_list_all_ingredients() {
    let server = create_test_server();
    let response = server.get("/api/v1/ingredients").await;
    response.assert_status_ok();

    let body: Value = response.json();
    let ingredients: Vec<&str> = body["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(ingredients.windows(2).all(|pair| pair[0] < pair[1]));
    assert!(ingredients.contains(&"garlic"));
}

#[tokio::test]
async fn test_ingredient_suggestions() {
    let server = create_test_server();
    let response = server
        .get("/api/v1/ingredients?q=OIL&selected=Olive%20Oil")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let suggestions = body["ingredients"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(suggestions
        .iter()
        .all(|s| s.as_str().unwrap().contains("oil")));
    assert!(!suggestions.contains(&json!("olive oil")));

    let response = server.get("/api/v1/ingredients?q=a&limit=3").await;
    let body: Value = response.json();
    assert_eq!(body["ingredients"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_recommendations_full_match_ranks_first() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "selected_ingredients": [
                "Pasta", "cherry tomatoes", "garlic", "basil", "olive oil", "parmesan"
            ]
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let total = Catalog::builtin().unwrap().len();
    assert_eq!(body["total_recipes"], total);

    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), total);

    let top = &recommendations[0];
    assert_eq!(top["recipe"]["id"], "tomato-basil-pasta");
    assert_eq!(top["score"], 95);
    assert_eq!(top["missing_ingredients"], json!([]));
    assert_eq!(top["reasons"][0], "You have all 6 ingredients");
    assert_eq!(top["reasons"][1], "Ready in 25 minutes");

    assert_eq!(body["summary"]["top_score"], 95);
    assert_eq!(body["summary"]["total_time_minutes"], 25);
    assert_eq!(body["summary"]["matched_count"], 6);

    let scores: Vec<u64> = recommendations
        .iter()
        .map(|r| r["score"].as_u64().unwrap())
        .collect();
    assert!(scores.windows(2).all(|pair| pair[0] >= pair[1]));
}

#[tokio::test]
async fn test_recommendations_respect_filters() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "selected_ingredients": ["eggs", "onion"],
            "filters": {
                "dietary": ["vegetarian"],
                "max_cook_time": 30
            }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    let recommendations = body["recommendations"].as_array().unwrap();
    assert!(!recommendations.is_empty());
    for recommendation in recommendations {
        let recipe = &recommendation["recipe"];
        assert!(recipe["total_time_minutes"].as_u64().unwrap() <= 30);
        assert!(recipe["dietary"]
            .as_array()
            .unwrap()
            .contains(&json!("vegetarian")));
        assert_eq!(
            recommendation["reasons"][2],
            "Matches your vegetarian filter"
        );
    }
}

#[tokio::test]
async fn test_recommendations_filters_can_exclude_everything() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "selected_ingredients": ["beef chuck"],
            "filters": { "dietary": ["vegan"], "difficulties": ["Hard"] }
        }))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["recommendations"], json!([]));
    assert_eq!(body["summary"], Value::Null);
}

#[tokio::test]
async fn test_recommendations_require_an_ingredient() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({ "selected_ingredients": ["  "] }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Add at least one ingredient to generate recommendations."
    );
}

#[tokio::test]
async fn test_detect_without_api_key() {
    let server = create_test_server();
    let response = server
        .post("/api/v1/ingredients/detect")
        .multipart(image_form(vec![1, 2, 3], "image/png"))
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Clarifai API key is not configured on the server."
    );
}

#[tokio::test]
async fn test_detect_returns_confident_ingredients() {
    let detector = StubDetector {
        concepts: vec![
            concept("tomato", 0.97),
            concept("table", 0.40),
            concept("basil", 0.88),
        ],
    };
    let server = create_test_server_with(Some(Arc::new(detector)));

    let response = server
        .post("/api/v1/ingredients/detect")
        .multipart(image_form(vec![1, 2, 3], "image/jpeg"))
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["ingredients"], json!(["tomato", "basil"]));
}

#[tokio::test]
async fn test_detect_rejects_unsupported_type() {
    let server = create_test_server_with(Some(Arc::new(StubDetector { concepts: vec![] })));
    let response = server
        .post("/api/v1/ingredients/detect")
        .multipart(image_form(vec![1, 2, 3], "image/gif"))
        .await;
    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Unsupported file type. Please upload a JPG, PNG, or WebP image."
    );
}

#[tokio::test]
async fn test_detect_rejects_oversized_image() {
    let server = create_test_server_with(Some(Arc::new(StubDetector { concepts: vec![] })));
    let too_big = vec![0u8; DetectionSettings::default().max_upload_bytes + 1];
    let response = server
        .post("/api/v1/ingredients/detect")
        .multipart(image_form(too_big, "image/png"))
        .await;
    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = response.json();
    assert_eq!(body["error"], "File is too large. Maximum size is 5MB.");
}

#[tokio::test]
async fn test_detect_requires_file_field() {
    let server = create_test_server_with(Some(Arc::new(StubDetector { concepts: vec![] })));
    let form = MultipartForm::new().add_text("note", "no image here");
    let response = server
        .post("/api/v1/ingredients/detect")
        .multipart(form)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "Image file is required.");
}

#[tokio::test]
async fn test_detect_nothing_recognized() {
    let detector = StubDetector {
        concepts: vec![concept("plate", 0.30)],
    };
    let server = create_test_server_with(Some(Arc::new(detector)));
    let response = server
        .post("/api/v1/ingredients/detect")
        .multipart(image_form(vec![1, 2, 3], "image/webp"))
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "No ingredients recognized. Try a clearer image."
    );
}
