pub mod detection;
pub mod recipe;
pub mod recommendation;

pub use detection::{
    ClarifaiConcept, ClarifaiRequest, ClarifaiResponse, DetectedConcept, DetectedIngredients,
    ImageUpload,
};
pub use recipe::{
    normalize_ingredient, DietaryTag, Difficulty, Macros, Recipe, RecipeRecord, TimeOverflow,
};
pub use recommendation::{Recommendation, RecommendationFilters, RecommendationSummary};
