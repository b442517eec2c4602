use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{DietaryTag, Difficulty, Recipe};

/// Hard constraints a recipe must satisfy to be recommended
///
/// Every field defaults to "no constraint" when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationFilters {
    /// Required dietary tags; a recipe must carry all of them
    #[serde(default)]
    pub dietary: BTreeSet<DietaryTag>,
    /// Accepted difficulty levels; empty accepts every level
    #[serde(default)]
    pub difficulties: BTreeSet<Difficulty>,
    /// Inclusive upper bound on the recipe's total (prep + cook) time
    #[serde(default)]
    pub max_cook_time: Option<u32>,
}

impl RecommendationFilters {
    /// True when no constraint is active
    pub fn is_empty(&self) -> bool {
        self.dietary.is_empty() && self.difficulties.is_empty() && self.max_cook_time.is_none()
    }

    /// Checks a recipe against every active constraint
    pub fn admits(&self, recipe: &Recipe) -> bool {
        let dietary_ok = self.dietary.iter().all(|tag| recipe.has_dietary(*tag));
        let difficulty_ok =
            self.difficulties.is_empty() || self.difficulties.contains(&recipe.difficulty);
        let time_ok = self
            .max_cook_time
            .map_or(true, |limit| recipe.total_time_minutes <= limit);

        dietary_ok && difficulty_ok && time_ok
    }
}

/// A scored recipe for one query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation<'a> {
    pub recipe: &'a Recipe,
    /// 0 to 100
    pub score: u8,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub reasons: Vec<String>,
}

/// Headline figures for the best recommendation
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationSummary {
    pub top_score: u8,
    pub total_time_minutes: u32,
    pub matched_count: usize,
}

impl RecommendationSummary {
    /// Summarizes the first entry of a ranked list
    pub fn from_ranked(recommendations: &[Recommendation<'_>]) -> Option<Self> {
        recommendations.first().map(|top| Self {
            top_score: top.score,
            total_time_minutes: top.recipe.total_time_minutes,
            matched_count: top.matched_ingredients.len(),
        })
    }
}
