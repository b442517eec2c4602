use std::collections::HashSet;

use crate::{
    catalog::Catalog,
    models::{normalize_ingredient, Difficulty, Recipe, Recommendation, RecommendationFilters},
};

/// Points awarded for full ingredient coverage; the dominant share of the score
const COVERAGE_WEIGHT: f64 = 84.0;
/// Cap on the one-point-per-tag bonus for dietary tags beyond those filtered on
const DIETARY_BONUS_CAP: usize = 4;
/// (inclusive upper bound in minutes, bonus points), checked in order
const TIME_BONUSES: [(u32, f64); 4] = [(15, 8.0), (30, 6.0), (45, 4.0), (60, 2.0)];

/// Largest score difference secondary factors can produce
pub const BONUS_CEILING: u8 = 16;

/// Ranks the catalog against the user's ingredients and filters
///
/// Recipes failing a filter are dropped. Survivors are sorted by score
/// (descending), then total time (ascending), then catalog order. Never
/// fails: empty selections and filters that exclude everything both yield
/// valid results.
pub fn get_recommendations<'a, S: AsRef<str>>(
    catalog: &'a Catalog,
    selected_ingredients: &[S],
    filters: &RecommendationFilters,
) -> Vec<Recommendation<'a>> {
    let selection = normalize_selection(selected_ingredients);

    let mut recommendations: Vec<Recommendation<'a>> = catalog
        .recipes()
        .iter()
        .filter(|recipe| filters.admits(recipe))
        .map(|recipe| recommend(recipe, &selection, filters))
        .collect();

    // Stable, so equal keys keep catalog order
    recommendations.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then(a.recipe.total_time_minutes.cmp(&b.recipe.total_time_minutes))
    });

    tracing::debug!(
        selected = selection.len(),
        candidates = catalog.len(),
        returned = recommendations.len(),
        "Recommendations ranked"
    );

    recommendations
}

/// Normalized, deduplicated ingredient selection; blank entries are ignored
fn normalize_selection<S: AsRef<str>>(selected: &[S]) -> HashSet<String> {
    selected
        .iter()
        .map(|name| normalize_ingredient(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect()
}

fn recommend<'a>(
    recipe: &'a Recipe,
    selection: &HashSet<String>,
    filters: &RecommendationFilters,
) -> Recommendation<'a> {
    let (matched_ingredients, missing_ingredients): (Vec<String>, Vec<String>) = recipe
        .ingredients
        .iter()
        .cloned()
        .partition(|name| selection.contains(&normalize_ingredient(name)));

    let matched = matched_ingredients.len();

    Recommendation {
        recipe,
        score: score(recipe, matched, filters),
        reasons: reasons(recipe, matched, filters),
        matched_ingredients,
        missing_ingredients,
    }
}

/// Fraction of the recipe's ingredients the user has; 0 for an empty list
fn coverage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    }
}

fn time_bonus(total_time_minutes: u32) -> f64 {
    TIME_BONUSES
        .iter()
        .find(|(limit, _)| total_time_minutes <= *limit)
        .map_or(0.0, |(_, bonus)| *bonus)
}

/// One point per dietary tag the recipe carries that the filters did not require
fn dietary_bonus(recipe: &Recipe, filters: &RecommendationFilters) -> f64 {
    let extra = recipe
        .dietary
        .iter()
        .filter(|tag| !filters.dietary.contains(*tag))
        .count();
    extra.min(DIETARY_BONUS_CAP) as f64
}

fn difficulty_bonus(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 4.0,
        Difficulty::Medium => 2.0,
        Difficulty::Hard => 0.0,
    }
}

/// Integer score in [0, 100] driven mainly by ingredient coverage
///
/// Any partial overlap scores at least 1.
fn score(recipe: &Recipe, matched: usize, filters: &RecommendationFilters) -> u8 {
    let raw = coverage(matched, recipe.ingredients.len()) * COVERAGE_WEIGHT
        + time_bonus(recipe.total_time_minutes)
        + difficulty_bonus(recipe.difficulty)
        + dietary_bonus(recipe, filters);

    let rounded = raw.round().clamp(0.0, 100.0) as u8;
    if matched > 0 {
        rounded.max(1)
    } else {
        rounded
    }
}

/// One to three short explanations built from the recipe's real attributes
fn reasons(recipe: &Recipe, matched: usize, filters: &RecommendationFilters) -> Vec<String> {
    let total = recipe.ingredients.len();
    let mut reasons = Vec::with_capacity(3);

    reasons.push(match (matched, total) {
        (_, 0) => "No ingredient list available".to_string(),
        (m, t) if m == t => format!("You have all {} ingredients", t),
        (m, t) => format!("Uses {} of {} ingredients you have", m, t),
    });

    reasons.push(format!("Ready in {} minutes", recipe.total_time_minutes));

    if let Some(alignment) = alignment_reason(recipe, filters) {
        reasons.push(alignment);
    }

    reasons
}

fn alignment_reason(recipe: &Recipe, filters: &RecommendationFilters) -> Option<String> {
    if !filters.dietary.is_empty() {
        let tags: Vec<String> = filters.dietary.iter().map(|tag| tag.to_string()).collect();
        let noun = if tags.len() == 1 { "filter" } else { "filters" };
        return Some(format!("Matches your {} {}", join_words(&tags), noun));
    }

    if !filters.difficulties.is_empty() {
        return Some(format!(
            "Matches your {} difficulty preference",
            recipe.difficulty
        ));
    }

    if let Some(limit) = filters.max_cook_time {
        return Some(format!("Fits your {} minute limit", limit));
    }

    if filters.is_empty() && recipe.difficulty == Difficulty::Easy {
        return Some("Easy to make".to_string());
    }

    None
}

/// "a", "a and b", "a, b and c"
fn join_words(words: &[String]) -> String {
    match words {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
