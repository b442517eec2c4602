use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// How much effort a recipe takes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

/// Dietary label a recipe satisfies
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryTag {
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl Display for DietaryTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DietaryTag::Vegetarian => write!(f, "vegetarian"),
            DietaryTag::Vegan => write!(f, "vegan"),
            DietaryTag::GlutenFree => write!(f, "gluten-free"),
        }
    }
}

/// Canonical form used whenever ingredient names are compared
pub fn normalize_ingredient(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Macronutrients per serving, in grams
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Macros {
    pub protein: f32,
    pub carbs: f32,
    pub fat: f32,
}

/// A recipe as authored in the catalog data file
///
/// Carries no total time: that is always derived from prep and cook time.
#[derive(Debug, Clone, Deserialize)]
pub struct RecipeRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub dietary: Vec<DietaryTag>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub calories: u32,
    pub macros: Macros,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A catalog recipe returned to the client
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub difficulty: Difficulty,
    pub dietary: Vec<DietaryTag>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub total_time_minutes: u32,
    pub servings: u32,
    pub calories: u32,
    pub macros: Macros,
    pub image: Option<String>,
    pub tags: Vec<String>,
}

impl Recipe {
    /// Checks whether the recipe carries a dietary tag
    pub fn has_dietary(&self, tag: DietaryTag) -> bool {
        self.dietary.contains(&tag)
    }
}

/// Prep plus cook time does not fit in a `u32` of minutes
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Recipe {id} has a total time that overflows")]
pub struct TimeOverflow {
    pub id: String,
}

impl TryFrom<RecipeRecord> for Recipe {
    type Error = TimeOverflow;

    fn try_from(record: RecipeRecord) -> Result<Self, Self::Error> {
        let Some(total_time_minutes) = record
            .prep_time_minutes
            .checked_add(record.cook_time_minutes)
        else {
            return Err(TimeOverflow { id: record.id });
        };

        // Tags are a set; keep the authored order but drop repeats
        let mut dietary = Vec::with_capacity(record.dietary.len());
        for tag in record.dietary {
            if !dietary.contains(&tag) {
                dietary.push(tag);
            }
        }

        Ok(Recipe {
            id: record.id,
            title: record.title,
            description: record.description,
            ingredients: record.ingredients,
            instructions: record.instructions,
            difficulty: record.difficulty,
            dietary,
            prep_time_minutes: record.prep_time_minutes,
            cook_time_minutes: record.cook_time_minutes,
            total_time_minutes,
            servings: record.servings,
            calories: record.calories,
            macros: record.macros,
            image: record.image,
            tags: record.tags,
        })
    }
}
