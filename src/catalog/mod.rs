use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::models::{normalize_ingredient, Recipe, RecipeRecord, TimeOverflow};

/// Recipe data compiled into the binary
const BUILTIN_RECIPES: &str = include_str!("../../data/recipes.json");

/// Errors raised while loading catalog data
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog data is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Recipe at position {0} has an empty id")]
    EmptyId(usize),
    #[error("Duplicate recipe id: {0}")]
    DuplicateId(String),
    #[error("Recipe {id} has invalid {field}: must be positive")]
    NonPositive { id: String, field: &'static str },
    #[error("Recipe {id} has invalid {field}: must be a non-negative number of grams")]
    InvalidMacro { id: String, field: &'static str },
    #[error(transparent)]
    TimeOverflow(#[from] TimeOverflow),
}

/// Immutable recipe collection shared by every request
///
/// Recipe order is the authored order and breaks ranking ties.
#[derive(Debug, Clone)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    all_ingredients: Vec<String>,
}

impl Catalog {
    /// Builds a catalog from authored records, validating ids and counts
    pub fn from_records(records: Vec<RecipeRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        let mut recipes = Vec::with_capacity(records.len());

        for (position, record) in records.into_iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(position));
            }
            if !seen.insert(record.id.clone()) {
                return Err(CatalogError::DuplicateId(record.id));
            }
            if record.servings == 0 {
                return Err(CatalogError::NonPositive {
                    id: record.id,
                    field: "servings",
                });
            }
            if record.calories == 0 {
                return Err(CatalogError::NonPositive {
                    id: record.id,
                    field: "calories",
                });
            }
            let macros = [
                ("protein", record.macros.protein),
                ("carbs", record.macros.carbs),
                ("fat", record.macros.fat),
            ];
            if let Some(&(field, _)) = macros
                .iter()
                .find(|(_, grams)| grams.is_nan() || *grams < 0.0)
            {
                return Err(CatalogError::InvalidMacro {
                    id: record.id,
                    field,
                });
            }
            recipes.push(Recipe::try_from(record)?);
        }

        let all_ingredients = recipes
            .iter()
            .flat_map(|recipe| recipe.ingredients.iter())
            .map(|name| normalize_ingredient(name))
            .filter(|name| !name.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            recipes,
            all_ingredients,
        })
    }

    /// Parses a JSON array of recipe records
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<RecipeRecord> = serde_json::from_str(json)?;
        Self::from_records(records)
    }

    /// Loads the catalog shipped with the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        let catalog = Self::from_json(BUILTIN_RECIPES)?;

        tracing::info!(
            recipes = catalog.len(),
            ingredients = catalog.all_ingredients.len(),
            "Loaded built-in recipe catalog"
        );

        Ok(catalog)
    }

    /// All recipes in catalog order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Every known ingredient, normalized, deduplicated and sorted
    pub fn all_ingredients(&self) -> &[String] {
        &self.all_ingredients
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Autosuggestions for a partially typed ingredient
    ///
    /// Returns known ingredients containing `query`, skipping any already
    /// selected, in alphabetical order. A blank query suggests nothing.
    pub fn suggest_ingredients<S: AsRef<str>>(
        &self,
        query: &str,
        already_selected: &[S],
        limit: usize,
    ) -> Vec<&str> {
        let query = normalize_ingredient(query);
        if query.is_empty() {
            return Vec::new();
        }

        let selected: HashSet<String> = already_selected
            .iter()
            .map(|name| normalize_ingredient(name.as_ref()))
            .collect();

        self.all_ingredients
            .iter()
            .filter(|name| name.contains(&query) && !selected.contains(name.as_str()))
            .map(String::as_str)
            .take(limit)
            .collect()
    }
}
