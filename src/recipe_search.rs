use serde::{Deserialize, Serialize};

use crate::calories::CalorieEstimator;
use crate::error::PlanError;
use crate::recipe_catalog::{Recipe, RecipeCatalog};

/// A catalog recipe together with its estimated calories.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeMatch {
    pub name: String,
    pub estimated_calories: f64,
    pub recipe: Recipe,
}

impl RecipeMatch {
    pub(crate) fn estimate(recipe: &Recipe, estimator: &dyn CalorieEstimator) -> Result<Self, PlanError> {
        Ok(Self {
            name: recipe.name.clone(),
            estimated_calories: estimator.estimate(&recipe.ingredients)?,
            recipe: recipe.clone(),
        })
    }
}

/// Lowercases and keeps only ASCII letters and digits, so
/// "Masala-Dosa (Crispy)" and "masaladosacrispy" compare equal.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Finds recipes by dish name.
///
/// With `exact_match` the normalized names must be equal; otherwise the
/// normalized query only has to occur inside the normalized recipe name.
/// A query that normalizes to nothing matches nothing.
pub fn search_recipes(
    catalog: &RecipeCatalog,
    dish_name: &str,
    exact_match: bool,
    estimator: &dyn CalorieEstimator,
) -> Result<Vec<RecipeMatch>, PlanError> {
    let query = normalize_name(dish_name);
    if query.is_empty() {
        return Ok(Vec::new());
    }

    catalog
        .recipes()
        .iter()
        .filter(|recipe| {
            let name = normalize_name(&recipe.name);
            if exact_match {
                name == query
            } else {
                name.contains(&query)
            }
        })
        .map(|recipe| RecipeMatch::estimate(recipe, estimator))
        .collect()
}
