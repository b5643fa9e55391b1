use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::calories::CalorieEstimator;
use crate::error::PlanError;
use crate::recipe_catalog::{Diet, Recipe, RecipeCatalog};
use crate::substitution::{annotate_ingredients, IngredientAnnotation, SubstitutionLookup};

/// Allowed deviation, in calories, from the daily target.
pub const DEFAULT_TOLERANCE: f64 = 100.0;

/// Inputs of one selection run. `allergies` must already be normalized
/// (lowercase, order kept); see `substitution::normalize_terms`.
#[derive(Debug, Clone)]
pub struct SelectionRequest<'a> {
    pub target: f64,
    pub tolerance: f64,
    pub allergies: &'a [String],
    pub cuisine: Option<&'a str>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SelectedRecipe {
    pub name: String,
    pub estimated_calories: f64,
    pub ingredients: Vec<IngredientAnnotation>,
    pub steps: Vec<String>,
    pub prep_time: String,
    pub cook_time: String,
    pub total_time: String,
    pub cuisine: String,
    pub course: String,
    pub diet: Diet,
}

impl SelectedRecipe {
    fn from_recipe(recipe: &Recipe, estimated_calories: f64, ingredients: Vec<IngredientAnnotation>) -> Self {
        Self {
            name: recipe.name.clone(),
            estimated_calories,
            ingredients,
            steps: recipe.steps.clone(),
            prep_time: recipe.prep_time.clone(),
            cook_time: recipe.cook_time.clone(),
            total_time: recipe.total_time.clone(),
            cuisine: recipe.cuisine.clone(),
            course: recipe.course.clone(),
            diet: recipe.diet.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SelectionResult {
    pub recipes: Vec<SelectedRecipe>,
    pub total_calories: f64,
    pub count: usize,
    /// `target - total_calories`.
    pub difference: f64,
    /// Whether the total ended inside `[target - tolerance, target + tolerance]`.
    /// False means the plan is a best-effort partial one.
    pub target_met: bool,
}

fn within_band(total: f64, target: f64, tolerance: f64) -> bool {
    target - tolerance <= total && total <= target + tolerance
}

/// Greedy, single-pass recipe selection toward a calorie target.
///
/// Recipes are tried from the highest estimated calories down. A recipe is
/// admitted when it keeps the running total at or under `target + tolerance`;
/// one that would overshoot is skipped for good and the pass moves on. The
/// pass stops right after an admission that brings the running total within
/// the tolerance band.
/// Allergens only change how ingredients are presented, never admission.
///
/// # Returns
/// The admitted recipes in admission order with their totals. An empty
/// selection is a valid outcome; only collaborator failures are errors.
pub fn select_recipes(
    catalog: &RecipeCatalog,
    request: &SelectionRequest<'_>,
    estimator: &dyn CalorieEstimator,
    substitutions: &dyn SubstitutionLookup,
) -> Result<SelectionResult, PlanError> {
    let SelectionRequest {
        target,
        tolerance,
        allergies,
        ..
    } = *request;
    let cuisine_filter = request
        .cuisine
        .map(str::to_lowercase)
        .filter(|c| !c.is_empty());

    let mut candidates: Vec<(&Recipe, f64)> = catalog
        .recipes()
        .iter()
        .map(|recipe| Ok((recipe, estimator.estimate(&recipe.ingredients)?)))
        .collect::<Result<_, PlanError>>()?;
    // Stable sort: equal estimates keep catalog order.
    candidates.sort_by(|a, b| b.1.total_cmp(&a.1));

    let mut selected: Vec<SelectedRecipe> = Vec::new();
    let mut used_names: HashSet<&str> = HashSet::new();
    let mut total_calories = 0.0_f64;

    for (recipe, estimated) in candidates {
        if let Some(filter) = cuisine_filter.as_deref() {
            if recipe.cuisine.to_lowercase() != filter {
                continue;
            }
        }

        if used_names.contains(recipe.name.as_str()) {
            tracing::debug!(recipe = %recipe.name, "skipping duplicate recipe name");
            continue;
        }

        // Every candidate is annotated, admitted or not.
        let ingredients = annotate_ingredients(&recipe.ingredients, allergies, substitutions)?;

        if total_calories + estimated > target + tolerance {
            tracing::debug!(
                recipe = %recipe.name,
                estimated,
                total_calories,
                "skipped recipe, would overshoot the target"
            );
            continue;
        }

        selected.push(SelectedRecipe::from_recipe(recipe, estimated, ingredients));
        used_names.insert(recipe.name.as_str());
        total_calories += estimated;
        tracing::debug!(
            recipe = %recipe.name,
            estimated,
            total_calories,
            "admitted recipe"
        );

        if within_band(total_calories, target, tolerance) {
            break;
        }
    }

    let count = selected.len();
    Ok(SelectionResult {
        recipes: selected,
        total_calories,
        count,
        difference: target - total_calories,
        target_met: within_band(total_calories, target, tolerance),
    })
}
