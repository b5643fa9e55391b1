use crate::calories::CalorieEstimator;
use crate::error::PlanError;
use crate::recipe_catalog::RecipeCatalog;
use crate::recipe_search::RecipeMatch;
use crate::substitution::normalize_terms;

/// Meal suggestions by diet preference.
///
/// Keeps, in catalog order, every recipe that
/// - carries at least one of `preferences` among its diet tags (case-insensitive),
/// - mentions none of `allergies` anywhere in its ingredient text,
/// - is estimated at or under `max_calories`, when one is given.
///
/// Unlike the planner, allergen-bearing recipes are dropped here rather than
/// substituted. An empty result is not an error.
pub fn suggest_meals<S: AsRef<str>>(
    catalog: &RecipeCatalog,
    preferences: &[S],
    allergies: &[S],
    max_calories: Option<f64>,
    estimator: &dyn CalorieEstimator,
) -> Result<Vec<RecipeMatch>, PlanError> {
    let preferences = normalize_terms(preferences);
    let allergies = normalize_terms(allergies);

    let mut suggestions = Vec::new();
    for recipe in catalog.recipes() {
        let tags = recipe.diet.tags();
        if !preferences.iter().any(|p| tags.contains(p)) {
            continue;
        }

        let ingredient_text = recipe.ingredients.join(" ").to_lowercase();
        if allergies.iter().any(|a| ingredient_text.contains(a.as_str())) {
            continue;
        }

        let candidate = RecipeMatch::estimate(recipe, estimator)?;
        if let Some(max) = max_calories {
            if candidate.estimated_calories > max {
                continue;
            }
        }
        suggestions.push(candidate);
    }

    tracing::debug!(suggestions = suggestions.len(), "meal suggestions computed");
    Ok(suggestions)
}
