pub mod courses;
pub mod profile;
pub mod selector;
pub mod suggest;

use serde::{Deserialize, Serialize};

use crate::calories::estimator::round_to;
use crate::calories::CalorieEstimator;
use crate::error::PlanError;
use crate::recipe_catalog::RecipeCatalog;
use crate::substitution::SubstitutionLookup;

pub use courses::{bucket_by_course, classify_course, MealSlot, MealsByCourse};
pub use profile::{compute_profile_target, compute_target, ActivityLevel, CalorieTarget, UserProfile};
pub use selector::{select_recipes, SelectedRecipe, SelectionRequest, SelectionResult, DEFAULT_TOLERANCE};
pub use suggest::suggest_meals;

/// Read-only collaborators of a plan run, borrowed for the whole call.
#[derive(Clone, Copy)]
pub struct PlannerDeps<'a> {
    pub catalog: &'a RecipeCatalog,
    pub estimator: &'a dyn CalorieEstimator,
    pub substitutions: &'a dyn SubstitutionLookup,
}

/// The daily plan as handed to callers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MealPlan {
    pub age: u32,
    pub weight: f64,
    pub height: f64,
    pub bmi: f64,
    pub activity_level: ActivityLevel,
    pub activity_level_defaulted: bool,
    pub daily_calorie_target: i64,
    pub count: usize,
    /// Rounded to 2 decimals.
    pub total_calories: f64,
    /// `daily_calorie_target - total_calories`, rounded to 2 decimals.
    pub difference: f64,
    pub target_met: bool,
    /// The cuisine filter in use, or "all".
    pub cuisine: String,
    pub meals_by_course: MealsByCourse,
}

/// Profile calculator, then greedy selection, then course bucketing.
pub fn generate_meal_plan(
    profile: &UserProfile,
    tolerance: f64,
    deps: PlannerDeps<'_>,
) -> Result<MealPlan, PlanError> {
    let target = compute_profile_target(profile)?;
    let allergies = profile.normalized_allergies();
    let cuisine = profile.cuisine_filter();

    let request = SelectionRequest {
        target: target.daily_calorie_target as f64,
        tolerance,
        allergies: &allergies,
        cuisine: cuisine.as_deref(),
    };
    let selection = select_recipes(deps.catalog, &request, deps.estimator, deps.substitutions)?;

    tracing::info!(
        target = target.daily_calorie_target,
        selected = selection.count,
        total_calories = selection.total_calories,
        target_met = selection.target_met,
        "meal plan generated"
    );

    Ok(MealPlan {
        age: profile.age,
        weight: profile.weight,
        height: profile.height,
        bmi: target.bmi,
        activity_level: target.activity_level,
        activity_level_defaulted: target.activity_level_defaulted,
        daily_calorie_target: target.daily_calorie_target,
        count: selection.count,
        total_calories: round_to(selection.total_calories, 2),
        difference: round_to(selection.difference, 2),
        target_met: selection.target_met,
        cuisine: cuisine.unwrap_or_else(|| "all".to_string()),
        meals_by_course: bucket_by_course(selection.recipes),
    })
}
