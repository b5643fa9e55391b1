use meal_planner::calories::{CalorieEstimator, TableCalorieEstimator};
use meal_planner::error::PlanError;
use meal_planner::planner::{
    bucket_by_course, generate_meal_plan, select_recipes, PlannerDeps, SelectionRequest, UserProfile,
    DEFAULT_TOLERANCE,
};
use meal_planner::recipe_catalog::{load_catalog, Recipe, RecipeCatalog};
use meal_planner::substitution::{load_substitution_table, SubstitutionTable, NO_SUBSTITUTE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

const CALORIE_CSV: &str = "Ingredient,kcal
rice,300
basmati rice,400
chicken,500
milk,150
peanut,200
oats,250
";

const SUBSTITUTIONS_JSON: &str = r#"{"Milk": ["almond milk", "oat milk"], "peanut": []}"#;

const RECIPES_JSON: &str = r#"{
  "Chicken Biryani": {
    "ingredients": ["basmati rice", "chicken"],
    "steps": ["Layer and cook"],
    "cuisine": "Indian",
    "course": "Dinner",
    "diet": ["high-protein"]
  },
  "Kheer": {
    "ingredients": ["rice"],
    "cuisine": "Indian",
    "course": "Dessert",
    "diet": "vegetarian"
  },
  "Oats Bowl": {
    "ingredients": ["oats", "milk", "peanut"],
    "cuisine": "American",
    "course": "Breakfast",
    "diet": ["vegetarian"]
  },
  "Chicken Rice": {
    "ingredients": "chicken, rice",
    "cuisine": "Indian",
    "course": "Lunch",
    "diet": null,
    "cook_time": 20
  }
}"#;

fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file
}

struct Fixtures {
    catalog: RecipeCatalog,
    substitutions: SubstitutionTable,
    estimator: TableCalorieEstimator,
}

impl Fixtures {
    fn deps(&self) -> PlannerDeps<'_> {
        PlannerDeps {
            catalog: &self.catalog,
            estimator: &self.estimator,
            substitutions: &self.substitutions,
        }
    }
}

async fn load_fixtures() -> Fixtures {
    let recipes = temp_file(RECIPES_JSON);
    let substitutions = temp_file(SUBSTITUTIONS_JSON);
    let calories = temp_file(CALORIE_CSV);

    Fixtures {
        catalog: load_catalog(recipes.path()).await.unwrap(),
        substitutions: load_substitution_table(substitutions.path()).await.unwrap(),
        estimator: TableCalorieEstimator::from_csv(calories.path(), 0.0).unwrap(),
    }
}

fn profile(allergies: &[&str], cuisine: Option<&str>) -> UserProfile {
    UserProfile {
        age: 30,
        weight: 70.0,
        height: 175.0,
        activity_level: "moderate".to_string(),
        allergies: allergies.iter().map(|s| s.to_string()).collect(),
        cuisine: cuisine.map(str::to_string),
    }
}

#[tokio::test]
async fn test_full_plan_from_files() {
    let fixtures = load_fixtures().await;
    let plan = generate_meal_plan(&profile(&["milk"], None), DEFAULT_TOLERANCE, fixtures.deps()).unwrap();

    // 900 + 800 + 600 + 300 = 2600, inside [2456, 2656].
    assert_eq!(plan.daily_calorie_target, 2556);
    assert_eq!(plan.bmi, 22.86);
    assert_eq!(plan.count, 4);
    assert_eq!(plan.total_calories, 2600.0);
    assert_eq!(plan.difference, -44.0);
    assert!(plan.target_met);
    assert_eq!(plan.cuisine, "all");

    let meals = &plan.meals_by_course;
    assert_eq!(meals.dinner[0].name, "Chicken Biryani");
    assert_eq!(meals.lunch[0].name, "Chicken Rice");
    assert_eq!(meals.lunch[0].cook_time, "20");
    assert_eq!(meals.other[0].name, "Kheer");

    let oats = &meals.breakfast[0];
    assert_eq!(oats.name, "Oats Bowl");
    assert_eq!(oats.estimated_calories, 600.0);
    assert_eq!(oats.ingredients[1].original, "milk");
    assert_eq!(oats.ingredients[1].substitution, "almond milk");
    assert!(oats.ingredients[1].allergen_detected);
    assert!(!oats.ingredients[0].allergen_detected);
}

#[tokio::test]
async fn test_plan_with_empty_substitute_list_and_cuisine_filter() {
    let fixtures = load_fixtures().await;
    let plan = generate_meal_plan(&profile(&["Peanut"], Some("INDIAN")), DEFAULT_TOLERANCE, fixtures.deps()).unwrap();

    // Only Indian recipes: 900 + 800 + 300 = 2000, short of the band.
    assert_eq!(plan.cuisine, "indian");
    assert_eq!(plan.count, 3);
    assert_eq!(plan.total_calories, 2000.0);
    assert_eq!(plan.difference, 556.0);
    assert!(!plan.target_met);
    assert!(plan.meals_by_course.breakfast.is_empty());

    let all = generate_meal_plan(&profile(&["peanut"], None), DEFAULT_TOLERANCE, fixtures.deps()).unwrap();
    let peanut = &all.meals_by_course.breakfast[0].ingredients[2];
    assert_eq!(peanut.substitution, NO_SUBSTITUTE);
}

#[tokio::test]
async fn test_unknown_cuisine_gives_empty_plan() {
    let fixtures = load_fixtures().await;
    let plan = generate_meal_plan(&profile(&[], Some("Thai")), DEFAULT_TOLERANCE, fixtures.deps()).unwrap();

    assert_eq!(plan.count, 0);
    assert_eq!(plan.total_calories, 0.0);
    assert_eq!(plan.difference, 2556.0);
    assert!(!plan.target_met);
    assert!(plan.meals_by_course.is_empty());
}

#[tokio::test]
async fn test_invalid_profile_is_rejected() {
    let fixtures = load_fixtures().await;
    let mut bad = profile(&[], None);
    bad.weight = -70.0;
    let err = generate_meal_plan(&bad, DEFAULT_TOLERANCE, fixtures.deps()).unwrap_err();
    assert!(matches!(err, PlanError::InvalidProfile { field: "weight", .. }));
}

#[test]
fn test_profile_deserializes_with_defaults() {
    let profile: UserProfile = serde_json::from_str(r#"{"age": 30, "weight": 70, "height": 175}"#).unwrap();
    assert_eq!(profile.activity_level, "sedentary");
    assert!(profile.allergies.is_empty());
    assert_eq!(profile.cuisine, None);
}

/// Each recipe's single ingredient is its calorie count, e.g. "640".
struct LiteralEstimator;

impl CalorieEstimator for LiteralEstimator {
    fn estimate(&self, ingredients: &[String]) -> Result<f64, PlanError> {
        Ok(ingredients.iter().filter_map(|i| i.parse::<f64>().ok()).sum())
    }
}

const CUISINES: [&str; 3] = ["Indian", "Thai", "Italian"];
const COURSES: [&str; 5] = ["Breakfast", "Main Course", "Dinner", "Dessert", ""];

fn random_catalog(rng: &mut StdRng) -> RecipeCatalog {
    let size = rng.gen_range(0..30);
    let recipes = (0..size)
        .map(|i| Recipe {
            name: format!("Recipe {i}"),
            ingredients: vec![rng.gen_range(50..1500).to_string()],
            cuisine: CUISINES[rng.gen_range(0..CUISINES.len())].to_string(),
            course: COURSES[rng.gen_range(0..COURSES.len())].to_string(),
            ..Default::default()
        })
        .collect();
    RecipeCatalog::from_recipes(recipes)
}

#[test]
fn test_selection_properties_on_random_catalogs() {
    let mut rng = StdRng::seed_from_u64(7);
    let substitutions = SubstitutionTable::new(HashMap::new());
    let no_allergies: Vec<String> = Vec::new();

    for _ in 0..200 {
        let catalog = random_catalog(&mut rng);
        let target = rng.gen_range(1200..3500) as f64;
        let tolerance = rng.gen_range(0..250) as f64;
        let cuisine = if rng.gen_bool(0.3) { Some("indian") } else { None };
        let request = SelectionRequest {
            target,
            tolerance,
            allergies: &no_allergies,
            cuisine,
        };

        let result = select_recipes(&catalog, &request, &LiteralEstimator, &substitutions).unwrap();
        let again = select_recipes(&catalog, &request, &LiteralEstimator, &substitutions).unwrap();
        assert_eq!(result, again, "selection must be deterministic");

        let sum: f64 = result.recipes.iter().map(|r| r.estimated_calories).sum();
        assert!((sum - result.total_calories).abs() < 1e-6);
        assert_eq!(result.count, result.recipes.len());
        assert!(result.total_calories <= target + tolerance);
        assert!((result.difference - (target - result.total_calories)).abs() < 1e-6);

        for pair in result.recipes.windows(2) {
            assert!(pair[0].estimated_calories >= pair[1].estimated_calories);
        }
        if let Some(filter) = cuisine {
            assert!(result.recipes.iter().all(|r| r.cuisine.to_lowercase() == filter));
        }

        // A partial plan means every eligible recipe left out would overshoot.
        if !result.target_met {
            for recipe in catalog.recipes() {
                let eligible = cuisine.map_or(true, |c| recipe.cuisine.to_lowercase() == c);
                let selected = result.recipes.iter().any(|r| r.name == recipe.name);
                if eligible && !selected {
                    let estimated = LiteralEstimator.estimate(&recipe.ingredients).unwrap();
                    assert!(result.total_calories + estimated > target + tolerance);
                }
            }
        }

        let count = result.count;
        let buckets = bucket_by_course(result.recipes);
        assert_eq!(buckets.len(), count);
    }
}

#[test]
fn test_selection_stops_once_inside_band() {
    let catalog = RecipeCatalog::from_recipes(
        ["900", "800", "700", "100"]
            .iter()
            .enumerate()
            .map(|(i, kcal)| Recipe {
                name: format!("R{i}"),
                ingredients: vec![kcal.to_string()],
                ..Default::default()
            })
            .collect(),
    );
    let substitutions = SubstitutionTable::new(HashMap::new());
    let request = SelectionRequest {
        target: 1700.0,
        tolerance: 50.0,
        allergies: &[],
        cuisine: None,
    };

    let result = select_recipes(&catalog, &request, &LiteralEstimator, &substitutions).unwrap();
    let names: Vec<_> = result.recipes.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["R0", "R1"]);
    assert!(result.target_met);
}
