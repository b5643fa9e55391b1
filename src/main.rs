use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;

use meal_planner::calories::{CalorieEstimator, TableCalorieEstimator};
use meal_planner::cli::{parse_args, Cli, Command, ProfileArgs};
use meal_planner::config::PlannerConfig;
use meal_planner::logging::init_logging;
use meal_planner::planner::{compute_target, generate_meal_plan, suggest_meals, PlannerDeps, UserProfile};
use meal_planner::recipe_catalog::{load_catalog, RecipeCatalog};
use meal_planner::recipe_search::search_recipes;
use meal_planner::substitution::{
    annotate_ingredients, load_substitution_table, normalize_terms, substitution_suggestions, SubstitutionTable,
};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{rendered}");
    Ok(())
}

/// Applies command line path overrides on top of the environment config.
fn resolve_config(cli: &Cli) -> Result<PlannerConfig> {
    let mut config = PlannerConfig::from_env().context("Invalid planner configuration")?;
    if let Some(path) = &cli.recipes {
        config.recipes_path = path.clone();
    }
    if let Some(path) = &cli.substitutions {
        config.substitutions_path = path.clone();
    }
    if let Some(path) = &cli.calorie_table {
        config.calorie_table_path = path.clone();
    }
    Ok(config)
}

async fn read_catalog(config: &PlannerConfig) -> Result<RecipeCatalog> {
    load_catalog(&config.recipes_path).await
}

async fn read_substitutions(config: &PlannerConfig) -> Result<SubstitutionTable> {
    load_substitution_table(&config.substitutions_path).await
}

fn read_estimator(config: &PlannerConfig) -> Result<TableCalorieEstimator> {
    TableCalorieEstimator::from_csv(&config.calorie_table_path, config.unmatched_kcal)
}

fn user_profile(args: ProfileArgs, allergies: Vec<String>, cuisine: Option<String>) -> UserProfile {
    UserProfile {
        age: args.age,
        weight: args.weight,
        height: args.height,
        activity_level: args.activity_level,
        allergies,
        cuisine,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = parse_args();
    let config = resolve_config(&cli)?;
    init_logging(&config.log_filter);

    match cli.command {
        Command::Plan {
            profile,
            allergies,
            cuisine,
            tolerance,
        } => {
            let catalog = read_catalog(&config).await?;
            let table = read_substitutions(&config).await?;
            let estimator = read_estimator(&config)?;
            let deps = PlannerDeps {
                catalog: &catalog,
                estimator: &estimator,
                substitutions: &table,
            };
            let profile = user_profile(profile, allergies, cuisine);
            let plan = generate_meal_plan(&profile, tolerance.unwrap_or(config.tolerance), deps)?;
            print_json(&plan)?;
        }
        Command::Profile { profile } => {
            let target = compute_target(profile.age, profile.weight, profile.height, &profile.activity_level)?;
            print_json(&target)?;
        }
        Command::Search { dish_name, exact } => {
            let catalog = read_catalog(&config).await?;
            let estimator = read_estimator(&config)?;
            let matches = search_recipes(&catalog, &dish_name, exact, &estimator)?;
            tracing::info!(query = %dish_name, matches = matches.len(), "search finished");
            print_json(&matches)?;
        }
        Command::Suggest {
            preferences,
            allergies,
            max_calories,
        } => {
            let catalog = read_catalog(&config).await?;
            let estimator = read_estimator(&config)?;
            let suggestions = suggest_meals(&catalog, &preferences, &allergies, max_calories, &estimator)?;
            print_json(&suggestions)?;
        }
        Command::Substitutes { allergies } => {
            let table = read_substitutions(&config).await?;
            print_json(&substitution_suggestions(&allergies, &table)?)?;
        }
        Command::Annotate { allergies, ingredients } => {
            let table = read_substitutions(&config).await?;
            let annotated = annotate_ingredients(&ingredients, &normalize_terms(&allergies), &table)?;
            print_json(&annotated)?;
        }
        Command::Estimate { ingredients } => {
            let estimator = read_estimator(&config)?;
            let per_ingredient: Vec<_> = ingredients
                .iter()
                .map(|i| json!({ "ingredient": i, "kcal": estimator.ingredient_kcal(i) }))
                .collect();
            let total = estimator.estimate(&ingredients)?;
            print_json(&json!({ "ingredients": per_ingredient, "total_kcal": total }))?;
        }
        Command::Courses => {
            let catalog = read_catalog(&config).await?;
            print_json(&catalog.available_courses())?;
        }
    }

    Ok(())
}
