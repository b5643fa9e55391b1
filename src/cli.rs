use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily meal plans from a recipe catalog", long_about = None)]
pub struct Cli {
    /// Recipe catalog JSON (overrides MEAL_PLANNER_RECIPES)
    #[arg(long, global = true)]
    pub recipes: Option<PathBuf>,

    /// Allergen substitution JSON (overrides MEAL_PLANNER_SUBSTITUTIONS)
    #[arg(long, global = true)]
    pub substitutions: Option<PathBuf>,

    /// Calorie reference CSV (overrides MEAL_PLANNER_CALORIE_TABLE)
    #[arg(long, global = true)]
    pub calorie_table: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Biometrics shared by `plan` and `profile`.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Age in years
    #[arg(long)]
    pub age: u32,

    /// Weight in kg
    #[arg(long)]
    pub weight: f64,

    /// Height in cm
    #[arg(long)]
    pub height: f64,

    /// sedentary, light, moderate or active (anything else counts as sedentary)
    #[arg(long, default_value = "sedentary")]
    pub activity_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a daily meal plan close to the calorie target
    Plan {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Allergies, comma separated (e.g. milk,peanut)
        #[arg(long, value_delimiter = ',')]
        allergies: Vec<String>,

        /// Only use recipes of this cuisine
        #[arg(long)]
        cuisine: Option<String>,

        /// Allowed deviation from the target in calories (overrides MEAL_PLANNER_TOLERANCE)
        #[arg(long)]
        tolerance: Option<f64>,
    },
    /// Show BMI and daily calorie target only
    Profile {
        #[command(flatten)]
        profile: ProfileArgs,
    },
    /// Find recipes by dish name
    Search {
        dish_name: String,

        /// Require the whole name to match
        #[arg(long)]
        exact: bool,
    },
    /// Suggest recipes matching diet preferences
    Suggest {
        /// Diet tags, comma separated (e.g. vegetarian,high-protein)
        #[arg(long, value_delimiter = ',', required = true)]
        preferences: Vec<String>,

        /// Allergies, comma separated; recipes mentioning them are left out
        #[arg(long, value_delimiter = ',')]
        allergies: Vec<String>,

        /// Upper bound on estimated calories per meal
        #[arg(long)]
        max_calories: Option<f64>,
    },
    /// List substitutes for each allergy
    Substitutes {
        #[arg(required = true)]
        allergies: Vec<String>,
    },
    /// Show how an ingredient list would be served to someone with these allergies
    Annotate {
        /// Allergies, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        allergies: Vec<String>,

        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// Estimate calories of an ingredient list
    Estimate {
        #[arg(required = true)]
        ingredients: Vec<String>,
    },
    /// List the distinct courses in the catalog
    Courses,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
