//! Planner configuration from environment variables (a `.env` file is loaded first by the binary).

use std::env;
use std::path::PathBuf;
use thiserror::Error;

use crate::planner::DEFAULT_TOLERANCE;

pub const RECIPES_ENV_VAR: &str = "MEAL_PLANNER_RECIPES";
pub const SUBSTITUTIONS_ENV_VAR: &str = "MEAL_PLANNER_SUBSTITUTIONS";
pub const CALORIE_TABLE_ENV_VAR: &str = "MEAL_PLANNER_CALORIE_TABLE";
pub const TOLERANCE_ENV_VAR: &str = "MEAL_PLANNER_TOLERANCE";
pub const UNMATCHED_KCAL_ENV_VAR: &str = "MEAL_PLANNER_UNMATCHED_KCAL";
pub const LOG_ENV_VAR: &str = "MEAL_PLANNER_LOG";

pub const DEFAULT_RECIPES_PATH: &str = "data/recipes.json";
pub const DEFAULT_SUBSTITUTIONS_PATH: &str = "data/substitutions.json";
pub const DEFAULT_CALORIE_TABLE_PATH: &str = "data/calorie_table.csv";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Environment variable {var} must be a non-negative number (got '{value}')")]
    InvalidNumber { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub recipes_path: PathBuf,
    pub substitutions_path: PathBuf,
    pub calorie_table_path: PathBuf,
    pub tolerance: f64,
    /// Calories counted for an ingredient the calorie table does not know.
    pub unmatched_kcal: f64,
    pub log_filter: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            recipes_path: PathBuf::from(DEFAULT_RECIPES_PATH),
            substitutions_path: PathBuf::from(DEFAULT_SUBSTITUTIONS_PATH),
            calorie_table_path: PathBuf::from(DEFAULT_CALORIE_TABLE_PATH),
            tolerance: DEFAULT_TOLERANCE,
            unmatched_kcal: 0.0,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl PlannerConfig {
    /// Load configuration from the process environment.
    ///
    /// Unset variables keep their defaults; set-but-invalid numbers are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`PlannerConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let path = |var: &str, default: PathBuf| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map_or(default, PathBuf::from)
        };

        Ok(Self {
            recipes_path: path(RECIPES_ENV_VAR, defaults.recipes_path),
            substitutions_path: path(SUBSTITUTIONS_ENV_VAR, defaults.substitutions_path),
            calorie_table_path: path(CALORIE_TABLE_ENV_VAR, defaults.calorie_table_path),
            tolerance: parse_number(TOLERANCE_ENV_VAR, lookup(TOLERANCE_ENV_VAR), defaults.tolerance)?,
            unmatched_kcal: parse_number(
                UNMATCHED_KCAL_ENV_VAR,
                lookup(UNMATCHED_KCAL_ENV_VAR),
                defaults.unmatched_kcal,
            )?,
            log_filter: lookup(LOG_ENV_VAR)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_number(var: &'static str, raw: Option<String>, default: f64) -> Result<f64, ConfigError> {
    let Some(raw) = raw.filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(ConfigError::InvalidNumber { var, value: raw }),
    }
}
