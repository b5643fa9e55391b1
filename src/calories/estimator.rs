use anyhow::Result;
use std::path::Path;

use crate::calories::data_loader::{load_calorie_table, CalorieEntry};
use crate::error::PlanError;

/// Estimates the calories of a recipe from its ingredient list.
///
/// Implementations must be deterministic for a fixed ingredient list: the
/// selector sorts and admits recipes on these values, and the early
/// termination check relies on them not moving between calls.
pub trait CalorieEstimator: Send + Sync {
    fn estimate(&self, ingredients: &[String]) -> Result<f64, PlanError>;
}

/// Keyword lookup over a calorie reference table.
///
/// Each ingredient contributes the kcal of the longest table keyword it
/// contains (case-insensitive, first table row wins on equal length), or
/// `unmatched_kcal` when no keyword matches. The total is rounded to 2 decimals.
#[derive(Debug, Clone)]
pub struct TableCalorieEstimator {
    entries: Vec<CalorieEntry>,
    unmatched_kcal: f64,
}

impl TableCalorieEstimator {
    pub fn new(entries: Vec<CalorieEntry>, unmatched_kcal: f64) -> Self {
        Self {
            entries,
            unmatched_kcal,
        }
    }

    pub fn from_csv(csv_path: &Path, unmatched_kcal: f64) -> Result<Self> {
        let entries = load_calorie_table(csv_path)?;
        Ok(Self::new(entries, unmatched_kcal))
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn best_match(&self, ingredient: &str) -> Option<&CalorieEntry> {
        let lowered = ingredient.to_lowercase();
        let mut best: Option<&CalorieEntry> = None;
        for entry in &self.entries {
            if !lowered.contains(entry.keyword.as_str()) {
                continue;
            }
            // Strictly longer only, so earlier rows keep ties.
            if best.map_or(true, |b| entry.keyword.len() > b.keyword.len()) {
                best = Some(entry);
            }
        }
        best
    }

    pub fn ingredient_kcal(&self, ingredient: &str) -> f64 {
        self.best_match(ingredient)
            .map_or(self.unmatched_kcal, |entry| entry.kcal)
    }
}

impl CalorieEstimator for TableCalorieEstimator {
    fn estimate(&self, ingredients: &[String]) -> Result<f64, PlanError> {
        if self.entries.is_empty() {
            return Err(PlanError::estimator_unavailable("calorie table is empty"));
        }
        let total: f64 = ingredients.iter().map(|ing| self.ingredient_kcal(ing)).sum();
        Ok(round_to(total, 2))
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
