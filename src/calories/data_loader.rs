use anyhow::{Context, Result};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;

// Expected column headers
const INGREDIENT_COL: &str = "Ingredient";
const KCAL_COL: &str = "kcal";

/// One row of the calorie reference table: a lowercase keyword and the
/// calories it contributes to a recipe when an ingredient mentions it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CalorieEntry {
    pub keyword: String,
    pub kcal: f64,
    pub original_row_index: usize,
}

fn parse_optional_f64(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn load_calorie_table(csv_path: &Path) -> Result<Vec<CalorieEntry>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Calorie table CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open calorie table CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();
    let keyword_idx = headers
        .iter()
        .position(|h| h.trim() == INGREDIENT_COL)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", INGREDIENT_COL))?;
    let kcal_idx = headers
        .iter()
        .position(|h| h.trim() == KCAL_COL)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", KCAL_COL))?;

    let mut entries = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let keyword = record.get(keyword_idx).unwrap_or_default().trim().to_lowercase();
        if keyword.is_empty() {
            continue;
        }
        // Rows without a usable calorie value carry no information for the estimator.
        let Some(kcal) = record.get(kcal_idx).and_then(parse_optional_f64) else {
            tracing::debug!(row_index, keyword = %keyword, "skipping calorie row without a numeric kcal value");
            continue;
        };

        entries.push(CalorieEntry {
            keyword,
            kcal,
            original_row_index: row_index,
        });
    }

    if entries.is_empty() {
        return Err(anyhow::anyhow!("No valid calorie data loaded from {:?}", csv_path));
    }

    tracing::info!(entries = entries.len(), path = %csv_path.display(), "calorie table loaded");
    Ok(entries)
}
