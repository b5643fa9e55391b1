use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;
use tokio::fs;

use crate::error::PlanError;

/// Diet metadata as it appears in recipe datasets: either a single label
/// ("Vegetarian") or a list of tags (["vegetarian", "high-protein"]).
/// The selector never looks at it; it is passed through to the plan.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum Diet {
    Tags(Vec<String>),
    Label(String),
}

impl Default for Diet {
    fn default() -> Self {
        Diet::Label(String::new())
    }
}

impl Diet {
    /// Lowercased, trimmed, non-empty tags.
    pub fn tags(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Diet::Tags(tags) => tags.iter().map(String::as_str).collect(),
            Diet::Label(label) => vec![label.as_str()],
        };
        raw.into_iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// One catalog entry. Every field is optional in the source data:
/// strings default to "", lists to empty, diet to an empty label.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Recipe {
    #[serde(default, alias = "title", deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "ingredient_list")]
    pub ingredients: Vec<String>,
    #[serde(default, alias = "instructions", deserialize_with = "lenient_list")]
    pub steps: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prep_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cook_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub total_time: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cuisine: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub course: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub diet: Diet,
}

// Scraped datasets store times as "10 mins", as bare numbers, or as null.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    list_from_value(Value::deserialize(deserializer)?)
}

fn list_from_value<E: serde::de::Error>(value: Value) -> Result<Vec<String>, E> {
    Ok(match value {
        Value::Null => Vec::new(),
        Value::String(s) if s.trim().is_empty() => Vec::new(),
        Value::String(s) => vec![s],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        Value::Object(_) => return Err(E::custom("expected a string or a list of strings")),
        other => vec![other.to_string()],
    })
}

// A flat "a, b, c" ingredient string is split on commas; list entries are kept whole.
fn ingredient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()),
        other => list_from_value(other),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read-only recipe catalog, kept in source order.
#[derive(Debug, Clone, Default)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
}

impl RecipeCatalog {
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    /// Parses either a JSON object keyed by recipe name, or a JSON array of
    /// records that carry their own `name`.
    pub fn from_json_str(content: &str) -> Result<Self, PlanError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| PlanError::Catalog(format!("invalid JSON: {e}")))?;

        let recipes = match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(name, record)| {
                    let mut recipe: Recipe = serde_json::from_value(record).map_err(|e| {
                        PlanError::Catalog(format!("recipe '{name}' is malformed: {e}"))
                    })?;
                    recipe.name = name;
                    Ok(recipe)
                })
                .collect::<Result<Vec<_>, PlanError>>()?,
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(idx, record)| {
                    serde_json::from_value::<Recipe>(record).map_err(|e| {
                        PlanError::Catalog(format!("recipe at index {idx} is malformed: {e}"))
                    })
                })
                .collect::<Result<Vec<_>, PlanError>>()?,
            _ => {
                return Err(PlanError::Catalog(
                    "expected a JSON object or array of recipes".to_string(),
                ))
            }
        };

        Ok(Self { recipes })
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Sorted, de-duplicated, trimmed course labels; blank courses are left out.
    pub fn available_courses(&self) -> Vec<String> {
        self.recipes
            .iter()
            .map(|r| r.course.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

pub async fn load_catalog(path: &Path) -> Result<RecipeCatalog> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipe catalog at {:?}", path))?;
    let catalog = RecipeCatalog::from_json_str(&content)
        .with_context(|| format!("Failed to parse recipe catalog at {:?}", path))?;
    tracing::info!(recipes = catalog.len(), path = %path.display(), "recipe catalog loaded");
    Ok(catalog)
}
