use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

use crate::error::PlanError;

/// Shown in place of a substitute when the table has nothing for an allergen.
pub const NO_SUBSTITUTE: &str = "no substitute found";

/// Bulk suggestions use the capitalised form of the same message.
pub const NO_SUBSTITUTE_SUGGESTION: &str = "No substitute found";

/// Source of allergen substitutes, ordered best first.
pub trait SubstitutionLookup: Send + Sync {
    /// `allergen` is expected lowercase. `Ok(None)` means the allergen is unknown.
    fn lookup(&self, allergen: &str) -> Result<Option<&[String]>, PlanError>;
}

/// Allergen -> ordered substitutes, loaded from a JSON object.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionTable {
    substitutes: HashMap<String, Vec<String>>,
}

impl SubstitutionTable {
    pub fn new(substitutes: HashMap<String, Vec<String>>) -> Self {
        let substitutes = substitutes
            .into_iter()
            .map(|(allergen, subs)| (allergen.trim().to_lowercase(), subs))
            .collect();
        Self { substitutes }
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(content)
            .with_context(|| "Substitution table must be a JSON object of string lists")?;
        Ok(Self::new(raw))
    }

    pub fn len(&self) -> usize {
        self.substitutes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substitutes.is_empty()
    }
}

impl SubstitutionLookup for SubstitutionTable {
    fn lookup(&self, allergen: &str) -> Result<Option<&[String]>, PlanError> {
        Ok(self.substitutes.get(allergen).map(Vec::as_slice))
    }
}

pub async fn load_substitution_table(path: &Path) -> Result<SubstitutionTable> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read substitution table at {:?}", path))?;
    let table = SubstitutionTable::from_json_str(&content)
        .with_context(|| format!("Failed to parse substitution table at {:?}", path))?;
    tracing::info!(allergens = table.len(), path = %path.display(), "substitution table loaded");
    Ok(table)
}

/// An ingredient as served: either unchanged (`substitution == original`)
/// or replaced because it mentions one of the user's allergies.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientAnnotation {
    pub original: String,
    pub substitution: String,
    pub allergen_detected: bool,
}

/// Lowercases terms (allergies, diet preferences), drops blank entries and
/// keeps the caller's order. For allergies the order matters: the first one
/// matching an ingredient decides its substitute.
pub fn normalize_terms<S: AsRef<str>>(terms: &[S]) -> Vec<String> {
    terms
        .iter()
        .map(|a| a.as_ref().trim().to_lowercase())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Annotates each ingredient against `allergies` (already normalized).
///
/// The first allergy, in list order, whose text occurs in the lowercased
/// ingredient selects the substitute: the first table entry for that allergy,
/// or [`NO_SUBSTITUTE`] when the table has none.
pub fn annotate_ingredients(
    ingredients: &[String],
    allergies: &[String],
    lookup: &dyn SubstitutionLookup,
) -> Result<Vec<IngredientAnnotation>, PlanError> {
    let mut annotated = Vec::with_capacity(ingredients.len());
    for ingredient in ingredients {
        let lowered = ingredient.to_lowercase();
        let matched = allergies.iter().find(|allergen| lowered.contains(allergen.as_str()));

        let annotation = match matched {
            Some(allergen) => {
                let substitute = lookup
                    .lookup(allergen)?
                    .and_then(|subs| subs.first())
                    .map_or_else(|| NO_SUBSTITUTE.to_string(), String::clone);
                IngredientAnnotation {
                    original: ingredient.clone(),
                    substitution: substitute,
                    allergen_detected: true,
                }
            }
            None => IngredientAnnotation {
                original: ingredient.clone(),
                substitution: ingredient.clone(),
                allergen_detected: false,
            },
        };
        annotated.push(annotation);
    }
    Ok(annotated)
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SubstitutionSuggestion {
    pub allergen: String,
    pub substitutes: Vec<String>,
}

/// Full substitute lists for each requested allergy, in request order.
/// The allergen is reported as given; the lookup uses its lowercase form.
pub fn substitution_suggestions<S: AsRef<str>>(
    allergies: &[S],
    lookup: &dyn SubstitutionLookup,
) -> Result<Vec<SubstitutionSuggestion>, PlanError> {
    allergies
        .iter()
        .map(|allergen| {
            let allergen = allergen.as_ref();
            let substitutes = match lookup.lookup(&allergen.trim().to_lowercase())? {
                Some(subs) if !subs.is_empty() => subs.to_vec(),
                _ => vec![NO_SUBSTITUTE_SUGGESTION.to_string()],
            };
            Ok(SubstitutionSuggestion {
                allergen: allergen.to_string(),
                substitutes,
            })
        })
        .collect()
}
