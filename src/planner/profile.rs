use serde::{Deserialize, Serialize};

use crate::calories::estimator::round_to;
use crate::error::PlanError;
use crate::substitution::normalize_terms;

/// Activity level for the daily energy multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
}

/// Ordered multiplier table; `Sedentary` doubles as the fallback.
const ACTIVITY_MULTIPLIERS: &[(ActivityLevel, &str, f64)] = &[
    (ActivityLevel::Sedentary, "sedentary", 1.2),
    (ActivityLevel::Light, "light", 1.375),
    (ActivityLevel::Moderate, "moderate", 1.55),
    (ActivityLevel::Active, "active", 1.725),
];

impl ActivityLevel {
    /// Case-insensitive lookup. Unknown labels resolve to `Sedentary`;
    /// the second value tells the caller the fallback was used.
    pub fn resolve(label: &str) -> (Self, bool) {
        let lowered = label.trim().to_lowercase();
        ACTIVITY_MULTIPLIERS
            .iter()
            .find(|(_, name, _)| *name == lowered)
            .map_or((ActivityLevel::Sedentary, true), |(level, _, _)| (*level, false))
    }

    pub fn multiplier(self) -> f64 {
        ACTIVITY_MULTIPLIERS
            .iter()
            .find(|(level, _, _)| *level == self)
            .map_or(1.2, |(_, _, m)| *m)
    }

    pub fn label(self) -> &'static str {
        ACTIVITY_MULTIPLIERS
            .iter()
            .find(|(level, _, _)| *level == self)
            .map_or("sedentary", |(_, name, _)| *name)
    }
}

/// Biometrics and preferences of the person the plan is for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub age: u32,
    /// Kilograms.
    pub weight: f64,
    /// Centimetres.
    pub height: f64,
    #[serde(default = "default_activity_level")]
    pub activity_level: String,
    #[serde(default)]
    pub allergies: Vec<String>,
    #[serde(default)]
    pub cuisine: Option<String>,
}

fn default_activity_level() -> String {
    "sedentary".to_string()
}

impl UserProfile {
    /// Allergies lowercased and trimmed, blanks removed, order kept.
    pub fn normalized_allergies(&self) -> Vec<String> {
        normalize_terms(&self.allergies)
    }

    /// Lowercased cuisine filter; blank means "no filter".
    pub fn cuisine_filter(&self) -> Option<String> {
        self.cuisine
            .as_deref()
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty())
    }
}

/// BMI and daily calorie target derived from a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalorieTarget {
    /// Rounded to 2 decimals.
    pub bmi: f64,
    pub bmr: f64,
    pub activity_level: ActivityLevel,
    /// True when the requested activity label was not recognised.
    pub activity_level_defaulted: bool,
    pub multiplier: f64,
    pub daily_calorie_target: i64,
}

fn require_positive(field: &'static str, value: f64) -> Result<f64, PlanError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlanError::InvalidProfile { field, value })
    }
}

/// Mifflin-St Jeor BMR (male coefficients, sex is not modelled) times the
/// activity multiplier, rounded to the nearest calorie.
///
/// # Arguments
/// * `age`: years, must be > 0.
/// * `weight_kg`, `height_cm`: must be finite and > 0.
/// * `activity_level`: `sedentary|light|moderate|active`, any case. Anything
///   else falls back to the sedentary multiplier and is flagged in the result.
///
/// # Returns
/// A `CalorieTarget`, or `PlanError::InvalidProfile` before any arithmetic
/// is attempted on unusable biometrics.
pub fn compute_target(
    age: u32,
    weight_kg: f64,
    height_cm: f64,
    activity_level: &str,
) -> Result<CalorieTarget, PlanError> {
    if age == 0 {
        return Err(PlanError::InvalidProfile { field: "age", value: 0.0 });
    }
    let weight = require_positive("weight", weight_kg)?;
    let height = require_positive("height", height_cm)?;

    let height_m = height / 100.0;
    let bmi = weight / (height_m * height_m);
    let bmr = 10.0 * weight + 6.25 * height - 5.0 * f64::from(age) + 5.0;

    let (level, defaulted) = ActivityLevel::resolve(activity_level);
    if defaulted {
        tracing::warn!(
            requested = activity_level,
            "unrecognised activity level, using the sedentary multiplier"
        );
    }
    let multiplier = level.multiplier();
    let daily_calorie_target = (bmr * multiplier).round_ties_even() as i64;

    Ok(CalorieTarget {
        bmi: round_to(bmi, 2),
        bmr,
        activity_level: level,
        activity_level_defaulted: defaulted,
        multiplier,
        daily_calorie_target,
    })
}

pub fn compute_profile_target(profile: &UserProfile) -> Result<CalorieTarget, PlanError> {
    compute_target(profile.age, profile.weight, profile.height, &profile.activity_level)
}
