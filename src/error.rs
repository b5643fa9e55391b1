use thiserror::Error;

/// Errors raised by the meal plan engine.
///
/// An empty plan is not an error: when nothing fits the calorie budget or the
/// cuisine filter, the engine returns a plan with `count == 0`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// A biometric value that the BMI/BMR formulas cannot work with.
    #[error("Invalid profile: {field} must be a positive number (got {value})")]
    InvalidProfile { field: &'static str, value: f64 },

    /// The calorie estimator or the substitution table could not answer.
    #[error("Dependency unavailable: {dependency}: {reason}")]
    DependencyUnavailable {
        dependency: &'static str,
        reason: String,
    },

    /// The recipe catalog could not be interpreted.
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl PlanError {
    pub fn estimator_unavailable(reason: impl Into<String>) -> Self {
        PlanError::DependencyUnavailable {
            dependency: "calorie estimator",
            reason: reason.into(),
        }
    }

    pub fn substitutions_unavailable(reason: impl Into<String>) -> Self {
        PlanError::DependencyUnavailable {
            dependency: "substitution table",
            reason: reason.into(),
        }
    }
}
