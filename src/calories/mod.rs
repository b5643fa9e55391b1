pub mod data_loader;
pub mod estimator;

pub use data_loader::{load_calorie_table, CalorieEntry};
pub use estimator::{CalorieEstimator, TableCalorieEstimator};
