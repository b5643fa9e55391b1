pub mod calories;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod planner;
pub mod recipe_catalog;
pub mod recipe_search;
pub mod substitution;
