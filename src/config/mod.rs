//! Configuration module
//!
//! Loads and validates `typecycle` YAML configuration files: the phrase
//! list, tick delays, and hero line presentation.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
