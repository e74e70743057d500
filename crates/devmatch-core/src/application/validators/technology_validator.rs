//! Technology validation

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::domain::technologies::Technology;

use super::{optional_text, required_text};

pub const NAME_MAX: usize = 100;
pub const CATEGORY_MAX: usize = 50;

/// Validator for technologies
pub struct TechnologyValidator;

impl TechnologyValidator {
    /// Required, 1 to 100 characters
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        required_text("name", name, 1, NAME_MAX)
    }

    /// Optional, at most 50 characters
    pub fn validate_category(category: Option<&str>) -> Result<(), ValidationError> {
        optional_text("category", category, CATEGORY_MAX)
    }

    /// Validate all technology fields at once
    pub fn validate(technology: &Technology) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Self::validate_name(technology.name()));
        errors.check(Self::validate_category(technology.category()));
        errors.into_result()
    }
}
