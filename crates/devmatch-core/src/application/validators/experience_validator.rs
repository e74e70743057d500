//! Experience validation

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::domain::developers::Experience;

use super::optional_text;

pub const CATEGORY_MAX: usize = 100;

/// Validator for experience records
pub struct ExperienceValidator;

impl ExperienceValidator {
    /// Required, unbounded text
    pub fn validate_description(description: &str) -> Result<(), ValidationError> {
        if description.trim().is_empty() {
            return Err(ValidationError::required("description"));
        }
        Ok(())
    }

    /// Optional, at most 100 characters
    pub fn validate_category(category: Option<&str>) -> Result<(), ValidationError> {
        optional_text("category", category, CATEGORY_MAX)
    }

    pub fn validate(experience: &Experience) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Self::validate_description(experience.description()));
        errors.check(Self::validate_category(experience.category()));
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_description() {
        assert!(ExperienceValidator::validate_description("Barista for two years").is_ok());
        assert!(ExperienceValidator::validate_description("").is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(ExperienceValidator::validate_category(None).is_ok());
        assert!(ExperienceValidator::validate_category(Some("work")).is_ok());
        assert!(ExperienceValidator::validate_category(Some(&"w".repeat(101))).is_err());
    }
}
