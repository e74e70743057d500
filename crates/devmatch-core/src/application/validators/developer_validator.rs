//! Developer validation
//!
//! Rules:
//! - name: required, 1 to 100 characters
//! - email: optional, valid email format, at most 100 characters
//! - location: optional, at most 200 characters
//! - github_profile: optional, at most 100 characters
//! - experiences: each must pass [`ExperienceValidator`]
//!
//! Email uniqueness needs the stored rows and is checked by the repository.

use validator::ValidateEmail;

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::domain::developers::Developer;
use crate::domain::projects::ExperienceLevel;

use super::{ExperienceValidator, optional_text, required_text};

pub const NAME_MAX: usize = 100;
pub const EMAIL_MAX: usize = 100;
pub const LOCATION_MAX: usize = 200;
pub const GITHUB_PROFILE_MAX: usize = 100;

/// Validator for developer profiles
pub struct DeveloperValidator;

impl DeveloperValidator {
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        required_text("name", name, 1, NAME_MAX)
    }

    pub fn validate_email(email: Option<&str>) -> Result<(), ValidationError> {
        let Some(email) = email else {
            return Ok(());
        };
        if email.chars().count() > EMAIL_MAX {
            return Err(ValidationError::length("email", 0, EMAIL_MAX));
        }
        if !email.validate_email() {
            return Err(ValidationError::email("email"));
        }
        Ok(())
    }

    pub fn validate_location(location: Option<&str>) -> Result<(), ValidationError> {
        optional_text("location", location, LOCATION_MAX)
    }

    pub fn validate_github_profile(profile: Option<&str>) -> Result<(), ValidationError> {
        optional_text("github_profile", profile, GITHUB_PROFILE_MAX)
    }

    /// Parse a free-form experience level coming from outside
    pub fn parse_experience_level(value: &str) -> Result<ExperienceLevel, ValidationError> {
        value.parse()
    }

    /// Validate all developer fields, including owned experiences
    pub fn validate(developer: &Developer) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Self::validate_name(developer.name()));
        errors.check(Self::validate_email(developer.email()));
        errors.check(Self::validate_location(developer.location()));
        errors.check(Self::validate_github_profile(developer.github_profile()));

        for experience in developer.experiences() {
            if let Err(experience_errors) = ExperienceValidator::validate(experience) {
                for mut error in experience_errors {
                    error.field = format!("experiences[{}].{}", experience.id(), error.field);
                    errors.push(error);
                }
            }
        }

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::Constraint;
    use crate::domain::developers::Experience;

    #[test]
    fn test_validate_name() {
        assert!(DeveloperValidator::validate_name("Ana").is_ok());
        assert!(DeveloperValidator::validate_name("a").is_ok());
        assert!(DeveloperValidator::validate_name("").is_err());
        assert!(DeveloperValidator::validate_name(&"a".repeat(100)).is_ok());
        assert!(DeveloperValidator::validate_name(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(DeveloperValidator::validate_email(None).is_ok());
        assert!(DeveloperValidator::validate_email(Some("ana@x.com")).is_ok());

        let err = DeveloperValidator::validate_email(Some("not-an-email")).unwrap_err();
        assert_eq!(err.constraint, Constraint::Email);

        let long = format!("{}@x.com", "a".repeat(100));
        let err = DeveloperValidator::validate_email(Some(&long)).unwrap_err();
        assert!(matches!(err.constraint, Constraint::Length { max: 100, .. }));
    }

    #[test]
    fn test_validate_optional_lengths() {
        assert!(DeveloperValidator::validate_location(Some(&"l".repeat(200))).is_ok());
        assert!(DeveloperValidator::validate_location(Some(&"l".repeat(201))).is_err());
        assert!(DeveloperValidator::validate_github_profile(Some(&"g".repeat(101))).is_err());
    }

    #[test]
    fn test_parse_experience_level() {
        assert_eq!(
            DeveloperValidator::parse_experience_level("intermediate").unwrap(),
            ExperienceLevel::Intermediate
        );
        let err = DeveloperValidator::parse_experience_level("Guru").unwrap_err();
        assert!(matches!(err.constraint, Constraint::OneOf { .. }));
    }

    #[test]
    fn test_validate_collects_every_violation() {
        let developer = Developer::new("")
            .with_email("bad")
            .with_location("l".repeat(201));

        let errors = DeveloperValidator::validate(&developer).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has("name", &Constraint::Required));
        assert!(errors.has("email", &Constraint::Email));
        assert!(errors.has("location", &Constraint::Length { min: 0, max: 0 }));
    }

    #[test]
    fn test_validate_reports_experience_fields() {
        let mut developer = Developer::new("Ana");
        developer.add_experience(Experience::new(""));

        let errors = DeveloperValidator::validate(&developer).unwrap_err();
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert!(error.field.starts_with("experiences["));
        assert!(error.field.ends_with(".description"));
    }
}
