//! Project validation
//!
//! Validates project fields before persistence. Experience level, project
//! type, and status are closed enums, so only the free-text fields and the
//! parsing of outside strings need checks here.

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::domain::projects::{ExperienceLevel, Project, ProjectStatus, ProjectType};

use super::required_text;

pub const NAME_MAX: usize = 200;

/// Validator for project postings
pub struct ProjectValidator;

impl ProjectValidator {
    /// Required, 1 to 200 characters
    pub fn validate_name(name: &str) -> Result<(), ValidationError> {
        required_text("name", name, 1, NAME_MAX)
    }

    /// Required, unbounded text
    pub fn validate_description(description: &str) -> Result<(), ValidationError> {
        if description.trim().is_empty() {
            return Err(ValidationError::required("description"));
        }
        Ok(())
    }

    pub fn parse_experience_level(value: &str) -> Result<ExperienceLevel, ValidationError> {
        value.parse()
    }

    pub fn parse_project_type(value: &str) -> Result<ProjectType, ValidationError> {
        value.parse()
    }

    pub fn parse_status(value: &str) -> Result<ProjectStatus, ValidationError> {
        value.parse()
    }

    /// Validate all project fields at once
    pub fn validate(project: &Project) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Self::validate_name(project.name()));
        errors.check(Self::validate_description(project.description()));
        errors.into_result()
    }

    /// Parse and validate raw input for a new project in one pass
    pub fn parse_create(
        name: &str,
        description: &str,
        experience_level: &str,
        project_type: &str,
    ) -> Result<(ExperienceLevel, ProjectType), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(Self::validate_name(name));
        errors.check(Self::validate_description(description));

        let level = Self::parse_experience_level(experience_level);
        let kind = Self::parse_project_type(project_type);
        match (level, kind) {
            (Ok(level), Ok(kind)) => {
                errors.into_result()?;
                Ok((level, kind))
            }
            (level, kind) => {
                errors.check(level.map(|_| ()));
                errors.check(kind.map(|_| ()));
                Err(errors)
            }
        }
    }
}
