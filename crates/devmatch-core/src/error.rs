//! Error types for DevMatch

use thiserror::Error;

use crate::application::errors::ValidationErrors;

/// Result type alias using DevMatch's Error
pub type Result<T> = std::result::Result<T, Error>;

/// DevMatch error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Developer '{0}' not found. Run `devmatch developers list` to see all developers.")]
    DeveloperNotFound(String),

    #[error("Project '{0}' not found. Run `devmatch projects list` to see all projects.")]
    ProjectNotFound(String),

    #[error("Technology '{0}' not found. Run `devmatch technologies list` to see them all.")]
    TechnologyNotFound(String),

    #[error("Experience '{0}' not found.")]
    ExperienceNotFound(String),

    #[error("Invalid identifier '{0}'. Identifiers are UUIDs.")]
    InvalidId(String),

    // Validation errors (E100-E199)
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    // Referential errors (E200-E299)
    #[error("Technology '{name}' is used by {developers} developer(s) and {projects} project(s).")]
    TechnologyInUse {
        name: String,
        developers: i64,
        projects: i64,
    },

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Seed data error: {0}")]
    SeedError(String),

    // Input errors (E800-E899)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::DeveloperNotFound(_) => "E001",
            Self::ProjectNotFound(_) => "E002",
            Self::TechnologyNotFound(_) => "E003",
            Self::ExperienceNotFound(_) => "E004",
            Self::InvalidId(_) => "E005",
            Self::Validation(_) => "E100",
            Self::TechnologyInUse { .. } => "E200",
            Self::DatabaseError(_) => "E400",
            Self::SeedError(_) => "E401",
            Self::InvalidInput(_) => "E800",
            Self::Other(_) => "E9999",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::DeveloperNotFound(_) => Some("devmatch developers list".to_string()),
            Self::ProjectNotFound(_) => Some("devmatch projects list".to_string()),
            Self::TechnologyNotFound(_) => Some("devmatch technologies list".to_string()),
            Self::TechnologyInUse { .. } => {
                Some("remove the technology from developers and projects first".to_string())
            }
            Self::DatabaseError(_) => Some("devmatch doctor".to_string()),
            _ => None,
        }
    }

    /// Whether this error is a boundary validation failure
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::{Constraint, ValidationError};

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::DeveloperNotFound("x".into()).code(), "E001");
        assert_eq!(Error::ProjectNotFound("x".into()).code(), "E002");
        assert_eq!(Error::TechnologyNotFound("x".into()).code(), "E003");
        assert_eq!(Error::Other("x".into()).code(), "E9999");
    }

    #[test]
    fn test_not_found_suggestions() {
        let err = Error::ProjectNotFound("abc".into());
        assert_eq!(err.suggestion().as_deref(), Some("devmatch projects list"));
        assert!(err.to_string().contains("abc"));
        assert!(Error::InvalidInput("bad".into()).suggestion().is_none());
    }

    #[test]
    fn test_validation_conversion() {
        let errors = ValidationErrors::from(ValidationError::new(
            "name",
            Constraint::Required,
            "name is required",
        ));
        let err: Error = errors.into();
        assert!(err.is_validation());
        assert_eq!(err.code(), "E100");
        assert!(err.to_string().contains("name is required"));
    }

    #[test]
    fn test_technology_in_use_message() {
        let err = Error::TechnologyInUse {
            name: "Rust".into(),
            developers: 2,
            projects: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("Rust"));
        assert!(msg.contains("2 developer(s)"));
        assert!(msg.contains("1 project(s)"));
    }
}
