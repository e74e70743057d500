//! Application validators
//!
//! Explicit field-level validation invoked before anything is persisted.
//! Each validator exposes per-field checks plus a `validate` that collects
//! every violation of a record.

pub mod developer_validator;
pub mod experience_validator;
pub mod project_validator;
pub mod technology_validator;

pub use developer_validator::DeveloperValidator;
pub use experience_validator::ExperienceValidator;
pub use project_validator::ProjectValidator;
pub use technology_validator::TechnologyValidator;

use crate::application::errors::ValidationError;

/// Required text with a character count in `min..=max`
pub(crate) fn required_text(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::length(field, min, max));
    }
    Ok(())
}

/// Optional text of at most `max` characters
pub(crate) fn optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<(), ValidationError> {
    match value {
        Some(value) if value.chars().count() > max => Err(ValidationError::length(field, 0, max)),
        _ => Ok(()),
    }
}
