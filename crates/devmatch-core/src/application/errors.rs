//! Validation error types
//!
//! Field-level constraint violations are reported as a single taxonomy:
//! `ValidationError { field, constraint, message }`. Validators collect every
//! violation of an entity into a `ValidationErrors` list instead of stopping at
//! the first one.

use std::fmt;

use serde::Serialize;

/// The kind of constraint a field violated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Constraint {
    /// A required field was missing or blank
    Required,
    /// Character count outside `min..=max`
    Length { min: usize, max: usize },
    /// Not a well-formed email address
    Email,
    /// Value already used by another record
    Unique,
    /// Value outside a closed set
    OneOf { allowed: &'static [&'static str] },
    /// Number outside `min..=max`
    Range { min: i64, max: i64 },
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "required"),
            Self::Length { min, max } => write!(f, "length({}..={})", min, max),
            Self::Email => write!(f, "email"),
            Self::Unique => write!(f, "unique"),
            Self::OneOf { allowed } => write!(f, "one_of({})", allowed.join(", ")),
            Self::Range { min, max } => write!(f, "range({}..={})", min, max),
        }
    }
}

/// A single field-level constraint violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub constraint: Constraint,
    pub message: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(
        field: impl Into<String>,
        constraint: Constraint,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            constraint,
            message: message.into(),
        }
    }

    /// Missing or blank required field
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} is required", field);
        Self::new(field, Constraint::Required, message)
    }

    /// Character count outside the allowed range
    pub fn length(field: impl Into<String>, min: usize, max: usize) -> Self {
        let field = field.into();
        let message = if min == 0 {
            format!("{} must be {} characters or less", field, max)
        } else {
            format!("{} must be between {} and {} characters", field, min, max)
        };
        Self::new(field, Constraint::Length { min, max }, message)
    }

    /// Malformed email address
    pub fn email(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} is not a valid email address", field);
        Self::new(field, Constraint::Email, message)
    }

    /// Value already taken by another record
    pub fn unique(field: impl Into<String>, value: &str) -> Self {
        let field = field.into();
        let message = format!("{} '{}' is already in use", field, value);
        Self::new(field, Constraint::Unique, message)
    }

    /// Value outside a closed set
    pub fn one_of(field: impl Into<String>, value: &str, allowed: &'static [&'static str]) -> Self {
        let field = field.into();
        let message = format!(
            "'{}' is not a valid {}. Allowed: {}",
            value,
            field,
            allowed.join(", ")
        );
        Self::new(field, Constraint::OneOf { allowed }, message)
    }

    /// Number outside the allowed range
    pub fn range(field: impl Into<String>, min: i64, max: i64) -> Self {
        let field = field.into();
        let message = format!("{} must be between {} and {}", field, min, max);
        Self::new(field, Constraint::Range { min, max }, message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.field, self.constraint, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// All violations found while validating one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    /// Record the error of a single-field check, if any
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Violations reported for one field
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.0.iter().filter(move |e| e.field == field)
    }

    /// Whether `field` violated a constraint of the same kind as `constraint`
    pub fn has(&self, field: &str, constraint: &Constraint) -> bool {
        self.for_field(field)
            .any(|e| std::mem::discriminant(&e.constraint) == std::mem::discriminant(constraint))
    }

    /// `Ok(())` when nothing was recorded
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|e| e.message.clone()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_error() {
        let err = ValidationError::required("name");
        assert_eq!(err.field, "name");
        assert_eq!(err.constraint, Constraint::Required);
        assert!(err.to_string().contains("required"));
    }

    #[test]
    fn test_length_messages() {
        let bounded = ValidationError::length("name", 1, 100);
        assert!(bounded.message.contains("between 1 and 100"));

        let max_only = ValidationError::length("location", 0, 200);
        assert!(max_only.message.contains("200 characters or less"));
        assert_eq!(max_only.constraint.to_string(), "length(0..=200)");
    }

    #[test]
    fn test_one_of_lists_allowed_values() {
        const ALLOWED: &[&str] = &["Web", "Mobile"];
        let err = ValidationError::one_of("project_type", "Console", ALLOWED);
        assert!(err.message.contains("Console"));
        assert!(err.message.contains("Web, Mobile"));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut errors = ValidationErrors::new();
        errors.check(Ok(()));
        errors.check(Err(ValidationError::required("name")));
        errors.check(Err(ValidationError::email("email")));

        assert_eq!(errors.len(), 2);
        assert!(errors.has("name", &Constraint::Required));
        assert!(errors.has("email", &Constraint::Email));
        assert!(!errors.has("email", &Constraint::Unique));
        assert!(errors.to_string().contains("; "));
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_empty_errors_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_serializes_structured() {
        let errors = ValidationErrors::from(ValidationError::length("name", 1, 100));
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json[0]["field"], "name");
        assert_eq!(json[0]["constraint"]["kind"], "length");
        assert_eq!(json[0]["constraint"]["max"], 100);
    }
}
