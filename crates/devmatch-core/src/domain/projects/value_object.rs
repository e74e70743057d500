//! Project value objects
//!
//! Closed sets for experience level, project type, and project status. The
//! persisted strings match their display form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::application::errors::ValidationError;

/// Coarse skill tier shared by developers and projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl ExperienceLevel {
    pub const ALLOWED: &'static [&'static str] = &["Beginner", "Intermediate", "Advanced"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        }
    }

    /// Parse a level, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExperienceLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::one_of("experience_level", s, Self::ALLOWED))
    }
}

/// Kind of application a project builds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectType {
    Web,
    Mobile,
    Desktop,
}

impl ProjectType {
    pub const ALLOWED: &'static [&'static str] = &["Web", "Mobile", "Desktop"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Mobile => "Mobile",
            Self::Desktop => "Desktop",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "web" => Some(Self::Web),
            "mobile" => Some(Self::Mobile),
            "desktop" => Some(Self::Desktop),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::one_of("project_type", s, Self::ALLOWED))
    }
}

/// Posting status. Any status may follow any other; workflow is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProjectStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Closed,
}

impl ProjectStatus {
    pub const ALLOWED: &'static [&'static str] = &["Open", "In Progress", "Closed"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Closed => "Closed",
        }
    }

    /// Parse a status; `in_progress` and `in-progress` are accepted as well
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "in progress" | "in_progress" | "in-progress" | "inprogress" => Some(Self::InProgress),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::one_of("status", s, Self::ALLOWED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::Constraint;

    #[test]
    fn test_experience_level_parse_ignores_case() {
        assert_eq!(ExperienceLevel::parse("advanced"), Some(ExperienceLevel::Advanced));
        assert_eq!(ExperienceLevel::parse(" Beginner "), Some(ExperienceLevel::Beginner));
        assert_eq!(ExperienceLevel::parse("expert"), None);
    }

    #[test]
    fn test_experience_level_ordering() {
        assert!(ExperienceLevel::Beginner < ExperienceLevel::Intermediate);
        assert!(ExperienceLevel::Intermediate < ExperienceLevel::Advanced);
    }

    #[test]
    fn test_status_default_is_open() {
        assert_eq!(ProjectStatus::default(), ProjectStatus::Open);
    }

    #[test]
    fn test_status_in_progress_spellings() {
        for s in ["In Progress", "in_progress", "in-progress", "INPROGRESS"] {
            assert_eq!(ProjectStatus::parse(s), Some(ProjectStatus::InProgress), "{}", s);
        }
        assert_eq!(ProjectStatus::InProgress.as_str(), "In Progress");
    }

    #[test]
    fn test_from_str_reports_one_of() {
        let err = "Console".parse::<ProjectType>().unwrap_err();
        assert_eq!(err.field, "project_type");
        assert!(matches!(err.constraint, Constraint::OneOf { .. }));
    }

    #[test]
    fn test_serde_uses_display_strings() {
        let json = serde_json::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: ProjectType = serde_json::from_str("\"Mobile\"").unwrap();
        assert_eq!(parsed, ProjectType::Mobile);
    }
}
