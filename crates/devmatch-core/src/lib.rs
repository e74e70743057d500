//! DevMatch Core Library
//!
//! This crate provides the core functionality for DevMatch, including:
//! - Entities (developers, projects, technologies, experiences)
//! - Boundary validation returning structured errors
//! - Storage (SQLite via sqlx, versioned migrations, demo seed data)
//! - Technical matching of developers against project requirements
//! - Configuration loading

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::application::errors::{Constraint, ValidationError, ValidationErrors};
    pub use crate::config::Config;
    pub use crate::domain::developers::{Developer, DeveloperRepository, Experience};
    pub use crate::domain::ids::{DeveloperId, ExperienceId, MatchResultId, ProjectId, TechnologyId};
    pub use crate::domain::matching::{MatchCandidate, MatchOptions, MatchResult, MatchingService};
    pub use crate::domain::projects::{
        ExperienceLevel, Project, ProjectRepository, ProjectStatus, ProjectType,
    };
    pub use crate::domain::technologies::{Technology, TechnologyRepository};
    pub use crate::error::{Error, Result};
    pub use crate::storage::Database;
}
