//! Project domain module
//!
//! Contains the project entity, its closed value types, and the repository.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-export project types
pub use entity::{Project, ProjectView};
pub use repository::ProjectRepository;
pub use value_object::{ExperienceLevel, ProjectStatus, ProjectType};
