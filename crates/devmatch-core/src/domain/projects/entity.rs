//! Project entity

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProjectId, TechnologyId};
use crate::domain::technologies::TechnologyCatalog;

use super::value_object::{ExperienceLevel, ProjectStatus, ProjectType};

/// A project posting looking for developers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    experience_level: ExperienceLevel,
    project_type: ProjectType,
    #[serde(default)]
    status: ProjectStatus,
    #[serde(default)]
    required_technologies: BTreeSet<TechnologyId>,
}

impl Project {
    /// Create a new open project
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        experience_level: ExperienceLevel,
        project_type: ProjectType,
    ) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            description: description.into(),
            experience_level,
            project_type,
            status: ProjectStatus::default(),
            required_technologies: BTreeSet::new(),
        }
    }

    pub(crate) fn with_id(
        id: ProjectId,
        name: String,
        description: String,
        experience_level: ExperienceLevel,
        project_type: ProjectType,
        status: ProjectStatus,
    ) -> Self {
        Self {
            id,
            name,
            description,
            experience_level,
            project_type,
            status,
            required_technologies: BTreeSet::new(),
        }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }

    pub fn set_experience_level(&mut self, level: ExperienceLevel) {
        self.experience_level = level;
    }

    pub fn project_type(&self) -> ProjectType {
        self.project_type
    }

    pub fn set_project_type(&mut self, project_type: ProjectType) {
        self.project_type = project_type;
    }

    pub fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Any status may be set at any time
    pub fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    pub fn required_technologies(&self) -> &BTreeSet<TechnologyId> {
        &self.required_technologies
    }

    /// Returns false if the technology was already required
    pub fn add_required_technology(&mut self, technology_id: TechnologyId) -> bool {
        self.required_technologies.insert(technology_id)
    }

    /// Returns false if the technology was not required
    pub fn remove_required_technology(&mut self, technology_id: &TechnologyId) -> bool {
        self.required_technologies.remove(technology_id)
    }

    pub fn requires(&self, technology_id: &TechnologyId) -> bool {
        self.required_technologies.contains(technology_id)
    }

    /// Serializable projection with technology names resolved
    pub fn to_view(&self, catalog: &TechnologyCatalog) -> ProjectView {
        ProjectView {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            experience_level: self.experience_level,
            project_type: self.project_type,
            status: self.status,
            required_technologies: catalog.names(self.required_technologies.iter()),
        }
    }
}

/// Serializable projection of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub experience_level: ExperienceLevel,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub required_technologies: Vec<String>,
}
