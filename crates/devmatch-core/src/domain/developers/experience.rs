//! Experience entity

use serde::Serialize;

use crate::domain::ids::{DeveloperId, ExperienceId};

/// A past work, education, or project record owned by one developer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Experience {
    id: ExperienceId,
    developer_id: Option<DeveloperId>,
    description: String,
    category: Option<String>,
}

impl Experience {
    /// Create an unowned experience with a fresh id
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: ExperienceId::new(),
            developer_id: None,
            description: description.into(),
            category: None,
        }
    }

    /// Set the category (work, education, project, ...)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub(crate) fn from_parts(
        id: ExperienceId,
        developer_id: DeveloperId,
        description: String,
        category: Option<String>,
    ) -> Self {
        Self {
            id,
            developer_id: Some(developer_id),
            description,
            category,
        }
    }

    pub fn id(&self) -> ExperienceId {
        self.id
    }

    /// The owning developer, `None` while detached
    pub fn developer_id(&self) -> Option<DeveloperId> {
        self.developer_id
    }

    pub fn is_owned_by(&self, developer_id: DeveloperId) -> bool {
        self.developer_id == Some(developer_id)
    }

    pub(super) fn set_owner(&mut self, developer_id: Option<DeveloperId>) {
        self.developer_id = developer_id;
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    pub fn to_view(&self) -> ExperienceView {
        ExperienceView {
            id: self.id,
            description: self.description.clone(),
            category: self.category.clone(),
        }
    }
}

/// Serializable projection of an experience
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExperienceView {
    pub id: ExperienceId,
    pub description: String,
    pub category: Option<String>,
}
