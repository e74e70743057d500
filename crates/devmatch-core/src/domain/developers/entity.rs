//! Developer entity

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::ids::{DeveloperId, ExperienceId, TechnologyId};
use crate::domain::projects::ExperienceLevel;
use crate::domain::technologies::TechnologyCatalog;

use super::experience::{Experience, ExperienceView};

/// A registered developer
///
/// Not deserializable: experiences must be attached through
/// [`Developer::add_experience`] so their owner stays consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Developer {
    id: DeveloperId,
    name: String,
    email: Option<String>,
    experience_level: Option<ExperienceLevel>,
    bio: Option<String>,
    location: Option<String>,
    github_profile: Option<String>,
    skills: BTreeSet<TechnologyId>,
    experiences: BTreeMap<ExperienceId, Experience>,
}

impl Developer {
    /// Create a developer with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DeveloperId::new(),
            name: name.into(),
            email: None,
            experience_level: None,
            bio: None,
            location: None,
            github_profile: None,
            skills: BTreeSet::new(),
            experiences: BTreeMap::new(),
        }
    }

    /// Create a developer with name, email, and experience level
    pub fn with_details(
        name: impl Into<String>,
        email: impl Into<String>,
        experience_level: ExperienceLevel,
    ) -> Self {
        Self::new(name)
            .with_email(email)
            .with_experience_level(experience_level)
    }

    pub(crate) fn with_id(id: DeveloperId, name: String) -> Self {
        Self {
            id,
            ..Self::new(name)
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_experience_level(mut self, level: ExperienceLevel) -> Self {
        self.experience_level = Some(level);
        self
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_github_profile(mut self, profile: impl Into<String>) -> Self {
        self.github_profile = Some(profile.into());
        self
    }

    // ========== Scalar accessors ==========

    pub fn id(&self) -> DeveloperId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn set_email(&mut self, email: Option<String>) {
        self.email = email;
    }

    pub fn experience_level(&self) -> Option<ExperienceLevel> {
        self.experience_level
    }

    pub fn set_experience_level(&mut self, level: Option<ExperienceLevel>) {
        self.experience_level = level;
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn set_bio(&mut self, bio: Option<String>) {
        self.bio = bio;
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn set_location(&mut self, location: Option<String>) {
        self.location = location;
    }

    pub fn github_profile(&self) -> Option<&str> {
        self.github_profile.as_deref()
    }

    pub fn set_github_profile(&mut self, profile: Option<String>) {
        self.github_profile = profile;
    }

    // ========== Skills ==========

    pub fn skills(&self) -> &BTreeSet<TechnologyId> {
        &self.skills
    }

    /// Returns false if the skill was already present
    pub fn add_skill(&mut self, technology_id: TechnologyId) -> bool {
        self.skills.insert(technology_id)
    }

    /// Returns false if the skill was not present
    pub fn remove_skill(&mut self, technology_id: &TechnologyId) -> bool {
        self.skills.remove(technology_id)
    }

    pub fn has_skill(&self, technology_id: &TechnologyId) -> bool {
        self.skills.contains(technology_id)
    }

    // ========== Experiences ==========

    /// Owned experiences, ordered by id
    pub fn experiences(&self) -> impl ExactSizeIterator<Item = &Experience> {
        self.experiences.values()
    }

    pub fn experience(&self, id: &ExperienceId) -> Option<&Experience> {
        self.experiences.get(id)
    }

    pub fn experience_count(&self) -> usize {
        self.experiences.len()
    }

    /// Take ownership of an experience and point it back at this developer.
    ///
    /// Adding an experience whose id is already present replaces the stored
    /// copy; the set never holds two entries with the same id.
    pub fn add_experience(&mut self, mut experience: Experience) {
        experience.set_owner(Some(self.id));
        self.experiences.insert(experience.id(), experience);
    }

    /// Detach an experience and hand it back with its owner cleared.
    ///
    /// Unless the caller attaches it to another developer, the stored row is
    /// deleted when this developer is next saved.
    pub fn remove_experience(&mut self, id: &ExperienceId) -> Option<Experience> {
        let mut experience = self.experiences.remove(id)?;
        experience.set_owner(None);
        Some(experience)
    }

    /// Edit an owned experience in place
    pub fn experience_mut(&mut self, id: &ExperienceId) -> Option<ExperienceMut<'_>> {
        self.experiences.get_mut(id).map(ExperienceMut)
    }

    /// Serializable projection with skill names resolved
    pub fn to_view(&self, catalog: &TechnologyCatalog) -> DeveloperView {
        DeveloperView {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            experience_level: self.experience_level,
            bio: self.bio.clone(),
            location: self.location.clone(),
            github_profile: self.github_profile.clone(),
            skills: catalog.names(self.skills.iter()),
            experiences: self.experiences.values().map(Experience::to_view).collect(),
        }
    }
}

/// Mutable handle to an owned experience that cannot change its owner
pub struct ExperienceMut<'a>(&'a mut Experience);

impl ExperienceMut<'_> {
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.0.set_description(description);
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.0.set_category(category);
    }
}

/// Serializable projection of a developer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeveloperView {
    pub id: DeveloperId,
    pub name: String,
    pub email: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub github_profile: Option<String>,
    pub skills: Vec<String>,
    pub experiences: Vec<ExperienceView>,
}
