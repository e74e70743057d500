//! Technology entity and catalog

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::domain::ids::TechnologyId;

/// A named skill or tag, e.g. "Python" or "React"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    id: TechnologyId,
    name: String,
    category: Option<String>,
}

impl Technology {
    /// Create a new technology with a fresh id. Surrounding whitespace is
    /// dropped from the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: TechnologyId::new(),
            name: normalize_name(name.into()),
            category: None,
        }
    }

    /// Set the category (backend, frontend, database, ...)
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub(crate) fn from_parts(id: TechnologyId, name: String, category: Option<String>) -> Self {
        Self { id, name, category }
    }

    pub fn id(&self) -> TechnologyId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = normalize_name(name.into());
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.category = category;
    }

    pub fn to_view(&self) -> TechnologyView {
        TechnologyView {
            id: self.id,
            name: self.name.clone(),
            category: self.category.clone(),
        }
    }
}

fn normalize_name(name: String) -> String {
    name.trim().to_string()
}

/// Serializable projection of a technology
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologyView {
    pub id: TechnologyId,
    pub name: String,
    pub category: Option<String>,
}

/// Lookup of technologies by id, used to resolve skill and requirement sets
/// into names
#[derive(Debug, Clone, Default)]
pub struct TechnologyCatalog {
    by_id: HashMap<TechnologyId, Technology>,
}

impl TechnologyCatalog {
    pub fn new(technologies: impl IntoIterator<Item = Technology>) -> Self {
        Self {
            by_id: technologies.into_iter().map(|t| (t.id(), t)).collect(),
        }
    }

    pub fn get(&self, id: &TechnologyId) -> Option<&Technology> {
        self.by_id.get(id)
    }

    pub fn name_of(&self, id: &TechnologyId) -> Option<&str> {
        self.by_id.get(id).map(|t| t.name())
    }

    /// Case-insensitive lookup by name
    pub fn find_by_name(&self, name: &str) -> Option<&Technology> {
        self.by_id
            .values()
            .find(|t| t.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Resolve ids to names, sorted. Ids missing from the catalog are skipped.
    pub fn names<'a>(&self, ids: impl IntoIterator<Item = &'a TechnologyId>) -> Vec<String> {
        let names: BTreeSet<&str> = ids.into_iter().filter_map(|id| self.name_of(id)).collect();
        names.into_iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_technology() {
        let tech = Technology::new("Rust").with_category("backend");
        assert_eq!(tech.name(), "Rust");
        assert_eq!(tech.category(), Some("backend"));
    }

    #[test]
    fn test_name_is_trimmed() {
        let mut tech = Technology::new("  Java ");
        assert_eq!(tech.name(), "Java");

        tech.set_name("\tKotlin\n");
        assert_eq!(tech.name(), "Kotlin");
    }

    #[test]
    fn test_catalog_resolves_sorted_names() {
        let react = Technology::new("React");
        let css = Technology::new("CSS");
        let ids = [react.id(), css.id(), TechnologyId::new()];
        let catalog = TechnologyCatalog::new([react, css]);

        assert_eq!(catalog.names(ids.iter()), vec!["CSS", "React"]);
    }

    #[test]
    fn test_catalog_find_by_name_ignores_case() {
        let catalog = TechnologyCatalog::new([Technology::new("Spring Boot")]);
        assert!(catalog.find_by_name("spring boot").is_some());
        assert!(catalog.find_by_name("Django").is_none());
    }
}
