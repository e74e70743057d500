//! Demo seed data
//!
//! The bundled dataset (`data/seed.json`) holds three projects, three
//! developers with their experiences, and the technologies they reference.
//! It is only loaded into a database whose technologies table is empty.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::validators::{DeveloperValidator, ProjectValidator, TechnologyValidator};
use crate::domain::developers::repository::insert_developer;
use crate::domain::developers::{Developer, Experience};
use crate::domain::ids::TechnologyId;
use crate::domain::projects::repository::insert_project;
use crate::domain::projects::{ExperienceLevel, Project, ProjectStatus, ProjectType};
use crate::domain::technologies::repository::insert_technology;
use crate::domain::technologies::{Technology, TechnologyRepository};
use crate::error::{Error, Result};

use super::Database;

const BUNDLED_SEED: &str = include_str!("../../data/seed.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SeedData {
    pub technologies: Vec<SeedTechnology>,
    pub projects: Vec<SeedProject>,
    pub developers: Vec<SeedDeveloper>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedTechnology {
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProject {
    pub name: String,
    pub description: String,
    pub experience_level: ExperienceLevel,
    pub project_type: ProjectType,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub required_technologies: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDeveloper {
    pub name: String,
    pub email: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experiences: Vec<SeedExperience>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedExperience {
    pub description: String,
    pub category: Option<String>,
}

/// Counts of the rows written by a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub technologies: usize,
    pub projects: usize,
    pub developers: usize,
    pub experiences: usize,
    /// The database already had data and nothing was written
    pub skipped: bool,
}

impl SeedData {
    /// The dataset compiled into the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SEED)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::SeedError(e.to_string()))
    }
}

/// Load the bundled dataset unless the database already holds technologies
pub async fn seed_if_empty(db: &Database) -> Result<SeedReport> {
    if TechnologyRepository::new(db).count().await? > 0 {
        tracing::debug!("Database already populated, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    seed(db, &SeedData::bundled()?).await
}

/// Write a dataset in one transaction. Every record is validated first, and a
/// failure part way leaves the database untouched.
pub async fn seed(db: &Database, data: &SeedData) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let mut by_name: HashMap<String, TechnologyId> = TechnologyRepository::new(db)
        .list()
        .await?
        .into_iter()
        .map(|t| (t.name().to_lowercase(), t.id()))
        .collect();

    let mut technologies = Vec::new();
    for seed in &data.technologies {
        let mut technology = Technology::new(seed.name.as_str());
        technology.set_category(seed.category.clone());
        TechnologyValidator::validate(&technology)?;
        let key = technology.name().to_lowercase();
        if !by_name.contains_key(&key) {
            by_name.insert(key, technology.id());
            technologies.push(technology);
        }
    }

    let lookup = |name: &str| {
        by_name
            .get(&name.trim().to_lowercase())
            .copied()
            .ok_or_else(|| Error::SeedError(format!("Unknown technology '{}'", name)))
    };

    let mut projects = Vec::with_capacity(data.projects.len());
    for seed in &data.projects {
        let mut project = Project::new(
            seed.name.as_str(),
            seed.description.as_str(),
            seed.experience_level,
            seed.project_type,
        )
        .with_status(seed.status);
        for name in &seed.required_technologies {
            project.add_required_technology(lookup(name)?);
        }
        ProjectValidator::validate(&project)?;
        projects.push(project);
    }

    let mut developers = Vec::with_capacity(data.developers.len());
    for seed in &data.developers {
        let mut developer = Developer::new(seed.name.as_str());
        developer.set_email(seed.email.clone());
        developer.set_experience_level(seed.experience_level);
        developer.set_bio(seed.bio.clone());
        for name in &seed.skills {
            developer.add_skill(lookup(name)?);
        }
        for experience in &seed.experiences {
            let mut record = Experience::new(experience.description.as_str());
            record.set_category(experience.category.clone());
            developer.add_experience(record);
        }
        DeveloperValidator::validate(&developer)?;
        developers.push(developer);
    }

    let mut tx = db.pool().begin().await?;
    for technology in &technologies {
        insert_technology(&mut tx, technology).await?;
        report.technologies += 1;
    }
    for project in &projects {
        insert_project(&mut tx, project).await?;
        report.projects += 1;
    }
    for developer in &developers {
        insert_developer(&mut tx, developer).await?;
        report.developers += 1;
        report.experiences += developer.experience_count();
    }
    tx.commit().await?;

    tracing::info!(
        technologies = report.technologies,
        projects = report.projects,
        developers = report.developers,
        experiences = report.experiences,
        "Seeded database"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::developers::DeveloperRepository;
    use crate::domain::projects::ProjectRepository;

    #[test]
    fn test_bundled_seed_parses() {
        let data = SeedData::bundled().expect("Bundled seed should parse");
        assert_eq!(data.technologies.len(), 13);
        assert_eq!(data.projects.len(), 3);
        assert_eq!(data.developers.len(), 3);
        assert!(data.projects.iter().all(|p| p.status == ProjectStatus::Open));
    }

    #[tokio::test]
    async fn test_seed_if_empty_loads_once() {
        let db = Database::in_memory().await.expect("Failed to create database");

        let report = seed_if_empty(&db).await.unwrap();
        assert!(!report.skipped);
        assert_eq!(report.technologies, 13);
        assert_eq!(report.projects, 3);
        assert_eq!(report.developers, 3);
        assert_eq!(report.experiences, 12);

        let again = seed_if_empty(&db).await.unwrap();
        assert!(again.skipped);
        assert_eq!(DeveloperRepository::new(&db).count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_seeded_relations() {
        let db = Database::in_memory().await.unwrap();
        seed_if_empty(&db).await.unwrap();

        let catalog = TechnologyRepository::new(&db).catalog().await.unwrap();
        let developers = DeveloperRepository::new(&db).list().await.unwrap();
        let carlos = developers
            .iter()
            .find(|d| d.name() == "Carlos Pérez")
            .expect("Carlos should be seeded");

        let view = carlos.to_view(&catalog);
        assert_eq!(view.skills, vec!["Firebase", "Java", "Kotlin", "UI/UX"]);
        assert_eq!(view.experiences.len(), 4);
        assert!(view.experiences.iter().all(|e| e.category.as_deref() == Some("work")));
        assert_eq!(carlos.experience_level(), Some(ExperienceLevel::Advanced));
    }

    #[tokio::test]
    async fn test_unknown_technology_in_seed() {
        let db = Database::in_memory().await.unwrap();
        let data = SeedData::from_json(
            r#"{
                "technologies": [],
                "projects": [{
                    "name": "Orphan",
                    "description": "Needs something missing",
                    "experience_level": "Beginner",
                    "project_type": "Desktop",
                    "required_technologies": ["Rust"]
                }],
                "developers": []
            }"#,
        )
        .unwrap();

        let err = seed(&db, &data).await.unwrap_err();
        assert!(matches!(err, Error::SeedError(_)));
    }

    #[tokio::test]
    async fn test_failed_seed_writes_nothing() {
        let db = Database::in_memory().await.unwrap();
        let data = SeedData::from_json(
            r#"{
                "technologies": [{"name": "Rust", "category": "backend"}],
                "projects": [{
                    "name": "CLI tool",
                    "description": "Terminal helper",
                    "experience_level": "Beginner",
                    "project_type": "Desktop",
                    "required_technologies": ["Rust"]
                }],
                "developers": [
                    {"name": "Ana", "email": "same@x.com", "skills": ["Rust"]},
                    {"name": "Bea", "email": "same@x.com"}
                ]
            }"#,
        )
        .unwrap();

        assert!(seed(&db, &data).await.is_err());
        assert_eq!(TechnologyRepository::new(&db).count().await.unwrap(), 0);
        assert_eq!(ProjectRepository::new(&db).count().await.unwrap(), 0);
        assert_eq!(DeveloperRepository::new(&db).count().await.unwrap(), 0);

        let report = seed_if_empty(&db).await.unwrap();
        assert!(!report.skipped);
        assert_eq!(report.technologies, 13);
    }

    #[tokio::test]
    async fn test_invalid_seed_record_rejected_before_writing() {
        let db = Database::in_memory().await.unwrap();
        let data = SeedData::from_json(
            r#"{
                "technologies": [{"name": "Go"}],
                "projects": [],
                "developers": [{"name": "", "skills": ["Go"]}]
            }"#,
        )
        .unwrap();

        let err = seed(&db, &data).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(TechnologyRepository::new(&db).count().await.unwrap(), 0);
    }
}
