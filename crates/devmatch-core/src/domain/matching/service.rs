//! Matching service
//!
//! Ranks every stored developer against one project, every project against
//! one developer, or all projects at once.

use serde::Serialize;

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::domain::developers::{Developer, DeveloperRepository};
use crate::domain::ids::{DeveloperId, ProjectId};
use crate::domain::projects::{Project, ProjectRepository, ProjectStatus};
use crate::domain::technologies::{TechnologyCatalog, TechnologyRepository};
use crate::error::{Error, Result};
use crate::storage::Database;

use super::result::{MatchResult, insert_result};
use super::score::{ExperienceFit, experience_fit, technical_match};

/// Filters applied after ranking
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchOptions {
    /// Drop candidates scoring below this percentage
    pub min_score: Option<f64>,
    /// Keep at most this many candidates
    pub limit: Option<usize>,
}

impl MatchOptions {
    /// `min_score` must be a number in 0..=100
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        match self.min_score {
            Some(min) if !(0.0..=100.0).contains(&min) => {
                Err(ValidationError::range("min_score", 0, 100).into())
            }
            _ => Ok(()),
        }
    }

    fn keeps(&self, score: f64) -> bool {
        self.min_score.is_none_or(|min| score >= min)
    }
}

/// A developer ranked against a project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub developer_id: DeveloperId,
    pub developer_name: String,
    pub technical_match: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub fit: ExperienceFit,
}

impl MatchCandidate {
    /// Score one developer against one project
    pub fn evaluate(project: &Project, developer: &Developer, catalog: &TechnologyCatalog) -> Self {
        let required = project.required_technologies();
        let (matched, missing): (Vec<_>, Vec<_>) =
            required.iter().partition(|id| developer.has_skill(id));

        Self {
            developer_id: developer.id(),
            developer_name: developer.name().to_string(),
            technical_match: technical_match(required, developer.skills()),
            matched: catalog.names(matched),
            missing: catalog.names(missing),
            fit: experience_fit(project.experience_level(), developer.experience_level()),
        }
    }
}

/// A project ranked for one developer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectMatch {
    pub project_id: ProjectId,
    pub project_name: String,
    pub status: ProjectStatus,
    pub technical_match: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub fit: ExperienceFit,
}

impl ProjectMatch {
    pub fn evaluate(project: &Project, developer: &Developer, catalog: &TechnologyCatalog) -> Self {
        let candidate = MatchCandidate::evaluate(project, developer, catalog);
        Self {
            project_id: project.id(),
            project_name: project.name().to_string(),
            status: project.status(),
            technical_match: candidate.technical_match,
            matched: candidate.matched,
            missing: candidate.missing,
            fit: candidate.fit,
        }
    }
}

/// Ranked candidates for one project
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRanking {
    pub project_id: ProjectId,
    pub project_name: String,
    pub candidates: Vec<MatchCandidate>,
}

/// Best technical match first, then exact level fit, then name
pub fn rank(candidates: &mut [MatchCandidate]) {
    candidates.sort_by(|a, b| {
        b.technical_match
            .total_cmp(&a.technical_match)
            .then_with(|| a.fit.rank().cmp(&b.fit.rank()))
            .then_with(|| a.developer_name.cmp(&b.developer_name))
    });
}

/// Same ordering as [`rank`], keyed on the project name
pub fn rank_projects(matches: &mut [ProjectMatch]) {
    matches.sort_by(|a, b| {
        b.technical_match
            .total_cmp(&a.technical_match)
            .then_with(|| a.fit.rank().cmp(&b.fit.rank()))
            .then_with(|| a.project_name.cmp(&b.project_name))
    });
}

fn ranked_candidates(
    project: &Project,
    developers: &[Developer],
    catalog: &TechnologyCatalog,
    options: MatchOptions,
) -> Vec<MatchCandidate> {
    let mut candidates: Vec<MatchCandidate> = developers
        .iter()
        .map(|developer| MatchCandidate::evaluate(project, developer, catalog))
        .filter(|c| options.keeps(c.technical_match))
        .collect();
    rank(&mut candidates);
    if let Some(limit) = options.limit {
        candidates.truncate(limit);
    }
    candidates
}

/// Matching service over the stored developers and projects
pub struct MatchingService<'a> {
    db: &'a Database,
}

impl<'a> MatchingService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Rank all developers for a project
    pub async fn candidates(
        &self,
        project_id: ProjectId,
        options: MatchOptions,
    ) -> Result<Vec<MatchCandidate>> {
        options.validate()?;
        let project = ProjectRepository::new(self.db)
            .get(project_id)
            .await?
            .ok_or_else(|| Error::ProjectNotFound(project_id.to_string()))?;
        let developers = DeveloperRepository::new(self.db).list().await?;
        let catalog = TechnologyRepository::new(self.db).catalog().await?;

        let candidates = ranked_candidates(&project, &developers, &catalog, options);

        tracing::info!(
            project = %project_id,
            developers = developers.len(),
            candidates = candidates.len(),
            "Ranked developers"
        );
        Ok(candidates)
    }

    /// Rank all projects for a developer
    pub async fn projects_for(
        &self,
        developer_id: DeveloperId,
        options: MatchOptions,
    ) -> Result<Vec<ProjectMatch>> {
        options.validate()?;
        let developer = DeveloperRepository::new(self.db)
            .get(developer_id)
            .await?
            .ok_or_else(|| Error::DeveloperNotFound(developer_id.to_string()))?;
        let projects = ProjectRepository::new(self.db).list(None).await?;
        let catalog = TechnologyRepository::new(self.db).catalog().await?;

        let mut matches: Vec<ProjectMatch> = projects
            .iter()
            .map(|project| ProjectMatch::evaluate(project, &developer, &catalog))
            .filter(|m| options.keeps(m.technical_match))
            .collect();
        rank_projects(&mut matches);
        if let Some(limit) = options.limit {
            matches.truncate(limit);
        }

        tracing::info!(
            developer = %developer_id,
            projects = projects.len(),
            matches = matches.len(),
            "Ranked projects"
        );
        Ok(matches)
    }

    /// Rank developers for every project, projects ordered by name
    pub async fn rank_all(&self, options: MatchOptions) -> Result<Vec<ProjectRanking>> {
        options.validate()?;
        let projects = ProjectRepository::new(self.db).list(None).await?;
        let developers = DeveloperRepository::new(self.db).list().await?;
        let catalog = TechnologyRepository::new(self.db).catalog().await?;

        let rankings: Vec<ProjectRanking> = projects
            .iter()
            .map(|project| ProjectRanking {
                project_id: project.id(),
                project_name: project.name().to_string(),
                candidates: ranked_candidates(project, &developers, &catalog, options),
            })
            .collect();

        tracing::info!(
            projects = projects.len(),
            developers = developers.len(),
            "Ranked all projects"
        );
        Ok(rankings)
    }

    /// Store one result per candidate
    pub async fn record(
        &self,
        project_id: ProjectId,
        candidates: &[MatchCandidate],
    ) -> Result<Vec<MatchResult>> {
        let results: Vec<MatchResult> = candidates
            .iter()
            .map(|c| MatchResult::new(project_id, c.developer_id, c.technical_match))
            .collect();
        self.store(&results).await?;
        Ok(results)
    }

    /// Store results in one transaction; nothing is written if any fails
    pub async fn store(&self, results: &[MatchResult]) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        for result in results {
            insert_result(&mut tx, result).await?;
        }
        tx.commit().await?;

        tracing::debug!(count = results.len(), "Stored match results");
        Ok(())
    }
}
