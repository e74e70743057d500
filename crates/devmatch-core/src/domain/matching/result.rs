//! Stored match results
//!
//! A result keeps the technical score computed here and, optionally, an
//! assessment produced by an outside reviewer (scores 0 to 100 plus a comment).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::domain::ids::{DeveloperId, MatchResultId, ProjectId};
use crate::error::{Error, Result};
use crate::storage::Database;
use crate::storage::rows::get_id;

pub const SCORE_MAX: u8 = 100;

/// Externally computed affinity scores for one developer and project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiAssessment {
    pub technical_affinity: u8,
    pub motivational_affinity: u8,
    pub experience_relevance: u8,
    pub comment: Option<String>,
}

impl AiAssessment {
    pub fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, score) in [
            ("ai_technical_affinity", self.technical_affinity),
            ("ai_motivational_affinity", self.motivational_affinity),
            ("ai_experience_relevance", self.experience_relevance),
        ] {
            if score > SCORE_MAX {
                errors.push(ValidationError::range(field, 0, i64::from(SCORE_MAX)));
            }
        }
        errors.into_result()
    }

    /// Sum of the three scores
    pub fn total(&self) -> f64 {
        f64::from(self.technical_affinity)
            + f64::from(self.motivational_affinity)
            + f64::from(self.experience_relevance)
    }

    /// Mean of the three scores
    pub fn average(&self) -> f64 {
        self.total() / 3.0
    }
}

/// One developer's outcome in a matching run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub id: MatchResultId,
    pub project_id: ProjectId,
    pub developer_id: DeveloperId,
    pub technical_match: f64,
    pub ai: Option<AiAssessment>,
    pub created_at: DateTime<Utc>,
}

impl MatchResult {
    pub fn new(project_id: ProjectId, developer_id: DeveloperId, technical_match: f64) -> Self {
        Self {
            id: MatchResultId::new(),
            project_id,
            developer_id,
            technical_match,
            ai: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_ai(mut self, assessment: AiAssessment) -> Self {
        self.ai = Some(assessment);
        self
    }

    /// Mean of the technical match and the three assessment scores. Missing
    /// scores count as 0.
    pub fn combined_score(&self) -> f64 {
        let ai = self.ai.as_ref().map_or(0.0, AiAssessment::total);
        (self.technical_match + ai) / 4.0
    }
}

/// Repository for recorded match results
pub struct MatchResultRepository<'a> {
    db: &'a Database,
}

impl<'a> MatchResultRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Store a result after checking its scores and references
    pub async fn record(&self, result: &MatchResult) -> Result<()> {
        let mut conn = self.db.pool().acquire().await?;
        insert_result(&mut conn, result).await
    }

    /// Results for a project, best combined score first
    pub async fn list_for_project(&self, project_id: ProjectId) -> Result<Vec<MatchResult>> {
        let rows = sqlx::query(
            r#"
            SELECT id, project_id, developer_id, technical_match,
                   ai_technical_affinity, ai_motivational_affinity, ai_experience_relevance,
                   ai_comment, created_at
            FROM match_results
            WHERE project_id = ?
            ORDER BY (technical_match
                      + COALESCE(ai_technical_affinity, 0)
                      + COALESCE(ai_motivational_affinity, 0)
                      + COALESCE(ai_experience_relevance, 0)) / 4.0 DESC,
                     technical_match DESC,
                     created_at DESC
            "#,
        )
        .bind(project_id.to_string())
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(row_to_result).collect()
    }

    pub async fn count_for_project(&self, project_id: ProjectId) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM match_results WHERE project_id = ?")
                .bind(project_id.to_string())
                .fetch_one(self.db.pool())
                .await?;
        Ok(count)
    }
}

/// Check scores and references, then insert on `conn`
pub(crate) async fn insert_result(conn: &mut SqliteConnection, result: &MatchResult) -> Result<()> {
    if let Some(ai) = &result.ai {
        ai.validate()?;
    }

    let project: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
        .bind(result.project_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    if project.is_none() {
        return Err(Error::ProjectNotFound(result.project_id.to_string()));
    }

    let developer: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM developers WHERE id = ?")
        .bind(result.developer_id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    if developer.is_none() {
        return Err(Error::DeveloperNotFound(result.developer_id.to_string()));
    }

    sqlx::query(
        r#"
        INSERT INTO match_results (
            id, project_id, developer_id, technical_match,
            ai_technical_affinity, ai_motivational_affinity, ai_experience_relevance,
            ai_comment, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(result.id.to_string())
    .bind(result.project_id.to_string())
    .bind(result.developer_id.to_string())
    .bind(result.technical_match)
    .bind(result.ai.as_ref().map(|ai| i64::from(ai.technical_affinity)))
    .bind(result.ai.as_ref().map(|ai| i64::from(ai.motivational_affinity)))
    .bind(result.ai.as_ref().map(|ai| i64::from(ai.experience_relevance)))
    .bind(result.ai.as_ref().and_then(|ai| ai.comment.as_deref()))
    .bind(result.created_at)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(
        project = %result.project_id,
        developer = %result.developer_id,
        technical_match = result.technical_match,
        "Recorded match result"
    );
    Ok(())
}

fn score(row: &SqliteRow, column: &str) -> Result<Option<u8>> {
    let raw: Option<i64> = row.try_get(column)?;
    raw.map(|value| {
        u8::try_from(value).map_err(|_| {
            Error::Other(format!("Score {} out of range in column '{}'", value, column))
        })
    })
    .transpose()
}

fn row_to_result(row: &SqliteRow) -> Result<MatchResult> {
    let ai = match (
        score(row, "ai_technical_affinity")?,
        score(row, "ai_motivational_affinity")?,
        score(row, "ai_experience_relevance")?,
    ) {
        (Some(technical_affinity), Some(motivational_affinity), Some(experience_relevance)) => {
            Some(AiAssessment {
                technical_affinity,
                motivational_affinity,
                experience_relevance,
                comment: row.try_get("ai_comment")?,
            })
        }
        _ => None,
    };

    Ok(MatchResult {
        id: get_id(row, "id")?,
        project_id: get_id(row, "project_id")?,
        developer_id: get_id(row, "developer_id")?,
        technical_match: row.try_get("technical_match")?,
        ai,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::errors::Constraint;
    use crate::domain::developers::{Developer, DeveloperRepository};
    use crate::domain::projects::{ExperienceLevel, Project, ProjectRepository, ProjectType};

    async fn seeded() -> (Database, ProjectId, DeveloperId, DeveloperId) {
        let db = Database::in_memory().await.expect("Failed to create database");
        let project = Project::new(
            "Online courses platform",
            "Video lessons and quizzes",
            ExperienceLevel::Intermediate,
            ProjectType::Web,
        );
        ProjectRepository::new(&db).create(&project).await.unwrap();

        let ana = Developer::new("Ana");
        let carlos = Developer::new("Carlos");
        let developers = DeveloperRepository::new(&db);
        developers.create(&ana).await.unwrap();
        developers.create(&carlos).await.unwrap();

        (db, project.id(), ana.id(), carlos.id())
    }

    #[test]
    fn test_assessment_range() {
        let assessment = AiAssessment {
            technical_affinity: 80,
            motivational_affinity: 101,
            experience_relevance: 255,
            comment: None,
        };
        let errors = assessment.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.has("ai_motivational_affinity", &Constraint::Range { min: 0, max: 0 }));
    }

    #[test]
    fn test_assessment_average() {
        let assessment = AiAssessment {
            technical_affinity: 90,
            motivational_affinity: 60,
            experience_relevance: 30,
            comment: None,
        };
        assert_eq!(assessment.average(), 60.0);
    }

    #[tokio::test]
    async fn test_record_and_list_ordered() {
        let (db, project, ana, carlos) = seeded().await;
        let repo = MatchResultRepository::new(&db);

        repo.record(&MatchResult::new(project, ana, 50.0)).await.unwrap();
        repo.record(
            &MatchResult::new(project, carlos, 75.0).with_ai(AiAssessment {
                technical_affinity: 70,
                motivational_affinity: 85,
                experience_relevance: 40,
                comment: Some("Strong backend background".to_string()),
            }),
        )
        .await
        .unwrap();

        let results = repo.list_for_project(project).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].developer_id, carlos);
        assert_eq!(
            results[0].ai.as_ref().and_then(|ai| ai.comment.as_deref()),
            Some("Strong backend background")
        );
        assert!(results[1].ai.is_none());
        assert_eq!(repo.count_for_project(project).await.unwrap(), 2);
    }

    #[test]
    fn test_combined_score_counts_missing_assessment_as_zero() {
        let plain = MatchResult::new(ProjectId::new(), DeveloperId::new(), 60.0);
        assert_eq!(plain.combined_score(), 15.0);

        let assessed = MatchResult::new(ProjectId::new(), DeveloperId::new(), 50.0).with_ai(
            AiAssessment {
                technical_affinity: 100,
                motivational_affinity: 100,
                experience_relevance: 100,
                comment: None,
            },
        );
        assert_eq!(assessed.combined_score(), 87.5);
    }

    #[tokio::test]
    async fn test_assessment_outranks_higher_technical_match() {
        let (db, project, ana, carlos) = seeded().await;
        let repo = MatchResultRepository::new(&db);

        repo.record(&MatchResult::new(project, carlos, 60.0)).await.unwrap();
        repo.record(&MatchResult::new(project, ana, 50.0).with_ai(AiAssessment {
            technical_affinity: 100,
            motivational_affinity: 100,
            experience_relevance: 100,
            comment: None,
        }))
        .await
        .unwrap();

        let results = repo.list_for_project(project).await.unwrap();
        let order: Vec<DeveloperId> = results.iter().map(|r| r.developer_id).collect();
        assert_eq!(order, vec![ana, carlos]);
        assert!(results[0].combined_score() > results[1].combined_score());
    }

    #[tokio::test]
    async fn test_record_rejects_unknown_references() {
        let (db, project, ana, _) = seeded().await;
        let repo = MatchResultRepository::new(&db);

        let err = repo
            .record(&MatchResult::new(ProjectId::new(), ana, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));

        let err = repo
            .record(&MatchResult::new(project, DeveloperId::new(), 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DeveloperNotFound(_)));
    }

    #[tokio::test]
    async fn test_results_removed_with_developer() {
        let (db, project, ana, _) = seeded().await;
        let repo = MatchResultRepository::new(&db);

        repo.record(&MatchResult::new(project, ana, 100.0)).await.unwrap();
        DeveloperRepository::new(&db).delete(ana).await.unwrap();

        assert_eq!(repo.count_for_project(project).await.unwrap(), 0);
    }
}
