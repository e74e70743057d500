//! Project repository for database operations

use std::collections::HashMap;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::application::validators::ProjectValidator;
use crate::domain::ids::{ProjectId, TechnologyId};
use crate::domain::technologies::repository::ensure_technologies_exist;
use crate::error::{Error, Result};
use crate::storage::Database;
use crate::storage::rows::{get_enum, get_id};

use super::entity::Project;
use super::value_object::{ExperienceLevel, ProjectStatus, ProjectType};

const SELECT_PROJECT: &str =
    "SELECT id, name, description, experience_level, project_type, status FROM projects";

/// Project repository for database operations
pub struct ProjectRepository<'a> {
    db: &'a Database,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Validate and insert a new project with its required technologies
    pub async fn create(&self, project: &Project) -> Result<()> {
        ProjectValidator::validate(project)?;

        let mut tx = self.db.pool().begin().await?;
        insert_project(&mut tx, project).await?;
        tx.commit().await?;

        tracing::info!(id = %project.id(), name = project.name(), "Created project");
        Ok(())
    }

    /// Validate and update an existing project, syncing required technologies
    pub async fn update(&self, project: &Project) -> Result<()> {
        ProjectValidator::validate(project)?;

        let mut tx = self.db.pool().begin().await?;
        ensure_technologies_exist(&mut *tx, project.required_technologies()).await?;

        let result = sqlx::query(
            r#"
            UPDATE projects
            SET name = ?, description = ?, experience_level = ?, project_type = ?, status = ?
            WHERE id = ?
            "#,
        )
        .bind(project.name())
        .bind(project.description())
        .bind(project.experience_level().as_str())
        .bind(project.project_type().as_str())
        .bind(project.status().as_str())
        .bind(project.id().to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(project.id().to_string()));
        }

        write_required_technologies(&mut *tx, project).await?;
        tx.commit().await?;

        tracing::debug!(id = %project.id(), "Updated project");
        Ok(())
    }

    /// Insert or update depending on whether the project is stored
    pub async fn save(&self, project: &Project) -> Result<()> {
        if self.exists(project.id()).await? {
            self.update(project).await
        } else {
            self.create(project).await
        }
    }

    /// Change only the status column
    pub async fn set_status(&self, id: ProjectId, status: ProjectStatus) -> Result<()> {
        let result = sqlx::query("UPDATE projects SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(id.to_string()));
        }

        tracing::info!(id = %id, status = %status, "Project status changed");
        Ok(())
    }

    /// Get a project by ID, with its required technologies
    pub async fn get(&self, id: ProjectId) -> Result<Option<Project>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_PROJECT))
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut project = row_to_project(&row)?;
        let rows =
            sqlx::query("SELECT technology_id FROM project_technologies WHERE project_id = ?")
                .bind(id.to_string())
                .fetch_all(self.db.pool())
                .await?;
        for row in &rows {
            project.add_required_technology(get_id(row, "technology_id")?);
        }

        Ok(Some(project))
    }

    /// List projects ordered by name, optionally filtered by status
    pub async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>> {
        let rows = match status {
            Some(status) => {
                sqlx::query(&format!("{} WHERE status = ? ORDER BY name, id", SELECT_PROJECT))
                    .bind(status.as_str())
                    .fetch_all(self.db.pool())
                    .await?
            }
            None => {
                sqlx::query(&format!("{} ORDER BY name, id", SELECT_PROJECT))
                    .fetch_all(self.db.pool())
                    .await?
            }
        };

        let mut required: HashMap<ProjectId, Vec<TechnologyId>> = HashMap::new();
        for row in sqlx::query("SELECT project_id, technology_id FROM project_technologies")
            .fetch_all(self.db.pool())
            .await?
        {
            required
                .entry(get_id(&row, "project_id")?)
                .or_default()
                .push(get_id(&row, "technology_id")?);
        }

        rows.iter()
            .map(|row| {
                let mut project = row_to_project(row)?;
                for technology_id in required.remove(&project.id()).unwrap_or_default() {
                    project.add_required_technology(technology_id);
                }
                Ok(project)
            })
            .collect()
    }

    /// Delete a project with its requirement rows and recorded match results.
    /// Referenced technologies are left in place.
    pub async fn delete(&self, id: ProjectId) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        let id_str = id.to_string();

        sqlx::query("DELETE FROM project_technologies WHERE project_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM match_results WHERE project_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(Error::ProjectNotFound(id_str));
        }

        tx.commit().await?;
        tracing::info!(id = %id, "Deleted project");
        Ok(())
    }

    /// Check if a project exists
    pub async fn exists(&self, id: ProjectId) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Count stored projects
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }
}

/// Insert an already validated project with its requirements on `conn`
pub(crate) async fn insert_project(conn: &mut SqliteConnection, project: &Project) -> Result<()> {
    ensure_technologies_exist(&mut *conn, project.required_technologies()).await?;

    sqlx::query(
        r#"
        INSERT INTO projects (id, name, description, experience_level, project_type, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(project.id().to_string())
    .bind(project.name())
    .bind(project.description())
    .bind(project.experience_level().as_str())
    .bind(project.project_type().as_str())
    .bind(project.status().as_str())
    .execute(&mut *conn)
    .await?;

    write_required_technologies(&mut *conn, project).await
}

/// Replace the project's requirement rows with its current set
async fn write_required_technologies(conn: &mut SqliteConnection, project: &Project) -> Result<()> {
    let id = project.id().to_string();

    sqlx::query("DELETE FROM project_technologies WHERE project_id = ?")
        .bind(&id)
        .execute(&mut *conn)
        .await?;

    for technology_id in project.required_technologies() {
        sqlx::query("INSERT INTO project_technologies (project_id, technology_id) VALUES (?, ?)")
            .bind(&id)
            .bind(technology_id.to_string())
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

fn row_to_project(row: &SqliteRow) -> Result<Project> {
    Ok(Project::with_id(
        get_id(row, "id")?,
        row.try_get("name")?,
        row.try_get("description")?,
        get_enum(row, "experience_level", ExperienceLevel::parse)?,
        get_enum(row, "project_type", ProjectType::parse)?,
        get_enum(row, "status", ProjectStatus::parse)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::technologies::{Technology, TechnologyRepository};

    fn fitness_app() -> Project {
        Project::new(
            "Fitness app",
            "Track workouts and routines",
            ExperienceLevel::Advanced,
            ProjectType::Mobile,
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::in_memory().await.expect("Failed to create database");
        let technologies = TechnologyRepository::new(&db);
        let repo = ProjectRepository::new(&db);

        let kotlin = Technology::new("Kotlin");
        technologies.create(&kotlin).await.unwrap();

        let mut project = fitness_app();
        project.add_required_technology(kotlin.id());
        repo.create(&project).await.expect("Failed to create project");

        let reloaded = repo.get(project.id()).await.unwrap().expect("Project should exist");
        assert_eq!(reloaded, project);
        assert_eq!(reloaded.status(), ProjectStatus::Open);
    }

    #[tokio::test]
    async fn test_invalid_project_rejected() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let mut project = fitness_app();
        project.set_name("");
        let err = repo.create(&project).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_required_technology_rejected() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let mut project = fitness_app();
        project.add_required_technology(TechnologyId::new());
        let err = repo.create(&project).await.unwrap_err();
        assert!(matches!(err, Error::TechnologyNotFound(_)));
    }

    #[tokio::test]
    async fn test_set_status_round_trips_in_progress() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let project = fitness_app();
        repo.create(&project).await.unwrap();
        repo.set_status(project.id(), ProjectStatus::InProgress).await.unwrap();

        let reloaded = repo.get(project.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.status(), ProjectStatus::InProgress);

        let (raw,): (String,) = sqlx::query_as("SELECT status FROM projects WHERE id = ?")
            .bind(project.id().to_string())
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(raw, "In Progress");
    }

    #[tokio::test]
    async fn test_set_status_missing_project() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let err = repo.set_status(ProjectId::new(), ProjectStatus::Closed).await.unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_replaces_requirements() {
        let db = Database::in_memory().await.unwrap();
        let technologies = TechnologyRepository::new(&db);
        let repo = ProjectRepository::new(&db);

        let java = Technology::new("Java");
        let python = Technology::new("Python");
        technologies.create(&java).await.unwrap();
        technologies.create(&python).await.unwrap();

        let mut project = fitness_app();
        project.add_required_technology(java.id());
        repo.create(&project).await.unwrap();

        project.remove_required_technology(&java.id());
        project.add_required_technology(python.id());
        project.set_description("Now with meal plans");
        repo.save(&project).await.unwrap();

        let reloaded = repo.get(project.id()).await.unwrap().unwrap();
        assert!(!reloaded.requires(&java.id()));
        assert!(reloaded.requires(&python.id()));
        assert_eq!(reloaded.description(), "Now with meal plans");
    }

    #[tokio::test]
    async fn test_list_with_status_filter() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let open = fitness_app();
        let closed = Project::new(
            "Coffee shop ordering system",
            "Orders and menus",
            ExperienceLevel::Intermediate,
            ProjectType::Web,
        )
        .with_status(ProjectStatus::Closed);
        repo.create(&open).await.unwrap();
        repo.create(&closed).await.unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name(), "Coffee shop ordering system");

        let only_open = repo.list(Some(ProjectStatus::Open)).await.unwrap();
        assert_eq!(only_open.len(), 1);
        assert_eq!(only_open[0].id(), open.id());
    }

    #[tokio::test]
    async fn test_delete_keeps_technologies() {
        let db = Database::in_memory().await.unwrap();
        let technologies = TechnologyRepository::new(&db);
        let repo = ProjectRepository::new(&db);

        let firebase = Technology::new("Firebase");
        technologies.create(&firebase).await.unwrap();
        let mut project = fitness_app();
        project.add_required_technology(firebase.id());
        repo.create(&project).await.unwrap();
        assert_eq!(technologies.usage(firebase.id()).await.unwrap(), (0, 1));

        repo.delete(project.id()).await.unwrap();

        assert!(!repo.exists(project.id()).await.unwrap());
        assert!(technologies.exists(firebase.id()).await.unwrap());
        assert_eq!(technologies.usage(firebase.id()).await.unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn test_delete_missing_project() {
        let db = Database::in_memory().await.unwrap();
        let repo = ProjectRepository::new(&db);

        let err = repo.delete(ProjectId::new()).await.unwrap_err();
        assert!(matches!(err, Error::ProjectNotFound(_)));
    }
}
