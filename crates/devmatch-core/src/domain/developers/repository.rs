//! Developer repository for database operations
//!
//! A developer is written together with its skill rows and owned experiences
//! in one transaction. Experience rows that the developer no longer holds are
//! deleted on save, and deleting a developer deletes everything it owns.

use std::collections::{BTreeSet, HashMap};

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::application::validators::DeveloperValidator;
use crate::domain::ids::{DeveloperId, ExperienceId, TechnologyId};
use crate::domain::projects::ExperienceLevel;
use crate::domain::technologies::repository::ensure_technologies_exist;
use crate::error::{Error, Result};
use crate::storage::Database;
use crate::storage::rows::get_id;

use super::entity::Developer;
use super::experience::Experience;

const SELECT_DEVELOPER: &str =
    "SELECT id, name, email, experience_level, bio, location, github_profile FROM developers";

/// Developer repository for database operations
pub struct DeveloperRepository<'a> {
    db: &'a Database,
}

impl<'a> DeveloperRepository<'a> {
    /// Create a new developer repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Validate and insert a new developer with its skills and experiences
    pub async fn create(&self, developer: &Developer) -> Result<()> {
        self.validate(developer).await?;

        let mut tx = self.db.pool().begin().await?;
        insert_developer(&mut tx, developer).await?;
        tx.commit().await?;

        tracing::info!(id = %developer.id(), name = developer.name(), "Created developer");
        Ok(())
    }

    /// Validate and update an existing developer, syncing skills and experiences
    pub async fn update(&self, developer: &Developer) -> Result<()> {
        self.validate(developer).await?;

        let mut tx = self.db.pool().begin().await?;
        ensure_technologies_exist(&mut *tx, developer.skills()).await?;

        let result = sqlx::query(
            r#"
            UPDATE developers
            SET name = ?, email = ?, experience_level = ?, bio = ?, location = ?, github_profile = ?
            WHERE id = ?
            "#,
        )
        .bind(developer.name())
        .bind(developer.email())
        .bind(developer.experience_level().map(|l| l.as_str()))
        .bind(developer.bio())
        .bind(developer.location())
        .bind(developer.github_profile())
        .bind(developer.id().to_string())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::DeveloperNotFound(developer.id().to_string()));
        }

        write_skills(&mut tx, developer).await?;
        write_experiences(&mut tx, developer).await?;
        tx.commit().await?;

        tracing::debug!(id = %developer.id(), "Updated developer");
        Ok(())
    }

    /// Insert or update depending on whether the developer is stored
    pub async fn save(&self, developer: &Developer) -> Result<()> {
        if self.exists(developer.id()).await? {
            self.update(developer).await
        } else {
            self.create(developer).await
        }
    }

    /// Get a developer by ID, with skills and experiences
    pub async fn get(&self, id: DeveloperId) -> Result<Option<Developer>> {
        let row = sqlx::query(&format!("{} WHERE id = ?", SELECT_DEVELOPER))
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row_to_developer(&row)?).await?)),
            None => Ok(None),
        }
    }

    /// Get a developer by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<Developer>> {
        let row = sqlx::query(&format!("{} WHERE email = ?", SELECT_DEVELOPER))
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row_to_developer(&row)?).await?)),
            None => Ok(None),
        }
    }

    /// List all developers ordered by name
    pub async fn list(&self) -> Result<Vec<Developer>> {
        let rows = sqlx::query(&format!("{} ORDER BY name, id", SELECT_DEVELOPER))
            .fetch_all(self.db.pool())
            .await?;

        let mut skills: HashMap<DeveloperId, Vec<TechnologyId>> = HashMap::new();
        for row in sqlx::query("SELECT developer_id, technology_id FROM developer_skills")
            .fetch_all(self.db.pool())
            .await?
        {
            skills
                .entry(get_id(&row, "developer_id")?)
                .or_default()
                .push(get_id(&row, "technology_id")?);
        }

        let mut experiences: HashMap<DeveloperId, Vec<Experience>> = HashMap::new();
        for row in sqlx::query("SELECT id, developer_id, description, category FROM experiences")
            .fetch_all(self.db.pool())
            .await?
        {
            let experience = row_to_experience(&row)?;
            let owner = get_id(&row, "developer_id")?;
            experiences.entry(owner).or_default().push(experience);
        }

        let mut developers = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut developer = row_to_developer(row)?;
            for technology_id in skills.remove(&developer.id()).unwrap_or_default() {
                developer.add_skill(technology_id);
            }
            for experience in experiences.remove(&developer.id()).unwrap_or_default() {
                developer.add_experience(experience);
            }
            developers.push(developer);
        }

        Ok(developers)
    }

    /// Delete a developer together with its experiences, skill rows, and
    /// recorded match results
    pub async fn delete(&self, id: DeveloperId) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;
        let id_str = id.to_string();

        let experiences = sqlx::query("DELETE FROM experiences WHERE developer_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM developer_skills WHERE developer_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM match_results WHERE developer_id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?;
        let deleted = sqlx::query("DELETE FROM developers WHERE id = ?")
            .bind(&id_str)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if deleted == 0 {
            // Dropping the transaction rolls it back
            return Err(Error::DeveloperNotFound(id_str));
        }

        tx.commit().await?;
        tracing::info!(id = %id, experiences, "Deleted developer");
        Ok(())
    }

    /// Check if a developer exists
    pub async fn exists(&self, id: DeveloperId) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM developers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Check if another developer already uses this email
    pub async fn email_taken(&self, email: &str, exclude: Option<DeveloperId>) -> Result<bool> {
        let row: Option<(String,)> = sqlx::query_as("SELECT id FROM developers WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(match (row, exclude) {
            (Some((id,)), Some(exclude)) => id != exclude.to_string(),
            (Some(_), None) => true,
            (None, _) => false,
        })
    }

    /// Count stored developers
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM developers")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    /// Field constraints plus email uniqueness
    async fn validate(&self, developer: &Developer) -> Result<()> {
        let mut errors = match DeveloperValidator::validate(developer) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(email) = developer.email() {
            if self.email_taken(email, Some(developer.id())).await? {
                errors.push(ValidationError::unique("email", email));
            }
        }

        errors.into_result().map_err(Error::from)
    }

    async fn hydrate(&self, mut developer: Developer) -> Result<Developer> {
        let id = developer.id().to_string();

        let skill_rows =
            sqlx::query("SELECT technology_id FROM developer_skills WHERE developer_id = ?")
                .bind(&id)
                .fetch_all(self.db.pool())
                .await?;
        for row in &skill_rows {
            developer.add_skill(get_id(row, "technology_id")?);
        }

        let experience_rows = sqlx::query(
            "SELECT id, developer_id, description, category \
             FROM experiences WHERE developer_id = ?",
        )
        .bind(&id)
        .fetch_all(self.db.pool())
        .await?;
        for row in &experience_rows {
            developer.add_experience(row_to_experience(row)?);
        }

        Ok(developer)
    }
}

/// Insert an already validated developer with its skills and experiences on `conn`
pub(crate) async fn insert_developer(
    conn: &mut SqliteConnection,
    developer: &Developer,
) -> Result<()> {
    ensure_technologies_exist(&mut *conn, developer.skills()).await?;

    sqlx::query(
        r#"
        INSERT INTO developers (id, name, email, experience_level, bio, location, github_profile)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(developer.id().to_string())
    .bind(developer.name())
    .bind(developer.email())
    .bind(developer.experience_level().map(|l| l.as_str()))
    .bind(developer.bio())
    .bind(developer.location())
    .bind(developer.github_profile())
    .execute(&mut *conn)
    .await?;

    write_skills(&mut *conn, developer).await?;
    write_experiences(&mut *conn, developer).await
}

/// Replace the developer's skill rows with its current skill set
async fn write_skills(conn: &mut SqliteConnection, developer: &Developer) -> Result<()> {
    let id = developer.id().to_string();

    sqlx::query("DELETE FROM developer_skills WHERE developer_id = ?")
        .bind(&id)
        .execute(&mut *conn)
        .await?;

    for technology_id in developer.skills() {
        sqlx::query("INSERT INTO developer_skills (developer_id, technology_id) VALUES (?, ?)")
            .bind(&id)
            .bind(technology_id.to_string())
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// Upsert owned experiences and delete the ones no longer held
async fn write_experiences(conn: &mut SqliteConnection, developer: &Developer) -> Result<()> {
    let id = developer.id().to_string();

    let current: BTreeSet<ExperienceId> = developer.experiences().map(|e| e.id()).collect();
    let stored: Vec<(String,)> = sqlx::query_as("SELECT id FROM experiences WHERE developer_id = ?")
        .bind(&id)
        .fetch_all(&mut *conn)
        .await?;

    for (stored_id,) in stored {
        let experience_id: ExperienceId = stored_id.parse()?;
        if !current.contains(&experience_id) {
            sqlx::query("DELETE FROM experiences WHERE id = ?")
                .bind(&stored_id)
                .execute(&mut *conn)
                .await?;
            tracing::debug!(
                developer = %developer.id(),
                experience = %experience_id,
                "Removed orphaned experience"
            );
        }
    }

    for experience in developer.experiences() {
        sqlx::query(
            r#"
            INSERT INTO experiences (id, developer_id, description, category)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                developer_id = excluded.developer_id,
                description = excluded.description,
                category = excluded.category
            "#,
        )
        .bind(experience.id().to_string())
        .bind(&id)
        .bind(experience.description())
        .bind(experience.category())
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

fn row_to_developer(row: &SqliteRow) -> Result<Developer> {
    let level: Option<String> = row.try_get("experience_level")?;
    let mut developer = Developer::with_id(get_id(row, "id")?, row.try_get("name")?);
    developer.set_email(row.try_get("email")?);
    developer.set_experience_level(level.as_deref().and_then(ExperienceLevel::parse));
    developer.set_bio(row.try_get("bio")?);
    developer.set_location(row.try_get("location")?);
    developer.set_github_profile(row.try_get("github_profile")?);
    Ok(developer)
}

fn row_to_experience(row: &SqliteRow) -> Result<Experience> {
    Ok(Experience::from_parts(
        get_id(row, "id")?,
        get_id(row, "developer_id")?,
        row.try_get("description")?,
        row.try_get("category")?,
    ))
}
