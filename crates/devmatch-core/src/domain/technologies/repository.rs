//! Technology repository for database operations

use std::collections::BTreeSet;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};

use crate::application::errors::{ValidationError, ValidationErrors};
use crate::application::validators::TechnologyValidator;
use crate::domain::ids::TechnologyId;
use crate::error::{Error, Result};
use crate::storage::Database;
use crate::storage::rows::get_id;

use super::entity::{Technology, TechnologyCatalog};

/// Technology repository for database operations
pub struct TechnologyRepository<'a> {
    db: &'a Database,
}

impl<'a> TechnologyRepository<'a> {
    /// Create a new technology repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Validate and insert a new technology
    pub async fn create(&self, technology: &Technology) -> Result<()> {
        TechnologyValidator::validate(technology)?;
        self.ensure_name_available(technology).await?;

        let mut conn = self.db.pool().acquire().await?;
        insert_technology(&mut conn, technology).await?;

        tracing::debug!(id = %technology.id(), name = technology.name(), "Created technology");
        Ok(())
    }

    /// Get a technology by ID
    pub async fn get(&self, id: TechnologyId) -> Result<Option<Technology>> {
        let row = sqlx::query("SELECT id, name, category FROM technologies WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_technology).transpose()
    }

    /// Get a technology by name, ignoring case
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Technology>> {
        let row = sqlx::query("SELECT id, name, category FROM technologies WHERE name = ?")
            .bind(name.trim())
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(row_to_technology).transpose()
    }

    /// Find a technology by name or create it with the given category
    pub async fn get_or_create(&self, name: &str, category: Option<&str>) -> Result<Technology> {
        if let Some(existing) = self.get_by_name(name).await? {
            return Ok(existing);
        }

        let mut technology = Technology::new(name.trim());
        technology.set_category(category.map(str::to_string));
        self.create(&technology).await?;
        Ok(technology)
    }

    /// List all technologies ordered by name
    pub async fn list(&self) -> Result<Vec<Technology>> {
        let rows = sqlx::query("SELECT id, name, category FROM technologies ORDER BY name")
            .fetch_all(self.db.pool())
            .await?;

        rows.iter().map(row_to_technology).collect()
    }

    /// Load every technology into an id lookup
    pub async fn catalog(&self) -> Result<TechnologyCatalog> {
        Ok(TechnologyCatalog::new(self.list().await?))
    }

    /// Validate and update name and category
    pub async fn update(&self, technology: &Technology) -> Result<()> {
        TechnologyValidator::validate(technology)?;
        self.ensure_name_available(technology).await?;

        let result = sqlx::query("UPDATE technologies SET name = ?, category = ? WHERE id = ?")
            .bind(technology.name())
            .bind(technology.category())
            .bind(technology.id().to_string())
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::TechnologyNotFound(technology.id().to_string()));
        }
        Ok(())
    }

    /// Count the developers and projects referencing a technology
    pub async fn usage(&self, id: TechnologyId) -> Result<(i64, i64)> {
        let (developers,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM developer_skills WHERE technology_id = ?")
                .bind(id.to_string())
                .fetch_one(self.db.pool())
                .await?;
        let (projects,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_technologies WHERE technology_id = ?")
                .bind(id.to_string())
                .fetch_one(self.db.pool())
                .await?;

        Ok((developers, projects))
    }

    /// Delete a technology nobody references any more
    pub async fn delete(&self, id: TechnologyId) -> Result<()> {
        let technology = self
            .get(id)
            .await?
            .ok_or_else(|| Error::TechnologyNotFound(id.to_string()))?;

        let (developers, projects) = self.usage(id).await?;
        if developers > 0 || projects > 0 {
            return Err(Error::TechnologyInUse {
                name: technology.name().to_string(),
                developers,
                projects,
            });
        }

        sqlx::query("DELETE FROM technologies WHERE id = ?")
            .bind(id.to_string())
            .execute(self.db.pool())
            .await?;

        tracing::info!(id = %id, name = technology.name(), "Deleted technology");
        Ok(())
    }

    /// Check if a technology exists
    pub async fn exists(&self, id: TechnologyId) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM technologies WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Count stored technologies
    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM technologies")
            .fetch_one(self.db.pool())
            .await?;
        Ok(count)
    }

    async fn ensure_name_available(&self, technology: &Technology) -> Result<()> {
        let row: Option<(String,)> = sqlx::query_as("SELECT id FROM technologies WHERE name = ?")
            .bind(technology.name())
            .fetch_optional(self.db.pool())
            .await?;

        match row {
            Some((id,)) if id != technology.id().to_string() => Err(ValidationErrors::from(
                ValidationError::unique("name", technology.name()),
            )
            .into()),
            _ => Ok(()),
        }
    }
}

/// Insert an already validated technology on `conn`
pub(crate) async fn insert_technology(
    conn: &mut SqliteConnection,
    technology: &Technology,
) -> Result<()> {
    sqlx::query("INSERT INTO technologies (id, name, category) VALUES (?, ?, ?)")
        .bind(technology.id().to_string())
        .bind(technology.name())
        .bind(technology.category())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Fail with `TechnologyNotFound` for the first id that has no row
pub(crate) async fn ensure_technologies_exist(
    conn: &mut SqliteConnection,
    ids: &BTreeSet<TechnologyId>,
) -> Result<()> {
    for id in ids {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM technologies WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&mut *conn)
            .await?;
        if row.is_none() {
            return Err(Error::TechnologyNotFound(id.to_string()));
        }
    }
    Ok(())
}

fn row_to_technology(row: &SqliteRow) -> Result<Technology> {
    Ok(Technology::from_parts(
        get_id(row, "id")?,
        row.try_get("name")?,
        row.try_get("category")?,
    ))
}
