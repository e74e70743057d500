//! Database migrations
//!
//! This module manages SQLite schema migrations for devmatch.
//! Migrations are versioned and applied automatically on database connection.
//!
//! Foreign keys never cascade. Removing a developer or project deletes its
//! dependent rows explicitly inside the repository's transaction.

use sqlx::SqlitePool;

/// Current schema version
pub const CURRENT_VERSION: i32 = 2;

/// SQL for creating the migrations tracking table
const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: Core data model
const MIGRATION_V1: &str = r#"
    -- Technologies (skills / tags)
    CREATE TABLE IF NOT EXISTS technologies (
        id TEXT PRIMARY KEY NOT NULL,
        name VARCHAR(100) NOT NULL UNIQUE COLLATE NOCASE,
        category VARCHAR(50)
    );

    -- Developers
    CREATE TABLE IF NOT EXISTS developers (
        id TEXT PRIMARY KEY NOT NULL,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(100) UNIQUE,
        experience_level VARCHAR(50)
            CHECK (experience_level IN ('Beginner', 'Intermediate', 'Advanced')),
        bio TEXT,
        location VARCHAR(200),
        github_profile VARCHAR(100)
    );

    CREATE INDEX IF NOT EXISTS idx_developers_name ON developers(name);

    -- Developer skills (many-to-many)
    CREATE TABLE IF NOT EXISTS developer_skills (
        developer_id TEXT NOT NULL REFERENCES developers(id),
        technology_id TEXT NOT NULL REFERENCES technologies(id),
        PRIMARY KEY (developer_id, technology_id)
    );

    CREATE INDEX IF NOT EXISTS idx_developer_skills_technology_id
        ON developer_skills(technology_id);

    -- Experiences, each owned by exactly one developer
    CREATE TABLE IF NOT EXISTS experiences (
        id TEXT PRIMARY KEY NOT NULL,
        developer_id TEXT NOT NULL REFERENCES developers(id),
        description TEXT NOT NULL,
        category VARCHAR(100)
    );

    CREATE INDEX IF NOT EXISTS idx_experiences_developer_id ON experiences(developer_id);

    -- Projects
    CREATE TABLE IF NOT EXISTS projects (
        id TEXT PRIMARY KEY NOT NULL,
        name VARCHAR(200) NOT NULL,
        description TEXT NOT NULL,
        experience_level VARCHAR(50) NOT NULL
            CHECK (experience_level IN ('Beginner', 'Intermediate', 'Advanced')),
        project_type VARCHAR(50) NOT NULL CHECK (project_type IN ('Web', 'Mobile', 'Desktop')),
        status VARCHAR(50) NOT NULL DEFAULT 'Open'
            CHECK (status IN ('Open', 'In Progress', 'Closed'))
    );

    CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);
    CREATE INDEX IF NOT EXISTS idx_projects_name ON projects(name);

    -- Project required technologies (many-to-many)
    CREATE TABLE IF NOT EXISTS project_technologies (
        project_id TEXT NOT NULL REFERENCES projects(id),
        technology_id TEXT NOT NULL REFERENCES technologies(id),
        PRIMARY KEY (project_id, technology_id)
    );

    CREATE INDEX IF NOT EXISTS idx_project_technologies_technology_id
        ON project_technologies(technology_id);
"#;

/// Migration 2: Recorded match results
const MIGRATION_V2: &str = r#"
    CREATE TABLE IF NOT EXISTS match_results (
        id TEXT PRIMARY KEY NOT NULL,
        project_id TEXT NOT NULL REFERENCES projects(id),
        developer_id TEXT NOT NULL REFERENCES developers(id),
        technical_match REAL NOT NULL,
        ai_technical_affinity INTEGER CHECK (ai_technical_affinity BETWEEN 0 AND 100),
        ai_motivational_affinity INTEGER CHECK (ai_motivational_affinity BETWEEN 0 AND 100),
        ai_experience_relevance INTEGER CHECK (ai_experience_relevance BETWEEN 0 AND 100),
        ai_comment TEXT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_match_results_project_id ON match_results(project_id);
    CREATE INDEX IF NOT EXISTS idx_match_results_developer_id ON match_results(developer_id);
"#;

/// Get the current schema version from the database
async fn get_current_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    // Ensure migrations table exists
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;

    // MAX() over an empty table yields a single NULL row
    let (version,): (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM _migrations")
        .fetch_one(pool)
        .await?;

    Ok(version.unwrap_or(0))
}

/// Record that a migration has been applied
async fn record_migration(pool: &SqlitePool, version: i32) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
        .bind(version)
        .execute(pool)
        .await?;
    Ok(())
}

/// Run all pending migrations
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    let current_version = get_current_version(pool).await?;

    tracing::info!(
        current_version = current_version,
        target_version = CURRENT_VERSION,
        "Checking database migrations"
    );

    if current_version >= CURRENT_VERSION {
        tracing::debug!("Database is up to date");
        return Ok(());
    }

    if current_version < 1 {
        tracing::info!("Applying migration v1: Core data model");
        sqlx::raw_sql(MIGRATION_V1).execute(pool).await?;
        record_migration(pool, 1).await?;
    }

    if current_version < 2 {
        tracing::info!("Applying migration v2: Match results");
        sqlx::raw_sql(MIGRATION_V2).execute(pool).await?;
        record_migration(pool, 2).await?;
    }

    tracing::info!("Database migrations completed");
    Ok(())
}

/// Check if the database needs migrations
pub async fn needs_migration(pool: &SqlitePool) -> anyhow::Result<bool> {
    let current_version = get_current_version(pool).await?;
    Ok(current_version < CURRENT_VERSION)
}

/// Get migration status information
pub async fn migration_status(pool: &SqlitePool) -> anyhow::Result<MigrationStatus> {
    let current_version = get_current_version(pool).await?;
    Ok(MigrationStatus {
        current_version,
        target_version: CURRENT_VERSION,
        needs_migration: current_version < CURRENT_VERSION,
    })
}

/// Migration status information
#[derive(Debug, Clone)]
pub struct MigrationStatus {
    /// Current schema version in the database
    pub current_version: i32,
    /// Target schema version (latest)
    pub target_version: i32,
    /// Whether migrations need to be run
    pub needs_migration: bool,
}
