//! Storage layer - SQLite
//!
//! Provides database management, migrations, and demo seed data for devmatch.
//!
//! # Architecture
//!
//! - `database`: Connection pool management and initialization
//! - `migrations`: Schema versioning and automatic migration
//! - `seed`: Demo dataset loaded into an empty database
//!
//! # Usage
//!
//! ```ignore
//! use devmatch_core::storage::{Database, DatabaseConfig};
//!
//! // Create an in-memory database for testing
//! let db = Database::in_memory().await?;
//!
//! // Or open the configured database file
//! let db = Database::new(DatabaseConfig::with_path("devmatch.db")).await?;
//! ```

pub mod database;
pub mod migrations;
pub mod seed;
pub(crate) mod rows;

// Re-export commonly used types
pub use database::{Database, DatabaseConfig, default_database_path};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
pub use seed::{SeedReport, seed_if_empty};
