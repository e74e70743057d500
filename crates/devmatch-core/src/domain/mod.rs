//! Domain layer
//!
//! Contains the entities, their relations, repositories, and matching logic.

pub mod developers;
pub mod ids;
pub mod matching;
pub mod projects;
pub mod technologies;
