//! Technology domain module
//!
//! A technology is a named skill or tag shared by developers (as skills) and
//! projects (as requirements). Its lifetime is independent of anything that
//! references it.

pub mod entity;
pub mod repository;

pub use entity::{Technology, TechnologyCatalog, TechnologyView};
pub use repository::TechnologyRepository;
