//! Developer domain module
//!
//! A developer holds a profile, a set of skills (technology ids), and the
//! experience records it exclusively owns.
//!
//! # Ownership
//!
//! - Skills are shared references: the technology outlives any developer.
//! - Experiences belong to exactly one developer at a time. Attach and detach
//!   only through [`Developer::add_experience`] and
//!   [`Developer::remove_experience`], which keep the owner reference in sync.
//! - An experience detached and not re-attached elsewhere is deleted the next
//!   time the developer is saved.

pub mod entity;
pub mod experience;
pub mod repository;

pub use entity::{Developer, DeveloperView, ExperienceMut};
pub use experience::{Experience, ExperienceView};
pub use repository::DeveloperRepository;
