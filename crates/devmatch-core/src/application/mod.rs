//! Application layer
//!
//! Boundary concerns that sit between callers and the domain: structured
//! validation errors and the validators that produce them.

pub mod errors;
pub mod validators;

pub use errors::{Constraint, ValidationError, ValidationErrors};
