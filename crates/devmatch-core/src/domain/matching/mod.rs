//! Matching domain module
//!
//! Scores developers against a project's required technologies and
//! experience level, and stores the results of a matching run.

pub mod result;
pub mod score;
pub mod service;

pub use result::{AiAssessment, MatchResult, MatchResultRepository};
pub use score::{ExperienceFit, experience_fit, technical_match};
pub use service::{
    MatchCandidate, MatchOptions, MatchingService, ProjectMatch, ProjectRanking, rank,
    rank_projects,
};
