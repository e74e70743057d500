//! Pure scoring functions

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::ids::TechnologyId;
use crate::domain::projects::ExperienceLevel;

/// Percentage (0 to 100) of the required technologies found in `skills`.
///
/// A project that requires nothing scores 0 for everyone.
pub fn technical_match(required: &BTreeSet<TechnologyId>, skills: &BTreeSet<TechnologyId>) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let matched = required.intersection(skills).count();
    matched as f64 / required.len() as f64 * 100.0
}

/// How a developer's level compares to the level a project asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceFit {
    Exact,
    Above,
    Below,
    /// The developer has not stated a level
    Unknown,
}

impl ExperienceFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Above => "above",
            Self::Below => "below",
            Self::Unknown => "unknown",
        }
    }

    /// Sort key: exact first, unknown last
    pub(crate) fn rank(&self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::Above => 1,
            Self::Below => 2,
            Self::Unknown => 3,
        }
    }
}

impl std::fmt::Display for ExperienceFit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn experience_fit(
    project: ExperienceLevel,
    developer: Option<ExperienceLevel>,
) -> ExperienceFit {
    match developer.map(|level| level.cmp(&project)) {
        Some(Ordering::Equal) => ExperienceFit::Exact,
        Some(Ordering::Greater) => ExperienceFit::Above,
        Some(Ordering::Less) => ExperienceFit::Below,
        None => ExperienceFit::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: usize) -> Vec<TechnologyId> {
        (0..n).map(|_| TechnologyId::new()).collect()
    }

    #[test]
    fn test_technical_match_partial() {
        let techs = ids(4);
        let required: BTreeSet<_> = techs.iter().copied().collect();
        let skills: BTreeSet<_> = [techs[0], techs[1], TechnologyId::new()].into_iter().collect();

        assert_eq!(technical_match(&required, &skills), 50.0);
    }

    #[test]
    fn test_technical_match_bounds() {
        let techs = ids(3);
        let required: BTreeSet<_> = techs.iter().copied().collect();

        assert_eq!(technical_match(&required, &required), 100.0);
        assert_eq!(technical_match(&required, &BTreeSet::new()), 0.0);
        assert_eq!(technical_match(&BTreeSet::new(), &required), 0.0);
    }

    #[test]
    fn test_experience_fit() {
        use ExperienceLevel::*;

        assert_eq!(experience_fit(Intermediate, Some(Intermediate)), ExperienceFit::Exact);
        assert_eq!(experience_fit(Beginner, Some(Advanced)), ExperienceFit::Above);
        assert_eq!(experience_fit(Advanced, Some(Intermediate)), ExperienceFit::Below);
        assert_eq!(experience_fit(Advanced, None), ExperienceFit::Unknown);
    }

    #[test]
    fn test_fit_rank_orders_exact_first() {
        let mut fits = vec![
            ExperienceFit::Unknown,
            ExperienceFit::Below,
            ExperienceFit::Exact,
            ExperienceFit::Above,
        ];
        fits.sort_by_key(ExperienceFit::rank);
        assert_eq!(fits[0], ExperienceFit::Exact);
        assert_eq!(fits[3], ExperienceFit::Unknown);
    }
}
