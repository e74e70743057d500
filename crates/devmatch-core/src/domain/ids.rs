//! Surrogate identities
//!
//! Every entity gets a UUID at construction. Ids are stored as TEXT and never
//! change after creation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh identity
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// First eight characters, for compact listings
            pub fn short(&self) -> String {
                self.0.simple().to_string()[..8].to_string()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim())
                    .map(Self)
                    .map_err(|_| Error::InvalidId(s.to_string()))
            }
        }
    };
}

entity_id!(
    /// Identity of a [`Developer`](crate::domain::developers::Developer)
    DeveloperId
);
entity_id!(
    /// Identity of an [`Experience`](crate::domain::developers::Experience)
    ExperienceId
);
entity_id!(
    /// Identity of a [`Project`](crate::domain::projects::Project)
    ProjectId
);
entity_id!(
    /// Identity of a [`Technology`](crate::domain::technologies::Technology)
    TechnologyId
);
entity_id!(
    /// Identity of a [`MatchResult`](crate::domain::matching::MatchResult)
    MatchResultId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(DeveloperId::new(), DeveloperId::new());
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = ProjectId::new();
        let parsed: ProjectId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_parse_invalid() {
        let err = "not-a-uuid".parse::<TechnologyId>().unwrap_err();
        assert!(matches!(err, Error::InvalidId(_)));
    }

    #[test]
    fn test_short_form() {
        let id = ExperienceId::new();
        assert_eq!(id.short().len(), 8);
        assert!(id.to_string().starts_with(&id.short()));
    }
}
