use crate::error::{Result, SearchError};
use crate::finder::{MatchOutcome, PersonFinder};
use crate::fragment::FamilyQuery;
use kinship_graph::{PersonId, RelationshipPath, RelationshipResolver, ResolverConfig};
use serde::Serialize;

/// Why one end of a connection search is not a single person
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum EndpointIssue {
    NotFound,
    /// Ranked candidates, best first
    Ambiguous { candidates: Vec<PersonId> },
}

/// Result of linking two queried persons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ConnectionOutcome {
    /// One or both queries did not match exactly one person
    Unresolved {
        first: Option<EndpointIssue>,
        second: Option<EndpointIssue>,
    },
    SamePerson { person: PersonId },
    /// Both persons exist but no path joins them within the resolver limits
    Unrelated { first: PersonId, second: PersonId },
    /// Canonical path from the first person to the second
    Connected {
        first: PersonId,
        second: PersonId,
        path: RelationshipPath,
    },
}

impl ConnectionOutcome {
    pub fn path(&self) -> Option<&RelationshipPath> {
        match self {
            ConnectionOutcome::Connected { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl PersonFinder<'_> {
    /// Match both queries and, when each names exactly one distinct person,
    /// resolve the canonical relationship from the first to the second.
    pub fn find_connection(
        &self,
        first: &FamilyQuery,
        second: &FamilyQuery,
        resolver: &ResolverConfig,
    ) -> Result<ConnectionOutcome> {
        resolver.validate().map_err(SearchError::InvalidConfig)?;

        let first = endpoint(self.find_matches(first)?);
        let second = endpoint(self.find_matches(second)?);

        let (first, second) = match (first, second) {
            (Ok(first), Ok(second)) => (first, second),
            (first, second) => {
                return Ok(ConnectionOutcome::Unresolved {
                    first: first.err(),
                    second: second.err(),
                })
            }
        };

        if first == second {
            return Ok(ConnectionOutcome::SamePerson { person: first });
        }

        let resolution = RelationshipResolver::new(self.graph(), resolver.clone()).resolve(&first)?;
        let outcome = match resolution.canonical_for(&second) {
            Some(path) => ConnectionOutcome::Connected {
                path: path.clone(),
                first,
                second,
            },
            None => ConnectionOutcome::Unrelated { first, second },
        };

        log::info!(
            "Connection: {} steps",
            outcome.path().map_or(0, RelationshipPath::len)
        );
        Ok(outcome)
    }
}

fn endpoint(outcome: MatchOutcome) -> std::result::Result<PersonId, EndpointIssue> {
    match outcome {
        MatchOutcome::NoMatch => Err(EndpointIssue::NotFound),
        MatchOutcome::Unique(candidate) => Ok(candidate.person),
        MatchOutcome::Ambiguous(candidates) => Err(EndpointIssue::Ambiguous {
            candidates: candidates.into_iter().map(|c| c.person).collect(),
        }),
    }
}
