use crate::config::SearchConfig;
use crate::error::{Result, SearchError};
use crate::fragment::{FamilyQuery, IdentityFragment, RelativeRole};
use crate::fuzzy::PlaceScorer;
use crate::matcher::{classify_keys, MatchKind, NameMatcher};
use kinship_graph::{Person, PersonGraph, PersonId};
use kinship_names::NameKey;
use serde::Serialize;
use std::collections::HashSet;

/// Bonus for each query relative found among the candidate's actual relatives
pub const RELATIVE_BONUS: u32 = 25;

/// One scored candidate for the searched individual
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub person: PersonId,
    pub name: String,
    pub score: u32,
    pub kind: MatchKind,
    /// Query relatives that matched the candidate's family
    pub corroborated: Vec<RelativeRole>,
}

/// Search result; ambiguity is surfaced, never resolved silently
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "result", rename_all = "snake_case")]
pub enum MatchOutcome {
    NoMatch,
    Unique(RankedCandidate),
    Ambiguous(Vec<RankedCandidate>),
}

impl MatchOutcome {
    pub fn candidates(&self) -> &[RankedCandidate] {
        match self {
            MatchOutcome::NoMatch => &[],
            MatchOutcome::Unique(candidate) => std::slice::from_ref(candidate),
            MatchOutcome::Ambiguous(candidates) => candidates,
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, MatchOutcome::Unique(_))
    }
}

/// Finds persons matching a family query
pub struct PersonFinder<'a> {
    graph: &'a PersonGraph,
    matcher: &'a NameMatcher,
    config: SearchConfig,
}

impl<'a> PersonFinder<'a> {
    pub fn new(
        graph: &'a PersonGraph,
        matcher: &'a NameMatcher,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate().map_err(SearchError::InvalidConfig)?;
        Ok(Self {
            graph,
            matcher,
            config,
        })
    }

    pub(crate) fn graph(&self) -> &'a PersonGraph {
        self.graph
    }

    /// Rank persons matching the query's individual, best first
    pub fn find_matches(&self, query: &FamilyQuery) -> Result<MatchOutcome> {
        query.validate()?;

        let keys = self.matcher.fragment_keys(&query.individual);
        let relatives: Vec<(RelativeRole, Vec<NameKey>)> = query
            .relatives()
            .map(|(role, fragment)| (role, self.matcher.fragment_keys(fragment)))
            .collect();

        let pool = self.candidate_pool(&keys);
        let mut places = PlaceScorer::new(self.matcher.normalizer());
        let mut ranked = Vec::new();

        for person in &pool {
            let Some(kind) = classify_keys(&keys, &person.name_keys) else {
                continue;
            };
            let Some(vitals) = self.vital_score(&query.individual, person, &mut places) else {
                continue;
            };

            let mut corroborated = Vec::new();
            for (role, relative_keys) in &relatives {
                if self.relative_matches(person, *role, relative_keys)? {
                    corroborated.push(*role);
                }
            }

            ranked.push(RankedCandidate {
                person: person.id.clone(),
                name: person.display_name(),
                score: kind.score() + vitals + RELATIVE_BONUS * corroborated.len() as u32,
                kind,
                corroborated,
            });
        }

        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.person.cmp(&b.person)));

        log::debug!(
            "Query {:?}: {} persons in pool, {} ranked",
            keys,
            pool.len(),
            ranked.len()
        );

        // Decided before truncation so a cut list stays ambiguous
        Ok(match ranked.len() {
            0 => MatchOutcome::NoMatch,
            1 => MatchOutcome::Unique(ranked.remove(0)),
            _ => {
                ranked.truncate(self.config.max_candidates);
                MatchOutcome::Ambiguous(ranked)
            }
        })
    }

    /// Persons indexed under any query surname, or everyone when the query
    /// has no surname
    fn candidate_pool(&self, keys: &[NameKey]) -> Vec<&'a Person> {
        let surnames: Vec<&str> = keys
            .iter()
            .filter(|key| key.has_surname())
            .map(|key| key.surname.as_str())
            .collect();

        if surnames.is_empty() {
            return self.graph.persons().collect();
        }

        let mut seen: HashSet<&PersonId> = HashSet::new();
        let mut pool = Vec::new();
        for surname in surnames {
            for person in self.graph.candidates_for_name(surname) {
                if seen.insert(&person.id) {
                    pool.push(person);
                }
            }
        }
        pool
    }

    /// Birth year, alive flag and place contribution; `None` rejects the
    /// candidate
    fn vital_score(
        &self,
        query: &IdentityFragment,
        person: &Person,
        places: &mut PlaceScorer<'_>,
    ) -> Option<u32> {
        let mut score = 0;

        if let (Some(wanted), Some(actual)) = (query.birth_year, person.birth_year) {
            let diff = wanted.abs_diff(actual);
            if diff == 0 {
                score += 20;
            } else if diff <= self.config.birth_year_tolerance {
                score += 10;
            } else {
                return None;
            }
        }

        if query.alive.is_some_and(|alive| alive != person.alive) {
            return None;
        }

        if let (Some(wanted), Some(actual)) = (&query.birth_place, &person.birth_place) {
            score += places.score(wanted, actual);
        }

        Some(score)
    }

    /// Whether any of the candidate's actual relatives in `role` matches
    fn relative_matches(&self, person: &Person, role: RelativeRole, keys: &[NameKey]) -> Result<bool> {
        let mut generation: Vec<&Person> = vec![person];
        for &sex in role.lineage() {
            let mut next = Vec::new();
            for member in generation {
                next.extend(self.graph.parents_of_sex(&member.id, sex)?);
            }
            generation = next;
        }
        Ok(generation
            .iter()
            .any(|relative| classify_keys(keys, &relative.name_keys).is_some()))
    }
}
