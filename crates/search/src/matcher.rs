use crate::fragment::IdentityFragment;
use kinship_graph::{Identity, Person};
use kinship_names::{NameKey, NameNormalizer};
use serde::{Deserialize, Serialize};

/// Strength of a name match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Given name and surname keys agree on some identity pair
    Full,
    /// Only surnames agree, one side has no given name
    SurnameOnly,
}

impl MatchKind {
    /// Base ranking score
    pub fn score(self) -> u32 {
        match self {
            MatchKind::Full => 100,
            MatchKind::SurnameOnly => 40,
        }
    }
}

/// Identity-equivalence decisions over normalized name keys.
///
/// Every identity on either side (primary and a.k.a.) is normalized on its
/// own; a match needs one agreeing pair, so a.k.a. identities can only add
/// matches.
#[derive(Debug, Clone, Default)]
pub struct NameMatcher {
    normalizer: NameNormalizer,
}

impl NameMatcher {
    pub fn new(normalizer: NameNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &NameNormalizer {
        &self.normalizer
    }

    pub fn identity_key(&self, identity: &Identity) -> NameKey {
        self.normalizer.key(
            identity.given.as_deref(),
            identity.surname.as_deref(),
            identity.sex,
        )
    }

    /// Keys of every identity in the fragment, without duplicates
    pub fn fragment_keys(&self, fragment: &IdentityFragment) -> Vec<NameKey> {
        let mut keys: Vec<NameKey> = Vec::new();
        for identity in fragment.identities() {
            if identity.is_blank() {
                continue;
            }
            let key = self.identity_key(&identity);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        keys
    }

    pub fn matches(&self, query: &IdentityFragment, candidate: &Person) -> bool {
        keys_match(&self.fragment_keys(query), &candidate.name_keys)
    }

    pub fn matches_surname_only(&self, query: &IdentityFragment, candidate: &Person) -> bool {
        keys_match_surname_only(&self.fragment_keys(query), &candidate.name_keys)
    }

    /// Strongest match between the fragment and the person, if any
    pub fn classify(&self, query: &IdentityFragment, candidate: &Person) -> Option<MatchKind> {
        classify_keys(&self.fragment_keys(query), &candidate.name_keys)
    }
}

/// Some pair agrees on given name, surname and sex.
///
/// Given names need equal keys; surnames compare through
/// [`NameKey::surname_matches`].
pub fn keys_match(query: &[NameKey], candidate: &[NameKey]) -> bool {
    pairs(query, candidate).any(|(q, c)| q.given == c.given && q.surname_matches(c))
}

/// Some pair agrees on a non-blank surname and sex while one side has no
/// given name
pub fn keys_match_surname_only(query: &[NameKey], candidate: &[NameKey]) -> bool {
    pairs(query, candidate).any(|(q, c)| {
        (!q.has_given() || !c.has_given()) && q.has_surname() && q.surname_matches(c)
    })
}

pub fn classify_keys(query: &[NameKey], candidate: &[NameKey]) -> Option<MatchKind> {
    if keys_match(query, candidate) {
        Some(MatchKind::Full)
    } else if keys_match_surname_only(query, candidate) {
        Some(MatchKind::SurnameOnly)
    } else {
        None
    }
}

/// Cross product of both key lists, minus pairs with conflicting sex
fn pairs<'a>(
    query: &'a [NameKey],
    candidate: &'a [NameKey],
) -> impl Iterator<Item = (&'a NameKey, &'a NameKey)> + 'a {
    query
        .iter()
        .flat_map(move |q| candidate.iter().map(move |c| (q, c)))
        .filter(|(q, c)| q.sex_agrees(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_names::Sex;

    fn key(given: &str, surname: &str, sex: Option<Sex>) -> NameKey {
        NameKey::new(given, surname, sex)
    }

    #[test]
    fn test_full_match_needs_both_components() {
        let q = [key("valeria", "peres", None)];
        assert!(keys_match(&q, &[key("valeria", "peres", Some(Sex::Female))]));
        assert!(!keys_match(&q, &[key("valeria", "ruis", None)]));
        assert!(!keys_match(&q, &[key("", "peres", None)]));
    }

    #[test]
    fn test_sex_conflict_invalidates_pair() {
        let q = [key("andrea", "costa", Some(Sex::Male))];
        let c = [key("andrea", "costa", Some(Sex::Female))];
        assert!(!keys_match(&q, &c));
        assert!(!keys_match_surname_only(&[key("", "costa", Some(Sex::Male))], &c));
    }

    #[test]
    fn test_surname_only_requires_missing_given() {
        let c = [key("valeria", "peres", None)];
        assert!(keys_match_surname_only(&[key("", "peres", None)], &c));
        assert!(!keys_match_surname_only(&[key("ana", "peres", None)], &c));
        assert!(!keys_match_surname_only(&[key("", "", None)], &[key("", "", None)]));
    }

    #[test]
    fn test_blank_is_not_a_wildcard() {
        assert!(!keys_match(&[key("", "peres", None)], &[key("ana", "peres", None)]));
        assert!(keys_match(&[key("", "peres", None)], &[key("", "peres", None)]));
    }

    #[test]
    fn test_surnames_match_on_shortened_key() {
        let q = [key("joao", "pereira", None)];
        assert!(keys_match(&q, &[key("joao", "pereiro", None)]));
        assert!(keys_match_surname_only(&[key("", "pereira", None)], &[key("joao", "pereiro", None)]));
        // Short stems ending in a vowel need the whole word
        assert!(!keys_match(&[key("ana", "rosa", None)], &[key("ana", "rose", None)]));
    }

    #[test]
    fn test_given_names_need_equal_keys() {
        let c = [key("juan carlos", "peres", None)];
        assert!(!keys_match(&[key("juan", "peres", None)], &c));
        assert!(keys_match(&[key("juan carlos", "peres", None)], &c));
    }

    #[test]
    fn test_classify_prefers_full() {
        let q = [key("ana", "peres", None), key("", "peres", None)];
        let c = [key("ana", "peres", None)];
        assert_eq!(classify_keys(&q, &c), Some(MatchKind::Full));
        assert_eq!(
            classify_keys(&q[1..], &c),
            Some(MatchKind::SurnameOnly)
        );
        assert_eq!(classify_keys(&q, &[key("ana", "gil", None)]), None);
    }
}
