use kinship_names::{shorten_surname, NameKey, Sex};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable person identifier from the source dataset (e.g. "@I42@")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for PersonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Role a related person plays relative to the person the edge starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeRole {
    Parent,
    Child,
    Spouse,
}

/// Generational direction of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Across,
}

impl EdgeRole {
    /// Role of the edge seen from the other end
    pub fn inverse(self) -> Self {
        match self {
            EdgeRole::Parent => EdgeRole::Child,
            EdgeRole::Child => EdgeRole::Parent,
            EdgeRole::Spouse => EdgeRole::Spouse,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            EdgeRole::Parent => Direction::Up,
            EdgeRole::Child => Direction::Down,
            EdgeRole::Spouse => Direction::Across,
        }
    }
}

impl fmt::Display for EdgeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EdgeRole::Parent => "parent",
            EdgeRole::Child => "child",
            EdgeRole::Spouse => "spouse",
        };
        f.write_str(name)
    }
}

/// One (given name, surname) identity of a person
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    #[serde(default)]
    pub given: Option<String>,
    #[serde(default)]
    pub surname: Option<String>,
    #[serde(default)]
    pub sex: Option<Sex>,
}

impl Identity {
    pub fn new(given: &str, surname: &str) -> Self {
        Self::default().given(given).surname(surname)
    }

    pub fn given(mut self, given: &str) -> Self {
        self.given = Some(given.to_string());
        self
    }

    pub fn surname(mut self, surname: &str) -> Self {
        self.surname = Some(surname.to_string());
        self
    }

    pub fn sex(mut self, sex: Sex) -> Self {
        self.sex = Some(sex);
        self
    }

    /// True when neither component carries any text
    pub fn is_blank(&self) -> bool {
        let blank = |part: &Option<String>| part.as_deref().map_or(true, |s| s.trim().is_empty());
        blank(&self.given) && blank(&self.surname)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [self.given.as_deref(), self.surname.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect();
        if parts.is_empty() {
            f.write_str("?")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

/// Typed link to another person, as delivered by the ingestion side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Role the other person plays relative to this one
    pub role: EdgeRole,
    pub person: PersonId,
}

/// Pre-linked person record consumed by [`crate::GraphBuilder`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub id: PersonId,
    pub primary: Identity,
    #[serde(default)]
    pub also_known_as: Vec<Identity>,
    #[serde(default)]
    pub alive: bool,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub birth_place: Option<String>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl PersonRecord {
    pub fn new(id: impl Into<PersonId>, primary: Identity) -> Self {
        Self {
            id: id.into(),
            primary,
            also_known_as: Vec::new(),
            alive: false,
            birth_year: None,
            birth_place: None,
            relations: Vec::new(),
        }
    }

    pub fn aka(mut self, identity: Identity) -> Self {
        self.also_known_as.push(identity);
        self
    }

    pub fn alive(mut self, alive: bool) -> Self {
        self.alive = alive;
        self
    }

    pub fn born(mut self, year: i32) -> Self {
        self.birth_year = Some(year);
        self
    }

    pub fn born_in(mut self, place: &str) -> Self {
        self.birth_place = Some(place.to_string());
        self
    }

    pub fn relation(mut self, role: EdgeRole, person: impl Into<PersonId>) -> Self {
        self.relations.push(Relation {
            role,
            person: person.into(),
        });
        self
    }

    pub fn parent(self, person: impl Into<PersonId>) -> Self {
        self.relation(EdgeRole::Parent, person)
    }

    pub fn child(self, person: impl Into<PersonId>) -> Self {
        self.relation(EdgeRole::Child, person)
    }

    pub fn spouse(self, person: impl Into<PersonId>) -> Self {
        self.relation(EdgeRole::Spouse, person)
    }
}

/// Node in the person graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub primary: Identity,
    pub also_known_as: Vec<Identity>,
    pub alive: bool,
    pub birth_year: Option<i32>,
    pub birth_place: Option<String>,

    /// Normalized keys of the primary identity followed by every a.k.a.
    #[serde(skip)]
    pub name_keys: Vec<NameKey>,
}

impl Person {
    /// Primary identity first, then a.k.a. identities in source order
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        std::iter::once(&self.primary).chain(self.also_known_as.iter())
    }

    /// Sex of the primary identity
    pub fn sex(&self) -> Option<Sex> {
        self.primary.sex
    }

    pub fn display_name(&self) -> String {
        self.primary.to_string()
    }
}

/// Immutable family graph.
///
/// Edges are directed and weighted with the role of the target relative to
/// the source, so every family link is stored once per direction.
#[derive(Debug)]
pub struct PersonGraph {
    pub(crate) graph: DiGraph<Person, EdgeRole>,

    /// Person ID -> NodeIndex mapping
    pub(crate) id_index: HashMap<PersonId, NodeIndex>,

    /// Shortened surname key -> persons carrying it in any identity
    pub(crate) surname_index: HashMap<String, Vec<NodeIndex>>,
}

impl PersonGraph {
    /// Find person by stable ID
    pub fn person_by_id(&self, id: &PersonId) -> Option<&Person> {
        self.node_index(id).and_then(|idx| self.person(idx))
    }

    pub fn node_index(&self, id: &PersonId) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    /// Get node data
    pub fn person(&self, idx: NodeIndex) -> Option<&Person> {
        self.graph.node_weight(idx)
    }

    /// All persons in insertion order
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.graph.node_weights()
    }

    /// Persons whose primary or a.k.a. surname shortens like
    /// `normalized_surname`; callers still confirm with
    /// [`NameKey::surname_matches`]
    pub fn candidates_for_name(&self, normalized_surname: &str) -> Vec<&Person> {
        self.surname_index
            .get(&shorten_surname(normalized_surname))
            .map(|nodes| nodes.iter().filter_map(|&idx| self.person(idx)).collect())
            .unwrap_or_default()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of distinct surname keys in the reverse index
    pub fn surname_key_count(&self) -> usize {
        self.surname_index.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_inverse_and_direction() {
        assert_eq!(EdgeRole::Parent.inverse(), EdgeRole::Child);
        assert_eq!(EdgeRole::Child.inverse(), EdgeRole::Parent);
        assert_eq!(EdgeRole::Spouse.inverse(), EdgeRole::Spouse);
        assert_eq!(EdgeRole::Parent.direction(), Direction::Up);
        assert_eq!(EdgeRole::Spouse.direction(), Direction::Across);
    }

    #[test]
    fn test_role_order() {
        assert!(EdgeRole::Parent < EdgeRole::Child);
        assert!(EdgeRole::Child < EdgeRole::Spouse);
    }

    #[test]
    fn test_identity_display_and_blank() {
        assert_eq!(Identity::new("Valeria", "Pérez").to_string(), "Valeria Pérez");
        assert_eq!(Identity::default().surname("Pérez").to_string(), "Pérez");
        assert!(Identity::default().is_blank());
        assert!(Identity::default().given("  ").is_blank());
        assert!(!Identity::default().surname("Ruiz").is_blank());
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let record: PersonRecord = serde_json::from_str(
            r#"{
                "id": "@I1@",
                "primary": { "given": "Ana", "surname": "Ruiz", "sex": "F" },
                "relations": [{ "role": "parent", "person": "@I2@" }]
            }"#,
        )
        .unwrap();
        assert_eq!(record.id, PersonId::new("@I1@"));
        assert_eq!(record.primary.sex, Some(Sex::Female));
        assert!(!record.alive);
        assert!(record.also_known_as.is_empty());
        assert_eq!(record.relations[0].role, EdgeRole::Parent);
    }
}
