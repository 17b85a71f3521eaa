use crate::error::{GraphError, Result};
use crate::types::*;
use kinship_names::{NameKey, NameNormalizer};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet};

/// Build a person graph from pre-linked records
pub struct GraphBuilder<'a> {
    normalizer: &'a NameNormalizer,
    records: Vec<PersonRecord>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(normalizer: &'a NameNormalizer) -> Self {
        Self {
            normalizer,
            records: Vec::new(),
        }
    }

    pub fn add_person(&mut self, record: PersonRecord) -> &mut Self {
        self.records.push(record);
        self
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = PersonRecord>) -> &mut Self {
        self.records.extend(records);
        self
    }

    /// Validate every relation and produce the immutable graph
    pub fn build(self) -> Result<PersonGraph> {
        let mut graph: DiGraph<Person, EdgeRole> = DiGraph::with_capacity(self.records.len(), 0);
        let mut id_index: HashMap<PersonId, NodeIndex> = HashMap::new();
        let mut surname_index: HashMap<String, Vec<NodeIndex>> = HashMap::new();
        let mut relations: Vec<(NodeIndex, Vec<Relation>)> = Vec::with_capacity(self.records.len());

        // Phase 1: Create nodes and name keys
        for record in self.records {
            if id_index.contains_key(&record.id) {
                return Err(GraphError::DuplicatePerson(record.id));
            }

            let PersonRecord {
                id,
                primary,
                also_known_as,
                alive,
                birth_year,
                birth_place,
                relations: links,
            } = record;

            let mut person = Person {
                id: id.clone(),
                primary,
                also_known_as,
                alive,
                birth_year,
                birth_place,
                name_keys: Vec::new(),
            };
            person.name_keys = name_keys(self.normalizer, &person);

            let surnames: Vec<String> = person
                .name_keys
                .iter()
                .filter(|key| key.has_surname())
                .map(|key| key.surname_short.clone())
                .collect();

            let idx = graph.add_node(person);
            id_index.insert(id, idx);

            for surname in surnames {
                let bucket = surname_index.entry(surname).or_default();
                if !bucket.contains(&idx) {
                    bucket.push(idx);
                }
            }

            relations.push((idx, links));
        }

        // Phase 2: Resolve relation targets
        let id_of = |idx: NodeIndex| graph[idx].id.clone();
        let mut edges: Vec<(NodeIndex, NodeIndex, EdgeRole)> = Vec::new();
        let mut seen: HashSet<(NodeIndex, NodeIndex, EdgeRole)> = HashSet::new();

        for (from, links) in &relations {
            for link in links {
                let to = *id_index
                    .get(&link.person)
                    .ok_or_else(|| GraphError::DanglingRelation {
                        from: id_of(*from),
                        to: link.person.clone(),
                    })?;

                if to == *from {
                    return Err(GraphError::SelfRelation(id_of(*from)));
                }

                let edge = (*from, to, link.role);
                if !seen.insert(edge) {
                    return Err(GraphError::DuplicateRelation {
                        from: id_of(*from),
                        to: link.person.clone(),
                        role: link.role,
                    });
                }
                edges.push(edge);
            }
        }

        // Phase 3: Every relation needs its mirrored counterpart
        for &(from, to, role) in &edges {
            if !seen.contains(&(to, from, role.inverse())) {
                return Err(GraphError::MissingCounterpart {
                    from: id_of(from),
                    to: id_of(to),
                    role,
                    expected: role.inverse(),
                });
            }
        }

        for (from, to, role) in edges {
            graph.add_edge(from, to, role);
        }

        let person_graph = PersonGraph {
            graph,
            id_index,
            surname_index,
        };

        log::info!(
            "Built person graph: {} persons, {} edges, {} surname keys",
            person_graph.node_count(),
            person_graph.edge_count(),
            person_graph.surname_key_count()
        );

        Ok(person_graph)
    }
}

/// Keys of the primary identity and every a.k.a., without duplicates.
/// An a.k.a. without a sex inherits the primary one.
fn name_keys(normalizer: &NameNormalizer, person: &Person) -> Vec<NameKey> {
    let mut keys: Vec<NameKey> = Vec::new();
    for identity in person.identities() {
        let key = normalizer.key(
            identity.given.as_deref(),
            identity.surname.as_deref(),
            identity.sex.or(person.primary.sex),
        );
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
