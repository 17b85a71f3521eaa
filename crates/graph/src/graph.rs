use crate::error::{GraphError, Result};
use crate::types::{EdgeRole, Person, PersonGraph, PersonId};
use kinship_names::Sex;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;

impl PersonGraph {
    /// Neighbours of `node` with the role each plays relative to it,
    /// ordered by (role, person id)
    pub fn relatives(&self, node: NodeIndex) -> Vec<(NodeIndex, EdgeRole)> {
        let mut related: Vec<(NodeIndex, EdgeRole)> = self
            .graph
            .edges(node)
            .map(|e| (e.target(), *e.weight()))
            .collect();
        related.sort_by(|a, b| {
            a.1.cmp(&b.1)
                .then_with(|| self.graph[a.0].id.cmp(&self.graph[b.0].id))
        });
        related
    }

    /// Neighbours of `node` playing `role`, ordered by person id
    pub fn related_by(&self, node: NodeIndex, role: EdgeRole) -> Vec<NodeIndex> {
        self.relatives(node)
            .into_iter()
            .filter(|(_, r)| *r == role)
            .map(|(idx, _)| idx)
            .collect()
    }

    pub fn parents(&self, id: &PersonId) -> Result<Vec<&Person>> {
        self.persons_related_by(id, EdgeRole::Parent)
    }

    pub fn children(&self, id: &PersonId) -> Result<Vec<&Person>> {
        self.persons_related_by(id, EdgeRole::Child)
    }

    pub fn spouses(&self, id: &PersonId) -> Result<Vec<&Person>> {
        self.persons_related_by(id, EdgeRole::Spouse)
    }

    /// Parents of `id` with the given sex (father or mother); a parent with
    /// unknown sex qualifies for either side
    pub fn parents_of_sex(&self, id: &PersonId, sex: Sex) -> Result<Vec<&Person>> {
        Ok(self
            .parents(id)?
            .into_iter()
            .filter(|p| p.sex().map_or(true, |s| s == sex))
            .collect())
    }

    fn persons_related_by(&self, id: &PersonId, role: EdgeRole) -> Result<Vec<&Person>> {
        let node = self
            .node_index(id)
            .ok_or_else(|| GraphError::UnknownPerson(id.clone()))?;
        Ok(self
            .related_by(node, role)
            .into_iter()
            .map(|idx| &self.graph[idx])
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::builder::GraphBuilder;
    use crate::error::GraphError;
    use crate::types::{EdgeRole, Identity, PersonGraph, PersonId, PersonRecord};
    use kinship_names::{NameNormalizer, Sex};

    fn graph() -> PersonGraph {
        let normalizer = NameNormalizer::default();
        let mut builder = GraphBuilder::new(&normalizer);
        builder.extend(vec![
            PersonRecord::new("@C@", Identity::new("Ana", "Pérez"))
                .parent("@M@")
                .parent("@F@"),
            PersonRecord::new("@M@", Identity::new("Rosa", "Ruiz").sex(Sex::Female))
                .child("@C@")
                .spouse("@F@"),
            PersonRecord::new("@F@", Identity::new("Juan", "Pérez").sex(Sex::Male))
                .child("@C@")
                .spouse("@M@"),
        ]);
        builder.build().unwrap()
    }

    fn ids(persons: Vec<&crate::types::Person>) -> Vec<&str> {
        persons.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_relatives_sorted_by_role_then_id() {
        let graph = graph();
        let mother = graph.node_index(&"@M@".into()).unwrap();
        let related: Vec<(&str, EdgeRole)> = graph
            .relatives(mother)
            .into_iter()
            .map(|(idx, role)| (graph.person(idx).unwrap().id.as_str(), role))
            .collect();
        assert_eq!(
            related,
            vec![("@C@", EdgeRole::Child), ("@F@", EdgeRole::Spouse)]
        );
    }

    #[test]
    fn test_parents_children_spouses() {
        let graph = graph();
        let child = PersonId::new("@C@");
        assert_eq!(ids(graph.parents(&child).unwrap()), vec!["@F@", "@M@"]);
        assert_eq!(ids(graph.children(&"@F@".into()).unwrap()), vec!["@C@"]);
        assert_eq!(ids(graph.spouses(&"@F@".into()).unwrap()), vec!["@M@"]);
        assert_eq!(
            ids(graph.parents_of_sex(&child, Sex::Female).unwrap()),
            vec!["@M@"]
        );
    }

    #[test]
    fn test_unknown_person() {
        let graph = graph();
        assert_eq!(
            graph.parents(&"@X@".into()).unwrap_err(),
            GraphError::UnknownPerson("@X@".into())
        );
    }
}
