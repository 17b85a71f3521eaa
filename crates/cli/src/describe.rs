use kinship_graph::{EdgeRole, PersonGraph, PersonId, RelationshipDescriber, RelationshipPath};
use kinship_names::Sex;

/// Possessive English labels such as "father's brother's wife".
///
/// A parent step directly followed by a child step reads as a sibling;
/// every other step is named by the role and the sex of the person it
/// reaches.
pub struct EnglishDescriber;

impl RelationshipDescriber for EnglishDescriber {
    type Output = String;

    fn describe(&self, path: &RelationshipPath, graph: &PersonGraph) -> String {
        let steps = path.steps();
        if steps.is_empty() {
            return "self".to_string();
        }

        let sex_of = |id: &PersonId| graph.person_by_id(id).and_then(|p| p.sex());
        let mut words = Vec::new();
        let mut i = 0;

        while i < steps.len() {
            let sibling = steps[i].role == EdgeRole::Parent
                && steps.get(i + 1).map(|s| s.role) == Some(EdgeRole::Child);
            if sibling {
                words.push(sibling_word(sex_of(&steps[i + 1].to)));
                i += 2;
            } else {
                words.push(role_word(steps[i].role, sex_of(&steps[i].to)));
                i += 1;
            }
        }

        words.join("'s ")
    }
}

fn sibling_word(sex: Option<Sex>) -> &'static str {
    match sex {
        Some(Sex::Male) => "brother",
        Some(Sex::Female) => "sister",
        None => "sibling",
    }
}

fn role_word(role: EdgeRole, sex: Option<Sex>) -> &'static str {
    match (role, sex) {
        (EdgeRole::Parent, Some(Sex::Male)) => "father",
        (EdgeRole::Parent, Some(Sex::Female)) => "mother",
        (EdgeRole::Parent, None) => "parent",
        (EdgeRole::Child, Some(Sex::Male)) => "son",
        (EdgeRole::Child, Some(Sex::Female)) => "daughter",
        (EdgeRole::Child, None) => "child",
        (EdgeRole::Spouse, Some(Sex::Male)) => "husband",
        (EdgeRole::Spouse, Some(Sex::Female)) => "wife",
        (EdgeRole::Spouse, None) => "spouse",
    }
}
