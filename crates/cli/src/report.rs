use crate::describe::EnglishDescriber;
use kinship_graph::{
    EdgeRole, KinshipClass, KinshipSummary, Person, PersonGraph, PersonId, RelationshipDescriber,
    RelationshipPath, Resolution, TreeStats,
};
use kinship_search::ConnectionOutcome;
use serde::Serialize;

/// Placeholder shown instead of a living person's name
pub const LIVING_PLACEHOLDER: &str = "Living";

#[derive(Debug, Clone, Serialize)]
pub struct RelativeReport {
    pub person: PersonId,
    pub name: String,
    pub label: String,
    pub roles: Vec<EdgeRole>,
    pub class: KinshipClass,
    pub summary: KinshipSummary,
    /// Candidate paths the canonical one was chosen from
    pub candidates: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveReport {
    pub root: PersonId,
    pub name: String,
    pub relatives: Vec<RelativeReport>,
    pub stats: TreeStats,
    pub farthest: Option<PersonId>,
}

/// Per-root result of a batch resolve
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RootOutcome {
    Ok(ResolveReport),
    Error { root: PersonId, message: String },
}

/// One person along a connection chain
#[derive(Debug, Clone, Serialize)]
pub struct ChainLink {
    pub person: PersonId,
    pub name: String,
    /// Who this person is to the previous link; empty on the first one
    pub relationship: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConnectionReport {
    #[serde(flatten)]
    pub outcome: ConnectionOutcome,
    /// How the second person relates to the first
    pub label: Option<String>,
    pub chain: Vec<ChainLink>,
}

pub fn build_connection_report(
    graph: &PersonGraph,
    outcome: ConnectionOutcome,
    obfuscate_living: bool,
) -> ConnectionReport {
    let name_of = |id: &PersonId| {
        graph
            .person_by_id(id)
            .map(|person| display_name(person, obfuscate_living))
            .unwrap_or_default()
    };

    let (label, chain) = match outcome.path() {
        Some(path) => {
            let start = path.steps().first().map(|step| ChainLink {
                person: step.from.clone(),
                name: name_of(&step.from),
                relationship: None,
            });
            let links = path.steps().iter().map(|step| ChainLink {
                person: step.to.clone(),
                name: name_of(&step.to),
                relationship: Some(
                    EnglishDescriber.describe(&RelationshipPath::from_steps(vec![step.clone()]), graph),
                ),
            });
            (
                Some(EnglishDescriber.describe(path, graph)),
                start.into_iter().chain(links).collect(),
            )
        }
        None => (None, Vec::new()),
    };

    ConnectionReport {
        outcome,
        label,
        chain,
    }
}

pub fn build_report(graph: &PersonGraph, resolution: &Resolution, obfuscate_living: bool) -> ResolveReport {
    let name_of = |id: &PersonId| {
        graph
            .person_by_id(id)
            .map(|person| display_name(person, obfuscate_living))
            .unwrap_or_default()
    };

    let relatives = resolution
        .iter()
        .filter(|(id, _)| *id != resolution.root())
        .map(|(id, path)| RelativeReport {
            person: id.clone(),
            name: name_of(id),
            label: EnglishDescriber.describe(path, graph),
            roles: path.roles().collect(),
            class: path.class(),
            summary: path.summary(),
            candidates: resolution.candidate_count(id).unwrap_or_default(),
        })
        .collect();

    ResolveReport {
        root: resolution.root().clone(),
        name: name_of(resolution.root()),
        relatives,
        stats: resolution.stats(),
        farthest: resolution.farthest().map(|(id, _)| id.clone()),
    }
}

fn display_name(person: &Person, obfuscate_living: bool) -> String {
    if obfuscate_living && person.alive {
        LIVING_PLACEHOLDER.to_string()
    } else {
        person.display_name()
    }
}

pub fn render_markdown(outcomes: &[RootOutcome]) -> String {
    let mut md = String::new();
    for outcome in outcomes {
        match outcome {
            RootOutcome::Ok(report) => {
                md.push_str(&format!(
                    "# Relatives of {} (`{}`)\n\n",
                    escape_cell(&report.name),
                    report.root
                ));
                md.push_str(&format!(
                    "- Persons: `{}` (blood `{}`, by marriage `{}`)\n",
                    report.stats.persons, report.stats.blood_relatives, report.stats.in_laws
                ));
                md.push_str(&format!(
                    "- Generations: `{}` up, `{}` down\n\n",
                    report.stats.ancestor_generations, report.stats.descendant_generations
                ));
                md.push_str("| id | name | relationship | steps |\n");
                md.push_str("|---|---|---|---:|\n");
                for relative in &report.relatives {
                    md.push_str(&format!(
                        "| `{}` | {} | {} | `{}` |\n",
                        relative.person,
                        escape_cell(&relative.name),
                        escape_cell(&relative.label),
                        relative.roles.len()
                    ));
                }
                md.push('\n');
            }
            RootOutcome::Error { root, message } => {
                md.push_str(&format!("# `{root}` failed\n\n{}\n\n", escape_cell(message)));
            }
        }
    }
    md
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_graph::{GraphBuilder, Identity, PersonRecord, RelationshipResolver, ResolverConfig};
    use kinship_names::{NameNormalizer, Sex};

    fn report(obfuscate_living: bool) -> ResolveReport {
        let normalizer = NameNormalizer::default();
        let mut builder = GraphBuilder::new(&normalizer);
        builder.extend(vec![
            PersonRecord::new("@F@", Identity::new("Juan", "Pérez").sex(Sex::Male)).child("@C@"),
            PersonRecord::new("@C@", Identity::new("Ana", "Pérez").sex(Sex::Female))
                .alive(true)
                .parent("@F@"),
        ]);
        let graph = builder.build().unwrap();
        let resolution = RelationshipResolver::new(&graph, ResolverConfig::default())
            .resolve(&"@F@".into())
            .unwrap();
        build_report(&graph, &resolution, obfuscate_living)
    }

    #[test]
    fn report_lists_relatives_without_root() {
        let report = report(false);
        assert_eq!(report.name, "Juan Pérez");
        assert_eq!(report.relatives.len(), 1);
        assert_eq!(report.relatives[0].label, "daughter");
        assert_eq!(report.relatives[0].name, "Ana Pérez");
        assert_eq!(report.stats.descendant_generations, 1);
    }

    #[test]
    fn living_names_are_obfuscated_on_request() {
        let report = report(true);
        assert_eq!(report.relatives[0].name, LIVING_PLACEHOLDER);
        assert_eq!(report.name, "Juan Pérez");
    }

    #[test]
    fn connection_chain_names_each_step() {
        let normalizer = NameNormalizer::default();
        let mut builder = GraphBuilder::new(&normalizer);
        builder.extend(vec![
            PersonRecord::new("@G@", Identity::new("Pedro", "Pérez").sex(Sex::Male))
                .child("@F@")
                .child("@U@"),
            PersonRecord::new("@F@", Identity::new("Juan", "Pérez").sex(Sex::Male))
                .parent("@G@")
                .child("@R@"),
            PersonRecord::new("@U@", Identity::new("Luis", "Pérez").sex(Sex::Male)).parent("@G@"),
            PersonRecord::new("@R@", Identity::new("Valeria", "Pérez").sex(Sex::Female))
                .alive(true)
                .parent("@F@"),
        ]);
        let graph = builder.build().unwrap();
        let resolution = RelationshipResolver::new(&graph, ResolverConfig::default())
            .resolve(&"@R@".into())
            .unwrap();
        let outcome = ConnectionOutcome::Connected {
            first: "@R@".into(),
            second: "@U@".into(),
            path: resolution.canonical_for(&"@U@".into()).unwrap().clone(),
        };

        let report = build_connection_report(&graph, outcome, true);
        assert_eq!(report.label.as_deref(), Some("father's brother"));
        let names: Vec<&str> = report.chain.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec![LIVING_PLACEHOLDER, "Juan Pérez", "Pedro Pérez", "Luis Pérez"]);
        let steps: Vec<Option<&str>> = report
            .chain
            .iter()
            .map(|l| l.relationship.as_deref())
            .collect();
        assert_eq!(steps, vec![None, Some("father"), Some("father"), Some("son")]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "connected");
        assert_eq!(json["chain"][3]["person"], "@U@");
    }

    #[test]
    fn unconnected_report_has_no_chain() {
        let graph = GraphBuilder::new(&NameNormalizer::default()).build().unwrap();
        let report = build_connection_report(
            &graph,
            ConnectionOutcome::SamePerson {
                person: "@R@".into(),
            },
            false,
        );
        assert!(report.chain.is_empty());
        assert!(report.label.is_none());
    }

    #[test]
    fn markdown_renders_headers_and_errors() {
        let md = render_markdown(&[
            RootOutcome::Ok(report(false)),
            RootOutcome::Error {
                root: "@X@".into(),
                message: "Person not found: @X@".to_string(),
            },
        ]);
        assert!(md.contains("# Relatives of Juan Pérez (`@F@`)"));
        assert!(md.contains("| `@C@` | Ana Pérez | daughter | `1` |"));
        assert!(md.contains("# `@X@` failed"));
    }
}
