use kinship_graph::{EdgeRole, GraphBuilder, Identity, PersonGraph, PersonId, PersonRecord, ResolverConfig};
use kinship_names::{NameNormalizer, Sex};
use kinship_search::{
    ConnectionOutcome, EndpointIssue, FamilyQuery, IdentityFragment, NameMatcher, PersonFinder,
    SearchConfig, SearchError,
};
use pretty_assertions::assert_eq;

/// Valeria and Carla are first cousins through Pedro; Zoe is on her own
fn family(matcher: &NameMatcher) -> PersonGraph {
    let mut builder = GraphBuilder::new(matcher.normalizer());
    builder.extend(vec![
        PersonRecord::new("@PG@", Identity::new("Pedro", "Pérez").sex(Sex::Male))
            .child("@P@")
            .child("@U@"),
        PersonRecord::new("@P@", Identity::new("Juan", "Pérez").sex(Sex::Male))
            .parent("@PG@")
            .child("@V@"),
        PersonRecord::new("@U@", Identity::new("Luis", "Pérez").sex(Sex::Male))
            .parent("@PG@")
            .child("@C@"),
        PersonRecord::new("@V@", Identity::new("Valeria", "Pérez").sex(Sex::Female))
            .born(1950)
            .parent("@P@"),
        PersonRecord::new("@C@", Identity::new("Carla", "Pérez").sex(Sex::Female)).parent("@U@"),
        PersonRecord::new("@X@", Identity::new("Valeria", "Perez").sex(Sex::Female)).born(1980),
        PersonRecord::new("@Z@", Identity::new("Zoe", "Zapata").sex(Sex::Female)),
    ]);
    builder.build().expect("valid family")
}

fn query(given: &str, surname: &str) -> FamilyQuery {
    FamilyQuery::individual(IdentityFragment::new(given, surname))
}

fn connect(first: &FamilyQuery, second: &FamilyQuery, resolver: &ResolverConfig) -> ConnectionOutcome {
    let matcher = NameMatcher::new(NameNormalizer::default());
    let graph = family(&matcher);
    let finder = PersonFinder::new(&graph, &matcher, SearchConfig::default()).unwrap();
    finder.find_connection(first, second, resolver).unwrap()
}

#[test]
fn cousins_connect_through_grandfather() {
    let valeria = FamilyQuery::individual(IdentityFragment::new("Valeria", "Pérez").born(1950));
    let outcome = connect(&valeria, &query("Carla", "Perez"), &ResolverConfig::default());

    let ConnectionOutcome::Connected { first, second, path } = &outcome else {
        panic!("expected a connection, got {outcome:?}");
    };
    assert_eq!(first, &PersonId::new("@V@"));
    assert_eq!(second, &PersonId::new("@C@"));
    let persons: Vec<&str> = path.persons().map(PersonId::as_str).collect();
    assert_eq!(persons, vec!["@P@", "@PG@", "@U@", "@C@"]);
    let roles: Vec<EdgeRole> = path.roles().collect();
    assert_eq!(
        roles,
        vec![EdgeRole::Parent, EdgeRole::Parent, EdgeRole::Child, EdgeRole::Child]
    );
}

#[test]
fn each_end_reports_its_own_issue() {
    let outcome = connect(
        &query("Valeria", "Pérez"),
        &query("Nadie", "Nunca"),
        &ResolverConfig::default(),
    );
    assert_eq!(
        outcome,
        ConnectionOutcome::Unresolved {
            first: Some(EndpointIssue::Ambiguous {
                candidates: vec![PersonId::new("@V@"), PersonId::new("@X@")],
            }),
            second: Some(EndpointIssue::NotFound),
        }
    );

    let outcome = connect(&query("Carla", "Pérez"), &query("Nadie", "Nunca"), &ResolverConfig::default());
    assert_eq!(
        outcome,
        ConnectionOutcome::Unresolved {
            first: None,
            second: Some(EndpointIssue::NotFound),
        }
    );
}

#[test]
fn one_person_twice_is_not_a_connection() {
    let outcome = connect(&query("Carla", "Pérez"), &query("Carla", "Perez"), &ResolverConfig::default());
    assert_eq!(
        outcome,
        ConnectionOutcome::SamePerson {
            person: PersonId::new("@C@"),
        }
    );
}

#[test]
fn disconnected_persons_are_unrelated() {
    let outcome = connect(&query("Carla", "Pérez"), &query("Zoe", "Zapata"), &ResolverConfig::default());
    assert_eq!(
        outcome,
        ConnectionOutcome::Unrelated {
            first: PersonId::new("@C@"),
            second: PersonId::new("@Z@"),
        }
    );
    assert!(outcome.path().is_none());
}

#[test]
fn step_limit_hides_distant_cousins() {
    let valeria = FamilyQuery::individual(IdentityFragment::new("Valeria", "Pérez").born(1950));
    let outcome = connect(
        &valeria,
        &query("Carla", "Pérez"),
        &ResolverConfig::default().with_max_steps(3),
    );
    assert!(matches!(outcome, ConnectionOutcome::Unrelated { .. }));
}

#[test]
fn invalid_resolver_config_is_rejected() {
    let matcher = NameMatcher::new(NameNormalizer::default());
    let graph = family(&matcher);
    let finder = PersonFinder::new(&graph, &matcher, SearchConfig::default()).unwrap();
    let resolver = ResolverConfig {
        max_steps: Some(0),
        ..Default::default()
    };
    let err = finder
        .find_connection(&query("Carla", "Pérez"), &query("Zoe", "Zapata"), &resolver)
        .unwrap_err();
    assert!(matches!(err, SearchError::InvalidConfig(_)));
}

#[test]
fn outcome_serializes_with_tag() {
    let valeria = FamilyQuery::individual(IdentityFragment::new("Valeria", "Pérez").born(1950));
    let outcome = connect(&valeria, &query("Carla", "Pérez"), &ResolverConfig::default());
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["outcome"], "connected");
    assert_eq!(json["path"][0]["role"], "parent");
    assert_eq!(json["path"][3]["to"], "@C@");

    let unresolved = connect(&query("Nadie", "Nunca"), &query("Zoe", "Zapata"), &ResolverConfig::default());
    let json = serde_json::to_value(&unresolved).unwrap();
    assert_eq!(json["outcome"], "unresolved");
    assert_eq!(json["first"]["issue"], "not_found");
    assert!(json["second"].is_null());
}
