use kinship_names::{NameNormalizer, NameTables, Sex};
use proptest::prelude::*;

fn normalizer() -> NameNormalizer {
    let tables = NameTables::from_toml_str(
        r#"
        [given_names.female]
        valentina = ["vale", "valyantsina"]
        maria = ["mari", "mery"]

        [given_names.male]
        francisco = ["pancho", "paco"]

        [surnames]
        gonsales = ["gonzalez"]
        "#,
    )
    .expect("tables");
    NameNormalizer::new(&tables).expect("normalizer")
}

#[test]
fn spanish_nicknames_collapse_with_sex() {
    let n = normalizer();
    assert_eq!(n.normalize_given("Pancho", Some(Sex::Male)), "francisco");
    assert_eq!(n.normalize_given("Paco", None), "francisco");
    assert_eq!(n.normalize_given("Mery", Some(Sex::Female)), "maria");
    // female table is not consulted for males
    assert_eq!(n.normalize_given("Mery", Some(Sex::Male)), "mery");
}

#[test]
fn surname_variants_meet_on_one_key() {
    let n = normalizer();
    let keys: Vec<String> = ["González", "Gonzales", "GONSALEZ", "Gonzalez Vega"]
        .iter()
        .map(|s| n.normalize_surname(s))
        .collect();
    assert!(keys.iter().all(|k| k == &keys[0]), "keys diverged: {keys:?}");
}

#[test]
fn connectors_keep_the_second_surname() {
    let n = normalizer();
    assert_eq!(n.normalize_surname("Pérez de García"), "peresdegarsia");
    assert_ne!(n.normalize_surname("Pérez de García"), n.normalize_surname("Pérez"));
    assert_eq!(n.normalize_surname("Gonzalez de la Vega"), "gonsaleslavega");
}

#[test]
fn configured_transliteration_does_not_chain() {
    let mut tables = NameTables::default();
    tables.transliteration.insert("ў".to_string(), "v".to_string());
    tables.transliteration.insert("v".to_string(), "w".to_string());
    let n = NameNormalizer::new(&tables).expect("normalizer");
    assert_eq!(n.simplify("ў"), "v");
    assert_eq!(n.simplify("v"), "w");
}

#[test]
fn blank_input_degrades_to_blank_key() {
    let n = normalizer();
    assert_eq!(n.simplify(""), "");
    assert_eq!(n.normalize_given(" ? ", Some(Sex::Female)), "");
    assert_eq!(n.normalize_surname("..."), "");
}

#[test]
fn unmapped_script_degrades_to_simplified_form() {
    let n = normalizer();
    assert_eq!(n.normalize_given("李", None), "李");
}

proptest! {
    #[test]
    fn proptest_simplify_is_total_and_idempotent(raw in "[A-Za-zÀ-ÿа-яА-Я' .()-]{0,24}") {
        let n = normalizer();
        let once = n.simplify(&raw);
        prop_assert_eq!(n.simplify(&once), once.clone());
        prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
        prop_assert!(!once.contains("  "));
        prop_assert!(!once.chars().any(char::is_uppercase));
    }

    #[test]
    fn proptest_surname_key_is_single_word(raw in "[A-Za-zÀ-ÿ ]{0,32}") {
        let n = normalizer();
        let key = n.normalize_surname(&raw);
        prop_assert!(!key.contains(' '));
        prop_assert_eq!(n.normalize_surname(&raw), key);
    }
}
