use crate::config::NameTables;
use crate::error::{NameTableError, Result};
use crate::transliterate::transliterate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Words dropped from a given name unless they lead it ("jean dit pierre")
const GIVEN_NAME_EXTRAS: &[&str] = &["cadet", "cadete", "cadette", "detto", "dit", "dita", "dite"];

/// Connector words joining two surname words into one ("perez de garcia").
/// Only the last connector of a run is kept.
static SURNAME_CONNECTOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([^ ]+)(?: (da|de|di|do|du|del|der|della|delle|dall|das|dos|la|le|lo|las|los|san))+ (.+)$",
    )
    .expect("surname connector pattern is valid")
});

/// Shortened surnames up to this length ending in `_` need full equality
const AMBIGUOUS_SHORT_SURNAME_LEN: usize = 4;

/// Leading surname particles glued onto the following word.
/// `y` is excluded from the single-letter class: "de y lopez" is a conjunction.
static SURNAME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^((?:(?:[a-xz]|ahets|da|de|di|do|du|del|der|della|delle|dall|das|dos|la|le|lo|las|los|mc|mac|oro|san|sant|santa|santo|saint|sainte|st|van|vander|von) )+)(.+)$",
    )
    .expect("surname prefix pattern is valid")
});

/// Sex tag carried by identities and used to disambiguate given names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    #[serde(alias = "M", alias = "m")]
    Male,
    #[serde(alias = "F", alias = "f")]
    Female,
}

/// Normalized comparison key of one (given name, surname) identity.
///
/// Blank components are empty strings; they compare equal only to other
/// blank components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameKey {
    pub given: String,
    /// Surname main word
    pub surname: String,
    /// Main word with its trailing vowels collapsed to `_`
    pub surname_short: String,
    pub sex: Option<Sex>,
}

impl NameKey {
    pub fn new(given: impl Into<String>, surname: impl Into<String>, sex: Option<Sex>) -> Self {
        let surname = surname.into();
        Self {
            given: given.into(),
            surname_short: shorten_surname(&surname),
            surname,
            sex,
        }
    }

    pub fn has_given(&self) -> bool {
        !self.given.is_empty()
    }

    pub fn has_surname(&self) -> bool {
        !self.surname.is_empty()
    }

    /// Shortened surnames agree; short ones ending in `_` ("ros_") must also
    /// agree on the full main word
    pub fn surname_matches(&self, other: &NameKey) -> bool {
        if self.surname_short != other.surname_short {
            return false;
        }
        let short = &self.surname_short;
        let ambiguous = short.ends_with('_') && short.chars().count() <= AMBIGUOUS_SHORT_SURNAME_LEN;
        !ambiguous || self.surname == other.surname
    }

    /// Sexes agree unless both are known and differ
    pub fn sex_agrees(&self, other: &NameKey) -> bool {
        match (self.sex, other.sex) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

/// Maps raw name strings to canonical comparison keys.
///
/// Built once from [`NameTables`]; every method is pure and the type is
/// `Send + Sync`, so one instance is shared by all matchers.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    given: HashMap<(String, Sex), String>,
    /// Sex-less lookup: `None` marks a variant whose canonical depends on sex
    given_any: HashMap<String, Option<String>>,
    surnames: HashMap<String, String>,
    compounds: Vec<(String, String)>,
    transliteration: HashMap<char, String>,
    phonetic_surnames: bool,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self {
            given: HashMap::new(),
            given_any: HashMap::new(),
            surnames: HashMap::new(),
            compounds: Vec::new(),
            transliteration: HashMap::new(),
            phonetic_surnames: true,
        }
    }
}

impl NameNormalizer {
    /// Compile name tables into lookup maps
    pub fn new(tables: &NameTables) -> Result<Self> {
        tables.validate()?;

        let transliteration: HashMap<char, String> = tables
            .transliteration
            .iter()
            .filter_map(|(key, value)| {
                let c = key.chars().next()?;
                Some((c, value.to_lowercase()))
            })
            .collect();

        let mut normalizer = Self {
            transliteration,
            phonetic_surnames: tables.phonetic_surnames,
            ..Self::default()
        };

        normalizer.compounds = tables
            .surname_compounds
            .iter()
            .map(|(compound, replacement)| {
                (normalizer.simplify(compound), normalizer.simplify(replacement))
            })
            .filter(|(compound, _)| !compound.is_empty())
            .collect();
        // Longest compound first so "de la x y" wins over "de la x"
        normalizer
            .compounds
            .sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let given = normalizer.compile_given(&tables.given_names.male, Sex::Male)?;
        let female = normalizer.compile_given(&tables.given_names.female, Sex::Female)?;

        let mut given_any: HashMap<String, Option<String>> = HashMap::new();
        for ((variant, _), canonical) in given.iter().chain(female.iter()) {
            match given_any.entry(variant.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(Some(canonical.clone()));
                }
                Entry::Occupied(mut slot) => {
                    if slot.get().as_deref() != Some(canonical.as_str()) {
                        slot.insert(None);
                    }
                }
            }
        }

        normalizer.given = given.into_iter().chain(female).collect();
        normalizer.given_any = given_any;
        normalizer.surnames = normalizer.compile_surnames(&tables.surnames)?;

        log::debug!(
            "Compiled name tables: {} given-name variants, {} surname variants, {} compounds",
            normalizer.given.len(),
            normalizer.surnames.len(),
            normalizer.compounds.len()
        );

        Ok(normalizer)
    }

    /// ASCII-folded, lowercase, whitespace-collapsed form of any name.
    ///
    /// The configured transliteration table is applied once, before
    /// decomposition; the built-in script tables run after it. Characters
    /// with no mapping are kept as they are.
    pub fn simplify(&self, raw: &str) -> String {
        let lowered: String = raw
            .to_lowercase()
            .chars()
            .map(|c| match self.transliteration.get(&c) {
                Some(replacement) => replacement.clone(),
                None => c.to_string(),
            })
            .collect();

        let stripped: String = lowered.nfd().filter(|c| !is_combining_mark(*c)).collect();
        let latin = transliterate(&stripped);

        let mut folded = String::with_capacity(latin.len());
        for c in latin.chars() {
            fold_char(c, &mut folded);
        }

        folded.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Canonical given-name key.
    ///
    /// The whole name is looked up first (multi-word variants), then each word
    /// on its own. Without a sex, only variants with a single canonical form
    /// across sexes are collapsed.
    pub fn normalize_given(&self, raw: &str, sex: Option<Sex>) -> String {
        let simplified = self.simplify(raw);
        let words: Vec<&str> = simplified
            .split(' ')
            .enumerate()
            .filter(|(position, word)| {
                !word.is_empty() && (*position == 0 || !GIVEN_NAME_EXTRAS.contains(word))
            })
            .map(|(_, word)| word)
            .collect();

        if words.is_empty() {
            return String::new();
        }

        let whole = words.join(" ");
        if let Some(canonical) = self.lookup_given(&whole, sex) {
            return canonical.to_string();
        }

        words
            .iter()
            .map(|word| self.lookup_given(word, sex).unwrap_or(*word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canonical surname main-word key.
    ///
    /// ```text
    /// perez de garcia    -> perezdegarcia       (glue connector)
    /// di yannibelli rago -> diyannibelli rago   (glue leading particle)
    /// diyannibelli rago  -> diyannibelli        (keep the main word)
    /// diyannibelli       -> dianiveli           (phonetic folding)
    /// dianiveli          -> <configured variant, if any>
    /// ```
    pub fn normalize_surname(&self, raw: &str) -> String {
        let simplified = self.simplify(raw);
        let main = self.surname_main_word(&simplified);
        match self.surnames.get(&main) {
            Some(canonical) => canonical.clone(),
            None => main,
        }
    }

    /// Normalize one identity into its comparison key
    pub fn key(&self, given: Option<&str>, surname: Option<&str>, sex: Option<Sex>) -> NameKey {
        NameKey::new(
            given
                .map(|g| self.normalize_given(g, sex))
                .unwrap_or_default(),
            surname
                .map(|s| self.normalize_surname(s))
                .unwrap_or_default(),
            sex,
        )
    }

    fn lookup_given(&self, word: &str, sex: Option<Sex>) -> Option<&str> {
        match sex {
            Some(sex) => self
                .given
                .get(&(word.to_string(), sex))
                .map(String::as_str),
            None => self.given_any.get(word).and_then(|c| c.as_deref()),
        }
    }

    fn surname_main_word(&self, simplified: &str) -> String {
        let mut surname = simplified.to_string();

        for (compound, replacement) in &self.compounds {
            let whole = surname == *compound;
            let leading = surname.starts_with(compound.as_str())
                && surname[compound.len()..].starts_with(' ');
            if whole || leading {
                surname = format!("{replacement}{}", &surname[compound.len()..]);
                break;
            }
        }

        let connected = SURNAME_CONNECTOR.replace(&surname, "${1}${2}${3}");
        let glued = glue_prefixes(&connected);
        let main = glued.split(' ').next().unwrap_or_default();

        if self.phonetic_surnames {
            phonetic_fold(main)
        } else {
            main.to_string()
        }
    }

    fn compile_given(
        &self,
        table: &BTreeMap<String, Vec<String>>,
        sex: Sex,
    ) -> Result<HashMap<(String, Sex), String>> {
        let mut compiled: HashMap<(String, Sex), String> = HashMap::new();
        for (canonical, variants) in table {
            let canonical_key = self.simplify(canonical);
            for variant in variants {
                let variant_key = self.simplify(variant);
                if variant_key.is_empty() || variant_key == canonical_key {
                    continue;
                }
                insert_variant(&mut compiled, (variant_key.clone(), sex), &canonical_key)
                    .map_err(|existing| {
                        NameTableError::conflicting(variant_key, existing, canonical_key.clone())
                    })?;
            }
        }
        Ok(compiled)
    }

    fn compile_surnames(
        &self,
        table: &BTreeMap<String, Vec<String>>,
    ) -> Result<HashMap<String, String>> {
        let mut compiled: HashMap<String, String> = HashMap::new();
        for (canonical, variants) in table {
            let canonical_key = self.surname_main_word(&self.simplify(canonical));
            for variant in variants {
                let variant_key = self.surname_main_word(&self.simplify(variant));
                if variant_key.is_empty() || variant_key == canonical_key {
                    continue;
                }
                insert_variant(&mut compiled, variant_key.clone(), &canonical_key).map_err(
                    |existing| {
                        NameTableError::conflicting(variant_key, existing, canonical_key.clone())
                    },
                )?;
            }
        }
        Ok(compiled)
    }
}

/// Insert a variant, returning the existing canonical on conflict
fn insert_variant<K: std::hash::Hash + Eq>(
    map: &mut HashMap<K, String>,
    key: K,
    canonical: &str,
) -> std::result::Result<(), String> {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(canonical.to_string());
            Ok(())
        }
        Entry::Occupied(slot) if slot.get() == canonical => Ok(()),
        Entry::Occupied(slot) => Err(slot.get().clone()),
    }
}

fn fold_char(c: char, out: &mut String) {
    match c {
        'ß' => out.push_str("ss"),
        'æ' => out.push_str("ae"),
        'œ' => out.push_str("oe"),
        'þ' => out.push_str("th"),
        'ø' => out.push('o'),
        'ł' => out.push('l'),
        'đ' | 'ð' => out.push('d'),
        'ı' => out.push('i'),
        'ħ' => out.push('h'),
        '?' | '(' | ')' | '\'' | '.' | '"' | '’' | '`' => {}
        '-' | '_' | ',' | '/' => out.push(' '),
        c if c.is_whitespace() => out.push(' '),
        c => out.push(c),
    }
}

/// Collapse trailing vowels of a surname main word into one `_`
/// ("pereira" -> "perer_")
pub fn shorten_surname(main: &str) -> String {
    let stem = main.trim_end_matches(|c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u'));
    if stem.len() == main.len() {
        main.to_string()
    } else {
        format!("{stem}_")
    }
}

fn glue_prefixes(surname: &str) -> String {
    let Some(captures) = SURNAME_PREFIX.captures(surname) else {
        return surname.to_string();
    };
    let prefixes = &captures[1];
    let rest = &captures[2];
    if rest == "y" || rest.starts_with("y ") {
        return surname.to_string();
    }
    let glued: String = prefixes.chars().filter(|c| *c != ' ').collect();
    format!("{glued}{rest}")
}

fn collapse_doubles(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut previous: Option<char> = None;
    for c in word.chars() {
        if previous == Some(c) && c.is_ascii_lowercase() {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// One-pass substitution, bracketed by doubled-letter collapsing.
/// `ce`/`ci` are rewritten before `k`/`q` become `c`, so `ke` stays `ce`.
fn phonetic_fold(word: &str) -> String {
    let chars: Vec<char> = collapse_doubles(word).chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;

    while i < chars.len() {
        let digraph = match (chars[i], chars.get(i + 1)) {
            ('c', Some('e')) => Some("se"),
            ('c', Some('i')) => Some("si"),
            ('j', Some('e')) => Some("ge"),
            ('j', Some('i')) => Some("gi"),
            _ => None,
        };
        if let Some(replacement) = digraph {
            out.push_str(replacement);
            i += 2;
            continue;
        }

        out.push(match chars[i] {
            'b' => 'v',
            'k' | 'q' => 'c',
            'y' => 'i',
            'z' => 's',
            other => other,
        });
        i += 1;
    }

    collapse_doubles(&out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tables() -> NameTables {
        NameTables::from_toml_str(
            r#"
            surname_compounds = { "fernandez villegas" = "fernandezvillegas" }

            [given_names.female]
            valentina = ["vale", "valyantsina"]
            andrea = ["andi"]

            [given_names.male]
            jose = ["pepe"]
            andres = ["andi"]

            [surnames]
            garcia = ["garsea"]
            "#,
        )
        .unwrap()
    }

    fn normalizer() -> NameNormalizer {
        NameNormalizer::new(&tables()).unwrap()
    }

    #[test]
    fn test_simplify_strips_diacritics_and_punctuation() {
        let n = NameNormalizer::default();
        assert_eq!(n.simplify("  José-María  (Pepe) "), "jose maria pepe");
        assert_eq!(n.simplify("O'Connor"), "oconnor");
        assert_eq!(n.simplify("Strauß"), "strauss");
        assert_eq!(n.simplify("Łukasz Møller"), "lukasz moller");
        assert_eq!(n.simplify("   "), "");
    }

    #[test]
    fn test_simplify_transliterates_scripts() {
        let n = NameNormalizer::default();
        assert_eq!(n.simplify("Валянціна"), "valyantsina");
        assert_eq!(n.simplify("Γεώργιος"), "georgios");
        assert_eq!(n.simplify("Йосиф"), "iosif");
    }

    #[test]
    fn test_extra_transliteration_applies_before_decomposition() {
        let mut tables = NameTables::default();
        tables.transliteration.insert("ў".to_string(), "w".to_string());
        let n = NameNormalizer::new(&tables).unwrap();
        assert_eq!(n.simplify("Ўладзіслаў"), "wladzislaw");
    }

    #[test]
    fn test_given_name_variants_by_sex() {
        let n = normalizer();
        assert_eq!(n.normalize_given("Vale", Some(Sex::Female)), "valentina");
        assert_eq!(n.normalize_given("Pepe", Some(Sex::Male)), "jose");
        assert_eq!(n.normalize_given("Andi", Some(Sex::Female)), "andrea");
        assert_eq!(n.normalize_given("Andi", Some(Sex::Male)), "andres");
    }

    #[test]
    fn test_given_name_without_sex_maps_only_unambiguous_variants() {
        let n = normalizer();
        assert_eq!(n.normalize_given("Pepe", None), "jose");
        assert_eq!(n.normalize_given("Andi", None), "andi");
    }

    #[test]
    fn test_given_name_multi_word_and_extras() {
        let n = normalizer();
        assert_eq!(
            n.normalize_given("Vale Andi", Some(Sex::Female)),
            "valentina andrea"
        );
        assert_eq!(n.normalize_given("Jean dit Pierre", Some(Sex::Male)), "jean pierre");
        assert_eq!(n.normalize_given("Dita", Some(Sex::Female)), "dita");
    }

    #[test]
    fn test_transliterated_given_name_reaches_variant_table() {
        let n = normalizer();
        assert_eq!(n.normalize_given("Валянціна", Some(Sex::Female)), "valentina");
    }

    #[test]
    fn test_surname_main_word_pipeline() {
        let n = NameNormalizer::default();
        assert_eq!(n.normalize_surname("Di Yannibelli Rago"), "dianiveli");
        assert_eq!(n.normalize_surname("Pérez"), "peres");
        assert_eq!(n.normalize_surname("PEREZ"), "peres");
        assert_eq!(n.normalize_surname("de la Torre"), "delatore");
        assert_eq!(n.normalize_surname("Pérez de García"), "peresdegarsia");
        assert_eq!(n.normalize_surname("Pérez de la Garcia"), "pereslagarsia");
        assert_eq!(n.normalize_surname("de y Lopez"), "de");
    }

    #[test]
    fn test_surname_compounds_and_variants() {
        let n = normalizer();
        assert_eq!(n.normalize_surname("Fernández Villegas"), "fernandesvilegas");
        assert_eq!(n.normalize_surname("Fernández"), "fernandes");
        assert_eq!(n.normalize_surname("Garsea"), n.normalize_surname("García"));
    }

    #[test]
    fn test_surname_without_phonetic_folding() {
        let tables = NameTables {
            phonetic_surnames: false,
            ..NameTables::default()
        };
        let n = NameNormalizer::new(&tables).unwrap();
        assert_eq!(n.normalize_surname("Pérez"), "perez");
    }

    #[test]
    fn test_conflicting_variants_rejected() {
        let tables = NameTables::from_toml_str(
            r#"
            [given_names.male]
            jose = ["pepe"]
            josep = ["pepe"]
            "#,
        )
        .unwrap();
        let err = NameNormalizer::new(&tables).unwrap_err();
        assert!(matches!(err, NameTableError::ConflictingVariant { .. }));
    }

    #[test]
    fn test_key_blank_components() {
        let n = normalizer();
        let key = n.key(None, Some("Pérez"), None);
        assert!(!key.has_given());
        assert!(key.has_surname());
        assert_eq!(key.surname, "peres");
        assert_eq!(key.surname_short, "peres");
    }

    #[test]
    fn test_shorten_surname_collapses_trailing_vowels() {
        assert_eq!(shorten_surname("pereira"), "perer_");
        assert_eq!(shorten_surname("pereiro"), "perer_");
        assert_eq!(shorten_surname("peres"), "peres");
        assert_eq!(shorten_surname("perer_"), "perer_");
        assert_eq!(shorten_surname(""), "");
    }

    #[test]
    fn test_surname_matches_on_shortened_form() {
        let n = NameNormalizer::default();
        let pereira = n.key(None, Some("Pereira"), None);
        let pereiro = n.key(None, Some("Pereiro"), None);
        assert!(pereira.surname_matches(&pereiro));

        // "ros_" is too short to trust on its own
        let rosa = n.key(None, Some("Rosa"), None);
        let rose = n.key(None, Some("Rose"), None);
        assert_eq!(rosa.surname_short, rose.surname_short);
        assert!(!rosa.surname_matches(&rose));
        assert!(rosa.surname_matches(&n.key(None, Some("ROSA"), None)));

        assert!(!n.key(None, Some("Garcia"), None).surname_matches(&pereira));
    }

    #[test]
    fn test_sex_agreement() {
        let n = NameNormalizer::default();
        let a = n.key(Some("Ana"), Some("Ruiz"), Some(Sex::Female));
        let b = n.key(Some("Ana"), Some("Ruiz"), None);
        let c = n.key(Some("Ana"), Some("Ruiz"), Some(Sex::Male));
        assert!(a.sex_agrees(&b));
        assert!(!a.sex_agrees(&c));
    }
}
