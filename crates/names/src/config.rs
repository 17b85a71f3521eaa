use crate::error::{NameTableError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configured name tables used to build a [`crate::NameNormalizer`].
///
/// Every table maps a canonical spelling to the variants that collapse onto
/// it. Keys and values are raw text; they go through the same simplification
/// as the names they are compared with when the normalizer is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameTables {
    /// Nickname/diminutive tables for given names, per sex
    pub given_names: GivenNameTables,

    /// Surname variants: canonical main word -> spellings
    pub surnames: BTreeMap<String, Vec<String>>,

    /// Multi-word surnames that must be read as one main word
    /// (e.g. "fernandes vilegas" -> "fernandesvilegas")
    pub surname_compounds: BTreeMap<String, String>,

    /// Extra single-character transliterations, applied once before
    /// decomposition and the built-in per-script tables
    pub transliteration: BTreeMap<String, String>,

    /// Fold surnames phonetically (doubled letters, b/v, c/s/z, k/q/c, y/i)
    pub phonetic_surnames: bool,
}

/// Given-name variant tables keyed by sex
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GivenNameTables {
    pub male: BTreeMap<String, Vec<String>>,
    pub female: BTreeMap<String, Vec<String>>,
}

impl Default for NameTables {
    fn default() -> Self {
        Self {
            given_names: GivenNameTables::default(),
            surnames: BTreeMap::new(),
            surname_compounds: BTreeMap::new(),
            transliteration: BTreeMap::new(),
            phonetic_surnames: true,
        }
    }
}

impl NameTables {
    /// Parse tables from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let tables: Self = toml::from_str(source)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Validate configuration.
    ///
    /// Variant clashes are only detectable after simplification, so they are
    /// reported by [`crate::NameNormalizer::new`]; this checks the raw shape.
    pub fn validate(&self) -> Result<()> {
        for key in self.transliteration.keys() {
            if key.chars().count() != 1 {
                return Err(NameTableError::InvalidTransliterationKey(key.clone()));
            }
        }

        let empty_canonical = self
            .given_names
            .male
            .keys()
            .chain(self.given_names.female.keys())
            .chain(self.surnames.keys())
            .any(|canonical| canonical.trim().is_empty());
        if empty_canonical {
            return Err(NameTableError::Other(
                "canonical names must not be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Number of variant spellings across all tables
    pub fn variant_count(&self) -> usize {
        let given: usize = self
            .given_names
            .male
            .values()
            .chain(self.given_names.female.values())
            .map(Vec::len)
            .sum();
        let surnames: usize = self.surnames.values().map(Vec::len).sum();
        given + surnames
    }
}
