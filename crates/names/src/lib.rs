//! # Kinship Names
//!
//! Name normalization for identity matching across scripts, nicknames and
//! compound surnames.
//!
//! ## Pipeline
//!
//! ```text
//! raw name
//!     │
//!     ├──> simplify
//!     │      ├─ lowercase + configured transliterations
//!     │      ├─ NFD, drop combining marks
//!     │      ├─ per-script tables (Cyrillic, Greek, Arabic)
//!     │      └─ fold ß/æ/ø/ł…, punctuation, whitespace
//!     │
//!     ├──> normalize_given(sex)
//!     │      └─ (name, sex) nickname table → canonical given name
//!     │
//!     └──> normalize_surname
//!            ├─ compounds, connectors (perez de garcia), particles (de, van, mc…)
//!            ├─ main word + phonetic folding
//!            ├─ surname variant table → canonical main word
//!            └─ trailing vowels → `_` for the shortened key
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kinship_names::{NameNormalizer, NameTables, Sex};
//!
//! let tables = NameTables::from_toml_str(r#"
//! [given_names.female]
//! valentina = ["vale", "valyantsina"]
//! "#).unwrap();
//! let normalizer = NameNormalizer::new(&tables).unwrap();
//!
//! assert_eq!(normalizer.normalize_given("Валянціна", Some(Sex::Female)), "valentina");
//! assert_eq!(normalizer.normalize_surname("Pérez"), normalizer.normalize_surname("PEREZ"));
//! ```

mod config;
mod error;
mod normalizer;
mod transliterate;

pub use config::{GivenNameTables, NameTables};
pub use error::{NameTableError, Result};
pub use normalizer::{shorten_surname, NameKey, NameNormalizer, Sex};
pub use transliterate::{transliterate, Script};
