use thiserror::Error;

/// Result type for name table operations
pub type Result<T> = std::result::Result<T, NameTableError>;

/// Errors raised while loading or compiling name tables
#[derive(Error, Debug)]
pub enum NameTableError {
    /// The TOML source could not be parsed
    #[error("Name table parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// One variant spelling points at two canonical names
    #[error("Variant '{variant}' maps to both '{first}' and '{second}'")]
    ConflictingVariant {
        variant: String,
        first: String,
        second: String,
    },

    /// Transliteration keys must be exactly one character
    #[error("Transliteration key '{0}' is not a single character")]
    InvalidTransliterationKey(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl NameTableError {
    pub(crate) fn conflicting(
        variant: impl Into<String>,
        first: impl Into<String>,
        second: impl Into<String>,
    ) -> Self {
        Self::ConflictingVariant {
            variant: variant.into(),
            first: first.into(),
            second: second.into(),
        }
    }
}
