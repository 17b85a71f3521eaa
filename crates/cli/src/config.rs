use anyhow::{Context as AnyhowContext, Result};
use kinship_graph::ResolverConfig;
use kinship_names::NameTables;
use kinship_search::SearchConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Contents of the `--config` TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KinshipConfig {
    pub names: NameTables,
    pub search: SearchConfig,
    pub resolver: ResolverConfig,
}

impl KinshipConfig {
    /// Read and validate a config file; no path means defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config
            .validate()
            .map_err(|err| anyhow::anyhow!("Invalid config {}: {err}", path.display()))?;

        log::debug!(
            "Loaded config {}: {} name variants",
            path.display(),
            config.names.variant_count()
        );
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        self.names.validate().map_err(|err| err.to_string())?;
        self.search.validate()?;
        self.resolver.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_graph::TraversalScope;

    #[test]
    fn test_default_config_valid() {
        assert!(KinshipConfig::default().validate().is_ok());
    }

    #[test]
    fn test_parse_sections() {
        let config: KinshipConfig = toml::from_str(
            r#"
            [names.given_names.female]
            valentina = ["vale"]

            [search]
            birth_year_tolerance = 2

            [resolver]
            max_steps = 12
            scope = "ancestors_only"
            "#,
        )
        .unwrap();

        assert_eq!(config.search.birth_year_tolerance, 2);
        assert_eq!(config.search.max_candidates, 50);
        assert_eq!(config.resolver.max_steps, Some(12));
        assert_eq!(config.resolver.scope, TraversalScope::AncestorsOnly);
        assert!(config.names.phonetic_surnames);
    }

    #[test]
    fn test_rejects_unknown_section() {
        assert!(toml::from_str::<KinshipConfig>("[render]\nobfuscate = true\n").is_err());
    }

    #[test]
    fn test_validation_reaches_nested_sections() {
        let mut config = KinshipConfig::default();
        config.search.max_candidates = 0;
        assert!(config.validate().is_err());
    }
}
