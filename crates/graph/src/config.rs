use serde::{Deserialize, Serialize};

/// Configuration for relationship resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Stop extending paths beyond this many steps (None = whole component)
    pub max_steps: Option<usize>,

    /// Which edges the traversal may follow
    pub scope: TraversalScope,
}

/// Edge kinds followed during resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalScope {
    /// Parent, child and spouse edges
    #[default]
    Full,

    /// Parent edges only (pedigree of the root)
    AncestorsOnly,
}

impl ResolverConfig {
    /// Ancestors of the root, no depth limit
    pub fn ancestors_only() -> Self {
        Self {
            scope: TraversalScope::AncestorsOnly,
            ..Default::default()
        }
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_steps == Some(0) {
            return Err("max_steps must be > 0 when set".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scope, TraversalScope::Full);
        assert_eq!(config.max_steps, None);
    }

    #[test]
    fn test_config_validation() {
        assert!(ResolverConfig::default().with_max_steps(0).validate().is_err());
        assert!(ResolverConfig::ancestors_only().with_max_steps(8).validate().is_ok());
    }
}
