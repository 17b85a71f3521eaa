use serde::{Deserialize, Serialize};

/// Ranking and pool limits for person search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Largest accepted difference between query and candidate birth years
    pub birth_year_tolerance: u32,

    /// Maximum number of ranked candidates returned
    pub max_candidates: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            birth_year_tolerance: 5,
            max_candidates: 50,
        }
    }
}

impl SearchConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_candidates == 0 {
            return Err("max_candidates must be > 0".to_string());
        }
        if self.birth_year_tolerance > 100 {
            return Err(format!(
                "birth_year_tolerance ({}) cannot exceed 100",
                self.birth_year_tolerance
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.birth_year_tolerance, 5);
    }

    #[test]
    fn test_config_validation() {
        let mut config = SearchConfig::default();
        config.max_candidates = 0;
        assert!(config.validate().is_err());

        config.max_candidates = 10;
        config.birth_year_tolerance = 500;
        assert!(config.validate().is_err());

        config.birth_year_tolerance = 0;
        assert!(config.validate().is_ok());
    }
}
