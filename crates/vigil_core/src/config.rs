//! Check configuration, loaded once at startup.
//!
//! Only the tunables the vertical checks actually compare against live
//! here; per-check thresholds of other check families are out of scope.

use serde::Deserialize;

use crate::error::{ConfigError, CoreResult};

/// Tunables for the vertical distance checks.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Maximum vertical displacement accepted as a legitimate step on a
    /// ground-to-ground transition.
    pub step_height: f64,
    /// Grace window (ms) after a riptide activation during which vertical
    /// deviations are exempt.
    pub riptide_grace_ms: u64,
    /// Grace window (ms) after leaving a bed.
    pub bed_leave_grace_ms: u64,
    /// Accumulated set-back violation below which liquid-limited moves
    /// are tolerated (waterlogged blocks).
    pub set_back_liquid_tolerance: f64,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            step_height: 0.6,
            riptide_grace_ms: 3000,
            bed_leave_grace_ms: 500,
            set_back_liquid_tolerance: 0.8,
        }
    }
}

impl CheckConfig {
    /// Parses a TOML document, falling back to defaults for absent keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys
    /// and [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_toml_str(document: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(document).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CoreResult<()> {
        if self.step_height < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "step_height must be non-negative, got {}",
                self.step_height
            )));
        }
        if self.set_back_liquid_tolerance < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "set_back_liquid_tolerance must be non-negative, got {}",
                self.set_back_liquid_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CheckConfig::default();
        assert_eq!(config.step_height, 0.6);
        assert_eq!(config.riptide_grace_ms, 3000);
        assert_eq!(config.bed_leave_grace_ms, 500);
        assert_eq!(config.set_back_liquid_tolerance, 0.8);
    }

    #[test]
    fn test_partial_override() {
        let config = CheckConfig::from_toml_str("step_height = 0.5\n").unwrap();
        assert_eq!(config.step_height, 0.5);
        assert_eq!(config.riptide_grace_ms, 3000);
    }

    #[test]
    fn test_rejects_malformed_document() {
        let err = CheckConfig::from_toml_str("step_height = \"tall\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_negative_step_height() {
        let err = CheckConfig::from_toml_str("step_height = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
