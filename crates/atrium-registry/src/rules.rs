//! Rule configuration storage types.
//!
//! A rule is a `(RuleType, configuration)` pair; the configuration is a
//! single string whose interpretation depends on the rule type (a
//! [`CompatibilityLevel`] or [`ValidityLevel`] name). Configurations are
//! validated when the rule is created or updated, so evaluation can parse
//! them without failing.

use atrium_core::RuleType;
use atrium_rules::{CompatibilityLevel, ValidityLevel};
use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// The stored configuration of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfiguration {
    /// The configuration value, e.g. `"BACKWARD"` or `"FULL"`.
    pub configuration: String,
}

impl RuleConfiguration {
    /// Creates a configuration from a raw string.
    #[must_use]
    pub fn new(configuration: impl Into<String>) -> Self {
        Self {
            configuration: configuration.into(),
        }
    }

    /// A COMPATIBILITY configuration for the given level.
    #[must_use]
    pub fn compatibility(level: CompatibilityLevel) -> Self {
        Self::new(level.to_string())
    }

    /// A VALIDITY configuration for the given level.
    #[must_use]
    pub fn validity(level: ValidityLevel) -> Self {
        Self::new(level.to_string())
    }

    /// Parses the configuration as a compatibility level.
    #[must_use]
    pub fn compatibility_level(&self) -> Option<CompatibilityLevel> {
        self.configuration.parse().ok()
    }

    /// Parses the configuration as a validity level.
    #[must_use]
    pub fn validity_level(&self) -> Option<ValidityLevel> {
        self.configuration.parse().ok()
    }

    /// Validates the configuration for the rule type it is about to be
    /// stored under.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidRuleConfiguration`] when the string is
    /// not a known level for the type. INTEGRITY configurations are opaque.
    pub fn validate_for(&self, rule_type: RuleType) -> Result<()> {
        let valid = match rule_type {
            RuleType::Compatibility => self.compatibility_level().is_some(),
            RuleType::Validity => self.validity_level().is_some(),
            RuleType::Integrity => true,
        };
        if valid {
            Ok(())
        } else {
            Err(RegistryError::InvalidRuleConfiguration {
                rule_type,
                message: format!("'{}' is not a known level", self.configuration),
            })
        }
    }
}
