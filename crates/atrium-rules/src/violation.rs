//! Typed rule-violation errors.

use atrium_core::RuleType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One reason a rule rejected a candidate document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// JSON-pointer-like path of the offending construct (`/` for the root).
    pub path: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl Finding {
    /// Creates a new finding.
    #[must_use]
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A write was rejected by a configured rule.
///
/// Carries every finding the rule produced; the caller must submit a
/// corrected document; violations are never retried automatically.
#[derive(Debug, Clone)]
pub struct RuleViolation {
    /// The rule that rejected the write.
    pub rule_type: RuleType,
    /// The findings, one per detected problem.
    pub findings: Vec<Finding>,
}

impl RuleViolation {
    /// Creates a violation for the given rule with the given findings.
    #[must_use]
    pub fn new(rule_type: RuleType, findings: Vec<Finding>) -> Self {
        Self {
            rule_type,
            findings,
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rule violated ({} finding{})",
            self.rule_type,
            self.findings.len(),
            if self.findings.len() == 1 { "" } else { "s" }
        )?;
        for finding in &self.findings {
            write!(f, "; {finding}")?;
        }
        Ok(())
    }
}

impl std::error::Error for RuleViolation {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_findings() {
        let violation = RuleViolation::new(
            RuleType::Compatibility,
            vec![Finding::new("/properties/x", "required property added")],
        );
        let text = violation.to_string();
        assert!(text.contains("COMPATIBILITY"));
        assert!(text.contains("/properties/x"));
    }
}
