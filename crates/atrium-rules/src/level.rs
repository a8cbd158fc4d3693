//! Rule configuration levels.
//!
//! A rule's configuration is a single string; these enums are the parsed
//! forms for the two rule kinds this crate evaluates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Compatibility policy for accepting a new artifact version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompatibilityLevel {
    /// Every candidate is accepted.
    #[default]
    None,
    /// Data written under the immediately-previous version must stay valid
    /// under the candidate.
    Backward,
    /// Same as [`Self::Backward`], against every previous version.
    BackwardTransitive,
    /// Data written under the candidate must stay valid under the
    /// immediately-previous version.
    Forward,
    /// Same as [`Self::Forward`], against every previous version.
    ForwardTransitive,
    /// Both backward and forward, against the immediately-previous version.
    Full,
    /// Both backward and forward, against every previous version.
    FullTransitive,
}

impl CompatibilityLevel {
    /// Whether the level checks against every previous version rather than
    /// only the latest.
    #[must_use]
    pub fn is_transitive(&self) -> bool {
        matches!(
            self,
            Self::BackwardTransitive | Self::ForwardTransitive | Self::FullTransitive
        )
    }

    /// Whether the level rejects backward-breaking changes.
    #[must_use]
    pub fn checks_backward(&self) -> bool {
        matches!(
            self,
            Self::Backward | Self::BackwardTransitive | Self::Full | Self::FullTransitive
        )
    }

    /// Whether the level rejects forward-breaking changes.
    #[must_use]
    pub fn checks_forward(&self) -> bool {
        matches!(
            self,
            Self::Forward | Self::ForwardTransitive | Self::Full | Self::FullTransitive
        )
    }
}

impl fmt::Display for CompatibilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::Backward => "BACKWARD",
            Self::BackwardTransitive => "BACKWARD_TRANSITIVE",
            Self::Forward => "FORWARD",
            Self::ForwardTransitive => "FORWARD_TRANSITIVE",
            Self::Full => "FULL",
            Self::FullTransitive => "FULL_TRANSITIVE",
        };
        write!(f, "{s}")
    }
}

impl FromStr for CompatibilityLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, UnknownLevel> {
        match s {
            "NONE" => Ok(Self::None),
            "BACKWARD" => Ok(Self::Backward),
            "BACKWARD_TRANSITIVE" => Ok(Self::BackwardTransitive),
            "FORWARD" => Ok(Self::Forward),
            "FORWARD_TRANSITIVE" => Ok(Self::ForwardTransitive),
            "FULL" => Ok(Self::Full),
            "FULL_TRANSITIVE" => Ok(Self::FullTransitive),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

/// Validity policy for accepting artifact content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityLevel {
    /// No validation.
    #[default]
    None,
    /// Content must parse in the artifact type's surface syntax.
    SyntaxOnly,
    /// Syntax plus the structural requirements of the format.
    Full,
}

impl fmt::Display for ValidityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "NONE",
            Self::SyntaxOnly => "SYNTAX_ONLY",
            Self::Full => "FULL",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ValidityLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, UnknownLevel> {
        match s {
            "NONE" => Ok(Self::None),
            "SYNTAX_ONLY" => Ok(Self::SyntaxOnly),
            "FULL" => Ok(Self::Full),
            other => Err(UnknownLevel(other.to_string())),
        }
    }
}

/// A rule configuration string that is not a known level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rule level '{0}'")]
pub struct UnknownLevel(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_compatibility_levels() {
        assert_eq!(
            "BACKWARD".parse::<CompatibilityLevel>().unwrap(),
            CompatibilityLevel::Backward
        );
        assert_eq!(
            "FULL_TRANSITIVE".parse::<CompatibilityLevel>().unwrap(),
            CompatibilityLevel::FullTransitive
        );
        assert!("SIDEWAYS".parse::<CompatibilityLevel>().is_err());
    }

    #[test]
    fn direction_flags() {
        assert!(CompatibilityLevel::Backward.checks_backward());
        assert!(!CompatibilityLevel::Backward.checks_forward());
        assert!(CompatibilityLevel::Full.checks_backward());
        assert!(CompatibilityLevel::Full.checks_forward());
        assert!(!CompatibilityLevel::None.checks_backward());
        assert!(CompatibilityLevel::BackwardTransitive.is_transitive());
        assert!(!CompatibilityLevel::Full.is_transitive());
    }

    #[test]
    fn display_roundtrip() {
        for level in [
            CompatibilityLevel::None,
            CompatibilityLevel::Backward,
            CompatibilityLevel::BackwardTransitive,
            CompatibilityLevel::Forward,
            CompatibilityLevel::ForwardTransitive,
            CompatibilityLevel::Full,
            CompatibilityLevel::FullTransitive,
        ] {
            assert_eq!(level.to_string().parse::<CompatibilityLevel>().unwrap(), level);
        }
    }
}
