//! Shared registry enums: artifact formats, lifecycle states, rule kinds.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// The schema format of an artifact.
///
/// The type is recorded at creation and applies to every version of the
/// artifact. It selects which validity and compatibility checkers run at
/// write time; formats without a registered checker skip that check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactType {
    /// Apache Avro schema.
    Avro,
    /// Protocol Buffers definition.
    Protobuf,
    /// JSON Schema document.
    Json,
    /// OpenAPI document.
    Openapi,
    /// AsyncAPI document.
    Asyncapi,
    /// GraphQL schema definition.
    Graphql,
    /// XML Schema definition.
    Xsd,
    /// WSDL service definition.
    Wsdl,
}

impl ArtifactType {
    /// Whether the format's surface syntax is JSON.
    #[must_use]
    pub fn is_json_format(&self) -> bool {
        matches!(self, Self::Avro | Self::Json | Self::Openapi | Self::Asyncapi)
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Avro => "AVRO",
            Self::Protobuf => "PROTOBUF",
            Self::Json => "JSON",
            Self::Openapi => "OPENAPI",
            Self::Asyncapi => "ASYNCAPI",
            Self::Graphql => "GRAPHQL",
            Self::Xsd => "XSD",
            Self::Wsdl => "WSDL",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle state of one artifact version.
///
/// Transitions are any-to-any. The state gates content visibility only:
/// metadata stays readable and editable in every state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactState {
    /// Fully readable and writable.
    #[default]
    Enabled,
    /// Readable and writable; signals advisory-only deprecation to callers.
    Deprecated,
    /// Content and version retrieval fail as not-found; metadata operations
    /// remain allowed. Re-enabling restores content visibility.
    Disabled,
}

impl ArtifactState {
    /// Whether content retrieval is allowed in this state.
    #[must_use]
    pub fn is_readable(&self) -> bool {
        !matches!(self, Self::Disabled)
    }
}

impl fmt::Display for ArtifactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Enabled => "ENABLED",
            Self::Deprecated => "DEPRECATED",
            Self::Disabled => "DISABLED",
        };
        write!(f, "{s}")
    }
}

/// The kind of a governance rule.
///
/// At most one rule per kind exists in each scope (per artifact, and
/// globally as the fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    /// Content must be valid for the artifact's format.
    Validity,
    /// A new version must be compatible with prior versions.
    Compatibility,
    /// References between artifacts must resolve.
    Integrity,
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validity => "VALIDITY",
            Self::Compatibility => "COMPATIBILITY",
            Self::Integrity => "INTEGRITY",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RuleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "VALIDITY" => Ok(Self::Validity),
            "COMPATIBILITY" => Ok(Self::Compatibility),
            "INTEGRITY" => Ok(Self::Integrity),
            other => Err(Error::InvalidId {
                message: format!("unknown rule type '{other}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_is_not_readable() {
        assert!(ArtifactState::Enabled.is_readable());
        assert!(ArtifactState::Deprecated.is_readable());
        assert!(!ArtifactState::Disabled.is_readable());
    }

    #[test]
    fn artifact_type_serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&ArtifactType::Avro).unwrap();
        assert_eq!(json, "\"AVRO\"");
        let back: ArtifactType = serde_json::from_str("\"PROTOBUF\"").unwrap();
        assert_eq!(back, ArtifactType::Protobuf);
    }

    #[test]
    fn rule_type_roundtrip() {
        let rt: RuleType = "COMPATIBILITY".parse().unwrap();
        assert_eq!(rt, RuleType::Compatibility);
        assert!("NOT_A_RULE".parse::<RuleType>().is_err());
    }

    #[test]
    fn json_formats() {
        assert!(ArtifactType::Json.is_json_format());
        assert!(ArtifactType::Avro.is_json_format());
        assert!(!ArtifactType::Protobuf.is_json_format());
        assert!(!ArtifactType::Graphql.is_json_format());
    }
}
