//! Validity checking for candidate artifact content.

use atrium_core::{ArtifactType, ContentHandle, RuleType};
use serde_json::Value;

use crate::level::ValidityLevel;
use crate::violation::{Finding, RuleViolation};

/// Checks that `content` is valid for its artifact type at the given level.
///
/// `SYNTAX_ONLY` requires the content to parse in the type's surface syntax;
/// `FULL` adds the structural requirements of the format. Artifact types
/// without structural rules fall back to the syntax check.
///
/// # Errors
///
/// Returns a [`RuleViolation`] for the VALIDITY rule when the content fails.
pub fn check_validity(
    artifact_type: ArtifactType,
    level: ValidityLevel,
    content: &ContentHandle,
) -> Result<(), RuleViolation> {
    let findings = match level {
        ValidityLevel::None => Vec::new(),
        ValidityLevel::SyntaxOnly => check_syntax(artifact_type, content),
        ValidityLevel::Full => {
            let mut findings = check_syntax(artifact_type, content);
            if findings.is_empty() {
                findings = check_structure(artifact_type, content);
            }
            findings
        }
    };

    if findings.is_empty() {
        Ok(())
    } else {
        Err(RuleViolation::new(RuleType::Validity, findings))
    }
}

fn check_syntax(artifact_type: ArtifactType, content: &ContentHandle) -> Vec<Finding> {
    if artifact_type.is_json_format() {
        match content.parse_json() {
            Ok(_) => Vec::new(),
            Err(e) => vec![Finding::new("/", format!("content is not valid JSON: {e}"))],
        }
    } else if content.is_empty() {
        vec![Finding::new("/", "content is empty")]
    } else if std::str::from_utf8(content.bytes()).is_err() {
        vec![Finding::new("/", "content is not valid UTF-8")]
    } else {
        Vec::new()
    }
}

fn check_structure(artifact_type: ArtifactType, content: &ContentHandle) -> Vec<Finding> {
    // Syntax already verified; JSON formats parse cleanly here.
    let doc = match content.parse_json() {
        Ok(doc) => doc,
        Err(_) => return Vec::new(),
    };

    match artifact_type {
        ArtifactType::Json => {
            if matches!(doc, Value::Object(_) | Value::Bool(_)) {
                Vec::new()
            } else {
                vec![Finding::new(
                    "/",
                    "a JSON Schema document must be an object or a boolean",
                )]
            }
        }
        ArtifactType::Avro => {
            let well_formed = match &doc {
                Value::String(_) | Value::Array(_) => true,
                Value::Object(map) => map.contains_key("type"),
                _ => false,
            };
            if well_formed {
                Vec::new()
            } else {
                vec![Finding::new(
                    "/",
                    "an Avro schema must be a type name, a union, or an object with a 'type'",
                )]
            }
        }
        ArtifactType::Openapi => {
            if doc.get("openapi").is_some() || doc.get("swagger").is_some() {
                Vec::new()
            } else {
                vec![Finding::new(
                    "/",
                    "an OpenAPI document must declare an 'openapi' or 'swagger' version",
                )]
            }
        }
        ArtifactType::Asyncapi => {
            if doc.get("asyncapi").is_some() {
                Vec::new()
            } else {
                vec![Finding::new(
                    "/",
                    "an AsyncAPI document must declare an 'asyncapi' version",
                )]
            }
        }
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_accepts_anything() {
        let garbage = ContentHandle::from_static(b"not json at all");
        assert!(check_validity(ArtifactType::Json, ValidityLevel::None, &garbage).is_ok());
    }

    #[test]
    fn syntax_rejects_malformed_json() {
        let garbage = ContentHandle::from_static(b"{\"type\":");
        let err =
            check_validity(ArtifactType::Json, ValidityLevel::SyntaxOnly, &garbage).unwrap_err();
        assert_eq!(err.rule_type, RuleType::Validity);
        assert!(!err.findings.is_empty());
    }

    #[test]
    fn syntax_accepts_valid_json() {
        let doc = ContentHandle::from_static(b"{\"type\":\"string\"}");
        assert!(check_validity(ArtifactType::Json, ValidityLevel::SyntaxOnly, &doc).is_ok());
    }

    #[test]
    fn full_requires_json_schema_shape() {
        let array_doc = ContentHandle::from_static(b"[1,2,3]");
        assert!(check_validity(ArtifactType::Json, ValidityLevel::Full, &array_doc).is_err());

        let bool_doc = ContentHandle::from_static(b"true");
        assert!(check_validity(ArtifactType::Json, ValidityLevel::Full, &bool_doc).is_ok());
    }

    #[test]
    fn full_requires_avro_type() {
        let missing_type = ContentHandle::from_static(b"{\"name\":\"User\"}");
        assert!(check_validity(ArtifactType::Avro, ValidityLevel::Full, &missing_type).is_err());

        let named = ContentHandle::from_static(b"\"string\"");
        assert!(check_validity(ArtifactType::Avro, ValidityLevel::Full, &named).is_ok());
    }

    #[test]
    fn protobuf_syntax_accepts_non_empty_text() {
        let proto = ContentHandle::from_static(b"syntax = \"proto3\";");
        assert!(check_validity(ArtifactType::Protobuf, ValidityLevel::SyntaxOnly, &proto).is_ok());

        let empty = ContentHandle::from_static(b"");
        assert!(check_validity(ArtifactType::Protobuf, ValidityLevel::SyntaxOnly, &empty).is_err());
    }
}
