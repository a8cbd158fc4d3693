//! Compatibility checking driver.
//!
//! Format-agnostic level logic on top of the per-format structural diffs:
//! the configured [`CompatibilityLevel`] selects which prior versions to
//! check (latest only, or all for the `*_TRANSITIVE` variants) and which
//! change directions reject. Artifact types without a registered checker
//! treat the rule as a pass.

use atrium_core::{ArtifactType, ContentHandle, RuleType};

use crate::jsonschema::{self, SchemaNode};
use crate::level::CompatibilityLevel;
use crate::violation::{Finding, RuleViolation};
use crate::{avro, Breakage, DiffIssue};

/// Decides whether `candidate` may be accepted as the next version of an
/// artifact whose prior versions are `existing` (oldest first).
///
/// # Errors
///
/// Returns a [`RuleViolation`] for the COMPATIBILITY rule carrying one
/// finding per incompatibility the level rejects.
pub fn check_compatibility(
    artifact_type: ArtifactType,
    level: CompatibilityLevel,
    existing: &[ContentHandle],
    candidate: &ContentHandle,
) -> Result<(), RuleViolation> {
    if level == CompatibilityLevel::None || existing.is_empty() {
        return Ok(());
    }

    let Some(checker) = checker_for(artifact_type) else {
        tracing::debug!(
            artifact_type = %artifact_type,
            "no compatibility checker registered; rule passes"
        );
        return Ok(());
    };

    let references: &[ContentHandle] = if level.is_transitive() {
        existing
    } else {
        match existing.last() {
            Some(latest) => std::slice::from_ref(latest),
            None => return Ok(()),
        }
    };

    let mut findings: Vec<Finding> = Vec::new();
    for reference in references {
        for issue in checker.diff_pair(reference, candidate) {
            let rejects = (level.checks_backward() && issue.breakage.breaks_backward())
                || (level.checks_forward() && issue.breakage.breaks_forward());
            if !rejects {
                continue;
            }
            let finding = Finding::new(issue.path, issue.message);
            if !findings.contains(&finding) {
                findings.push(finding);
            }
        }
    }

    if findings.is_empty() {
        Ok(())
    } else {
        Err(RuleViolation::new(RuleType::Compatibility, findings))
    }
}

/// Returns the structural checker registered for an artifact type, if any.
fn checker_for(artifact_type: ArtifactType) -> Option<&'static dyn PairChecker> {
    match artifact_type {
        ArtifactType::Json => Some(&JsonSchemaChecker),
        ArtifactType::Avro => Some(&AvroChecker),
        _ => None,
    }
}

/// Diffs one (reference, candidate) schema pair.
trait PairChecker: Sync {
    fn diff_pair(&self, reference: &ContentHandle, candidate: &ContentHandle) -> Vec<DiffIssue>;
}

struct JsonSchemaChecker;

impl PairChecker for JsonSchemaChecker {
    fn diff_pair(&self, reference: &ContentHandle, candidate: &ContentHandle) -> Vec<DiffIssue> {
        let (Ok(old), Ok(new)) = (reference.parse_json(), candidate.parse_json()) else {
            return vec![unparseable()];
        };
        jsonschema::diff(&SchemaNode::parse(&old), &SchemaNode::parse(&new))
    }
}

struct AvroChecker;

impl PairChecker for AvroChecker {
    fn diff_pair(&self, reference: &ContentHandle, candidate: &ContentHandle) -> Vec<DiffIssue> {
        let (Ok(old), Ok(new)) = (reference.parse_json(), candidate.parse_json()) else {
            return vec![unparseable()];
        };
        avro::diff(&old, &new)
    }
}

fn unparseable() -> DiffIssue {
    DiffIssue::new(
        "/",
        Breakage::Both,
        "schema could not be parsed for compatibility checking",
    )
}
