//! Integration tests for rule storage, effective-rule resolution, and
//! write-time enforcement.

use atrium_core::{ArtifactType, ContentHandle, GlobalId, RuleType, TenantContext};
use atrium_rules::{CompatibilityLevel, ValidityLevel};
use atrium_registry::{
    ErrorKind, MemoryRegistry, RegistryError, RegistryStorage, RuleConfiguration,
};

fn ctx() -> TenantContext {
    TenantContext::default()
}

fn handle(content: &str) -> ContentHandle {
    ContentHandle::from(content)
}

const BASE: &str = r#"{"type":"object","properties":{"x":{"type":"string"}},"required":["x"]}"#;
const ADDS_OPTIONAL: &str = r#"{"type":"object","properties":{"x":{"type":"string"},"y":{"type":"string"}},"required":["x"]}"#;
const ADDS_REQUIRED: &str = r#"{"type":"object","properties":{"x":{"type":"string"},"y":{"type":"string"}},"required":["x","y"]}"#;

#[tokio::test]
async fn global_backward_rule_gates_updates() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_global_rule(
            &c,
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Backward),
        )
        .await
        .unwrap();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, handle(BASE), None)
        .await
        .unwrap();

    // Optional addition is backward compatible.
    registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, handle(ADDS_OPTIONAL), None)
        .await
        .unwrap();

    // A new required property is not.
    let err = registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, handle(ADDS_REQUIRED), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
    let RegistryError::RuleViolation(violation) = err else {
        panic!("expected a rule violation");
    };
    assert_eq!(violation.rule_type, RuleType::Compatibility);
    assert!(violation
        .findings
        .iter()
        .any(|f| f.path.contains("properties/y")));

    // The rejected write appended nothing.
    let versions = registry.artifact_versions(&c, "g", "a").await.unwrap();
    assert_eq!(versions.len(), 2);
}

#[tokio::test]
async fn artifact_scoped_rule_overrides_the_global_fallback() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_global_rule(
            &c,
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Backward),
        )
        .await
        .unwrap();

    for id in ["constrained", "exempt"] {
        registry
            .create_artifact(&c, "g", id, ArtifactType::Json, handle(BASE), None)
            .await
            .unwrap();
    }
    registry
        .create_artifact_rule(
            &c,
            "g",
            "exempt",
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::None),
        )
        .await
        .unwrap();

    // The exempted artifact accepts a breaking change; the other does not.
    registry
        .update_artifact(&c, "g", "exempt", ArtifactType::Json, handle(ADDS_REQUIRED), None)
        .await
        .unwrap();
    let err = registry
        .update_artifact(&c, "g", "constrained", ArtifactType::Json, handle(ADDS_REQUIRED), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
}

#[tokio::test]
async fn validity_rule_rejects_malformed_content_without_consuming_ids() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_global_rule(
            &c,
            RuleType::Validity,
            RuleConfiguration::validity(ValidityLevel::Full),
        )
        .await
        .unwrap();

    let err = registry
        .create_artifact(&c, "g", "bad", ArtifactType::Json, handle("{not json"), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
    assert!(registry.get_artifact(&c, "g", "bad").await.is_err());

    // The failed create consumed no global id.
    let created = registry
        .create_artifact(&c, "g", "good", ArtifactType::Json, handle(r#"{"type":"object"}"#), None)
        .await
        .unwrap();
    assert_eq!(created.global_id, GlobalId::from_raw(1));
}

#[tokio::test]
async fn rule_crud_is_check_then_act() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, handle("{}"), None)
        .await
        .unwrap();

    let config = RuleConfiguration::compatibility(CompatibilityLevel::Full);
    registry
        .create_artifact_rule(&c, "g", "a", RuleType::Compatibility, config.clone())
        .await
        .unwrap();

    // Duplicate creation fails.
    let err = registry
        .create_artifact_rule(&c, "g", "a", RuleType::Compatibility, config.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::RuleAlreadyExists { .. }));

    // Update requires existence.
    let err = registry
        .update_artifact_rule(
            &c,
            "g",
            "a",
            RuleType::Validity,
            RuleConfiguration::validity(ValidityLevel::SyntaxOnly),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::RuleNotFound { .. }));

    registry
        .update_artifact_rule(
            &c,
            "g",
            "a",
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Backward),
        )
        .await
        .unwrap();
    let stored = registry
        .get_artifact_rule(&c, "g", "a", RuleType::Compatibility)
        .await
        .unwrap();
    assert_eq!(stored.compatibility_level(), Some(CompatibilityLevel::Backward));

    assert_eq!(
        registry.artifact_rules(&c, "g", "a").await.unwrap(),
        [RuleType::Compatibility]
    );

    registry
        .delete_artifact_rule(&c, "g", "a", RuleType::Compatibility)
        .await
        .unwrap();
    let err = registry
        .get_artifact_rule(&c, "g", "a", RuleType::Compatibility)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::RuleNotFound { .. }));
}

#[tokio::test]
async fn delete_artifact_rules_clears_all_rules_for_one_artifact() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, handle("{}"), None)
        .await
        .unwrap();
    registry
        .create_artifact_rule(
            &c,
            "g",
            "a",
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Backward),
        )
        .await
        .unwrap();
    registry
        .create_artifact_rule(
            &c,
            "g",
            "a",
            RuleType::Validity,
            RuleConfiguration::validity(ValidityLevel::Full),
        )
        .await
        .unwrap();

    registry.delete_artifact_rules(&c, "g", "a").await.unwrap();
    assert!(registry.artifact_rules(&c, "g", "a").await.unwrap().is_empty());
}

#[tokio::test]
async fn global_rule_crud_and_bulk_delete() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_global_rule(
            &c,
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Full),
        )
        .await
        .unwrap();
    registry
        .create_global_rule(
            &c,
            RuleType::Validity,
            RuleConfiguration::validity(ValidityLevel::SyntaxOnly),
        )
        .await
        .unwrap();

    let err = registry
        .create_global_rule(
            &c,
            RuleType::Validity,
            RuleConfiguration::validity(ValidityLevel::Full),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::RuleAlreadyExists { .. }));

    assert_eq!(registry.global_rules(&c).await.unwrap().len(), 2);

    registry.delete_global_rules(&c).await.unwrap();
    assert!(registry.global_rules(&c).await.unwrap().is_empty());
    let err = registry
        .get_global_rule(&c, RuleType::Compatibility)
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::RuleNotFound { .. }));
}

#[tokio::test]
async fn rule_configurations_are_validated_at_write_time() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    let err = registry
        .create_global_rule(
            &c,
            RuleType::Compatibility,
            RuleConfiguration::new("SIDEWAYS"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RegistryError::InvalidRuleConfiguration { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    // INTEGRITY configurations are opaque and accepted as-is.
    registry
        .create_global_rule(&c, RuleType::Integrity, RuleConfiguration::new("FULL"))
        .await
        .unwrap();
}

#[tokio::test]
async fn integrity_rule_does_not_gate_writes() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_global_rule(&c, RuleType::Integrity, RuleConfiguration::new("FULL"))
        .await
        .unwrap();

    // No executor is registered for INTEGRITY in the core; writes pass.
    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, handle("{}"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn unregistered_formats_skip_compatibility_checking() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_global_rule(
            &c,
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Full),
        )
        .await
        .unwrap();

    registry
        .create_artifact(&c, "g", "p", ArtifactType::Protobuf, handle("message A {}"), None)
        .await
        .unwrap();
    // Arbitrary changes pass: no checker is registered for Protobuf.
    registry
        .update_artifact(&c, "g", "p", ArtifactType::Protobuf, handle("message B { int32 x = 1; }"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn transitive_level_checks_all_prior_versions() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, handle(r#"{"enum":["a","b","c"]}"#), None)
        .await
        .unwrap();
    registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, handle(r#"{"enum":["a","b"]}"#), None)
        .await
        .unwrap();

    registry
        .create_artifact_rule(
            &c,
            "g",
            "a",
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::BackwardTransitive),
        )
        .await
        .unwrap();

    // Compatible with the latest version but not with v1.
    let err = registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, handle(r#"{"enum":["a","b"]}"#), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RuleViolation);
}

#[tokio::test]
async fn readiness_follows_global_rule_listing() {
    let registry = MemoryRegistry::new();
    let c = ctx();
    assert!(registry.is_alive(&c).await);
    assert!(registry.is_ready(&c).await);
}
