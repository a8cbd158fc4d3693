//! Integration tests for tenant isolation and the lazy tenant router.

use std::sync::Arc;

use atrium_core::{ArtifactType, ContentHandle, GlobalId, TenantContext, TenantId};
use atrium_registry::{
    build_registry, MultitenantRegistry, RegistryConfig, RegistryError, RegistryStorage,
    StorageKind,
};

fn tenant_ctx(id: &str) -> TenantContext {
    TenantContext::new(TenantId::new(id).unwrap())
}

fn handle(content: &str) -> ContentHandle {
    ContentHandle::from(content)
}

#[tokio::test]
async fn tenants_do_not_share_artifacts_or_counters() {
    let registry = MultitenantRegistry::new();
    let t1 = tenant_ctx("tenant-one");
    let t2 = tenant_ctx("tenant-two");

    let first = registry
        .create_artifact(&t1, "g", "a", ArtifactType::Json, handle(r#"{"v":1}"#), None)
        .await
        .unwrap();
    let second = registry
        .create_artifact(&t2, "g", "a", ArtifactType::Json, handle(r#"{"v":2}"#), None)
        .await
        .unwrap();

    // Same (group, artifact) key in both tenants; each counter starts at 1.
    assert_eq!(first.global_id, GlobalId::from_raw(1));
    assert_eq!(second.global_id, GlobalId::from_raw(1));

    let t1_content = registry.get_artifact(&t1, "g", "a").await.unwrap();
    let t2_content = registry.get_artifact(&t2, "g", "a").await.unwrap();
    assert_ne!(t1_content.content.bytes(), t2_content.content.bytes());
}

#[tokio::test]
async fn deleting_in_one_tenant_leaves_the_other_untouched() {
    let registry = MultitenantRegistry::new();
    let t1 = tenant_ctx("tenant-one");
    let t2 = tenant_ctx("tenant-two");

    for ctx in [&t1, &t2] {
        registry
            .create_artifact(ctx, "g", "a", ArtifactType::Json, handle("{}"), None)
            .await
            .unwrap();
    }

    registry.delete_artifact(&t1, "g", "a").await.unwrap();

    let err = registry.get_artifact(&t1, "g", "a").await.unwrap_err();
    assert!(matches!(err, RegistryError::ArtifactNotFound { .. }));
    assert!(registry.get_artifact(&t2, "g", "a").await.is_ok());
}

#[tokio::test]
async fn rules_are_tenant_scoped() {
    use atrium_core::RuleType;
    use atrium_registry::RuleConfiguration;
    use atrium_rules::CompatibilityLevel;

    let registry = MultitenantRegistry::new();
    let t1 = tenant_ctx("tenant-one");
    let t2 = tenant_ctx("tenant-two");

    registry
        .create_global_rule(
            &t1,
            RuleType::Compatibility,
            RuleConfiguration::compatibility(CompatibilityLevel::Backward),
        )
        .await
        .unwrap();

    assert_eq!(registry.global_rules(&t1).await.unwrap().len(), 1);
    assert!(registry.global_rules(&t2).await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_instances_are_stable_across_calls() {
    let registry = MultitenantRegistry::new();
    let ctx = tenant_ctx("tenant-one");

    registry
        .create_artifact(&ctx, "g", "a", ArtifactType::Json, handle("{}"), None)
        .await
        .unwrap();
    // A second call with an equal (not identical) context reaches the same
    // storage instance.
    let again = tenant_ctx("tenant-one");
    assert!(registry.get_artifact(&again, "g", "a").await.is_ok());
    assert_eq!(registry.tenant_count(), 1);
}

#[tokio::test]
async fn concurrent_first_access_creates_exactly_one_instance() {
    let registry = Arc::new(MultitenantRegistry::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            tokio::spawn(async move {
                let ctx = tenant_ctx("shared-tenant");
                registry
                    .create_artifact(
                        &ctx,
                        "g",
                        &format!("artifact-{i}"),
                        ArtifactType::Json,
                        handle("{}"),
                        None,
                    )
                    .await
                    .unwrap()
                    .global_id
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap());
    }
    ids.sort_unstable();

    // One instance means one counter: the ids are exactly 1..=8.
    let expected: Vec<GlobalId> = (1..=8).map(GlobalId::from_raw).collect();
    assert_eq!(ids, expected);
    assert_eq!(registry.tenant_count(), 1);
}

#[tokio::test]
async fn router_reports_multitenancy_support() {
    let registry = MultitenantRegistry::new();
    assert!(registry.supports_multitenancy());

    let single = atrium_registry::MemoryRegistry::new();
    assert!(!single.supports_multitenancy());
}

#[tokio::test]
async fn build_registry_validates_tenancy_mode_at_startup() {
    let valid = RegistryConfig {
        multitenancy_enabled: true,
        storage: StorageKind::MultitenantMemory,
    };
    assert!(build_registry(&valid).is_ok());

    let invalid = RegistryConfig {
        multitenancy_enabled: true,
        storage: StorageKind::Memory,
    };
    assert!(build_registry(&invalid).is_err(), "must fail fast");
}

#[tokio::test]
async fn tenant_metadata_is_synthesized_by_the_router() {
    let registry = MultitenantRegistry::new();
    let ctx = tenant_ctx("tenant-one");
    let tenant_id = TenantId::new("tenant-one").unwrap();

    let metadata = registry.get_tenant_metadata(&ctx, &tenant_id).await.unwrap();
    assert_eq!(metadata.tenant_id, "tenant-one");
    // Synthesizing metadata does not create a storage instance.
    assert_eq!(registry.tenant_count(), 0);
}

#[tokio::test]
async fn liveness_and_readiness_route_through_the_tenant() {
    let registry = MultitenantRegistry::new();
    let ctx = tenant_ctx("tenant-one");
    assert!(registry.is_alive(&ctx).await);
    assert!(registry.is_ready(&ctx).await);
}
