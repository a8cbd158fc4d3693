//! Integration tests for the artifact lifecycle state machine: content
//! visibility under DISABLED, metadata reachability, and re-enablement.

use atrium_core::{ArtifactState, ArtifactType, ContentHandle, TenantContext, Version};
use atrium_registry::{
    EditableArtifactMetadata, ErrorKind, MemoryRegistry, RegistryError, RegistryStorage,
};

fn ctx() -> TenantContext {
    TenantContext::default()
}

fn json(content: &str) -> ContentHandle {
    ContentHandle::from(content)
}

async fn three_version_artifact(registry: &MemoryRegistry) {
    let c = ctx();
    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, json(r#"{"v":1}"#), None)
        .await
        .unwrap();
    registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, json(r#"{"v":2}"#), None)
        .await
        .unwrap();
    registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, json(r#"{"v":3}"#), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn disabling_latest_version_shifts_the_projection() {
    let registry = MemoryRegistry::new();
    let c = ctx();
    three_version_artifact(&registry).await;

    let meta = registry.get_artifact_metadata(&c, "g", "a").await.unwrap();
    assert_eq!(meta.version, Version::from_raw(3));

    registry
        .update_artifact_version_state(&c, "g", "a", Version::from_raw(3), ArtifactState::Disabled)
        .await
        .unwrap();

    // Content of the disabled version is gone...
    let err = registry
        .get_artifact_version(&c, "g", "a", Version::from_raw(3))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // ...its metadata is not.
    let vmeta = registry
        .get_artifact_version_metadata(&c, "g", "a", Version::from_raw(3))
        .await
        .unwrap();
    assert_eq!(vmeta.state, ArtifactState::Disabled);

    // The artifact projection falls back to the highest readable version.
    let meta = registry.get_artifact_metadata(&c, "g", "a").await.unwrap();
    assert_eq!(meta.version, Version::from_raw(2));
    let stored = registry.get_artifact(&c, "g", "a").await.unwrap();
    assert_eq!(stored.version, Version::from_raw(2));
}

#[tokio::test]
async fn reenabling_restores_identical_content() {
    let registry = MemoryRegistry::new();
    let c = ctx();
    three_version_artifact(&registry).await;

    let before = registry.get_artifact(&c, "g", "a").await.unwrap();

    registry
        .update_artifact_version_state(&c, "g", "a", Version::from_raw(3), ArtifactState::Disabled)
        .await
        .unwrap();
    registry
        .update_artifact_version_state(&c, "g", "a", Version::from_raw(3), ArtifactState::Enabled)
        .await
        .unwrap();

    let after = registry.get_artifact(&c, "g", "a").await.unwrap();
    assert_eq!(after.version, before.version);
    assert_eq!(after.global_id, before.global_id);
    assert_eq!(after.content.bytes(), before.content.bytes());
}

#[tokio::test]
async fn fully_disabled_artifact_reads_as_not_found_but_keeps_metadata_access() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, json(r#"{"v":1}"#), None)
        .await
        .unwrap();
    registry
        .update_artifact_state(&c, "g", "a", ArtifactState::Disabled)
        .await
        .unwrap();

    // Content retrieval fails as not-found; internally the disabled case is
    // a distinct variant.
    let err = registry.get_artifact(&c, "g", "a").await.unwrap_err();
    assert!(matches!(err, RegistryError::ArtifactDisabled { .. }));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = registry.get_artifact_metadata(&c, "g", "a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Version metadata stays readable and writable.
    let vmeta = registry
        .get_artifact_version_metadata(&c, "g", "a", Version::from_raw(1))
        .await
        .unwrap();
    assert_eq!(vmeta.state, ArtifactState::Disabled);

    registry
        .update_artifact_version_metadata(
            &c,
            "g",
            "a",
            Version::from_raw(1),
            &EditableArtifactMetadata::named("still editable"),
        )
        .await
        .unwrap();

    // Artifact-level metadata PUT also remains allowed while disabled.
    registry
        .update_artifact_metadata(&c, "g", "a", &EditableArtifactMetadata::named("renamed"))
        .await
        .unwrap();
}

#[tokio::test]
async fn artifact_level_state_change_targets_the_current_version() {
    let registry = MemoryRegistry::new();
    let c = ctx();
    three_version_artifact(&registry).await;

    // Artifact-level disable applies to v3, the current version.
    registry
        .update_artifact_state(&c, "g", "a", ArtifactState::Disabled)
        .await
        .unwrap();
    let v3 = registry
        .get_artifact_version_metadata(&c, "g", "a", Version::from_raw(3))
        .await
        .unwrap();
    assert_eq!(v3.state, ArtifactState::Disabled);

    // With v3 disabled the current version is v2; a second artifact-level
    // disable targets it.
    registry
        .update_artifact_state(&c, "g", "a", ArtifactState::Disabled)
        .await
        .unwrap();
    let v2 = registry
        .get_artifact_version_metadata(&c, "g", "a", Version::from_raw(2))
        .await
        .unwrap();
    assert_eq!(v2.state, ArtifactState::Disabled);
    assert_eq!(
        registry
            .get_artifact(&c, "g", "a")
            .await
            .unwrap()
            .version,
        Version::from_raw(1)
    );
}

#[tokio::test]
async fn fully_disabled_artifact_can_be_reenabled_at_artifact_level() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, json(r#"{"v":1}"#), None)
        .await
        .unwrap();
    registry
        .update_artifact_state(&c, "g", "a", ArtifactState::Disabled)
        .await
        .unwrap();
    assert!(registry.get_artifact(&c, "g", "a").await.is_err());

    // With every version disabled, the artifact-level operation falls back
    // to the highest-numbered version so the artifact stays administrable.
    registry
        .update_artifact_state(&c, "g", "a", ArtifactState::Enabled)
        .await
        .unwrap();
    assert!(registry.get_artifact(&c, "g", "a").await.is_ok());
}

#[tokio::test]
async fn deprecated_behaves_like_enabled_for_reads_and_writes() {
    let registry = MemoryRegistry::new();
    let c = ctx();
    three_version_artifact(&registry).await;

    registry
        .update_artifact_state(&c, "g", "a", ArtifactState::Deprecated)
        .await
        .unwrap();

    let meta = registry.get_artifact_metadata(&c, "g", "a").await.unwrap();
    assert_eq!(meta.state, ArtifactState::Deprecated);
    assert_eq!(meta.version, Version::from_raw(3));

    // Content stays retrievable and new versions can still be published.
    assert!(registry.get_artifact(&c, "g", "a").await.is_ok());
    let v4 = registry
        .update_artifact(&c, "g", "a", ArtifactType::Json, json(r#"{"v":4}"#), None)
        .await
        .unwrap();
    assert_eq!(v4.version, Version::from_raw(4));
}

#[tokio::test]
async fn transitions_are_any_to_any() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, json("{}"), None)
        .await
        .unwrap();

    for state in [
        ArtifactState::Deprecated,
        ArtifactState::Disabled,
        ArtifactState::Deprecated,
        ArtifactState::Enabled,
        ArtifactState::Disabled,
        ArtifactState::Enabled,
    ] {
        registry
            .update_artifact_version_state(&c, "g", "a", Version::from_raw(1), state)
            .await
            .unwrap();
        let meta = registry
            .get_artifact_version_metadata(&c, "g", "a", Version::from_raw(1))
            .await
            .unwrap();
        assert_eq!(meta.state, state);
    }
}

#[tokio::test]
async fn disabled_version_is_hidden_from_global_id_lookup() {
    let registry = MemoryRegistry::new();
    let c = ctx();

    let created = registry
        .create_artifact(&c, "g", "a", ArtifactType::Json, json("{}"), None)
        .await
        .unwrap();
    registry
        .update_artifact_version_state(&c, "g", "a", created.version, ArtifactState::Disabled)
        .await
        .unwrap();

    let err = registry
        .get_artifact_version_by_global_id(&c, created.global_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Metadata lookup by global id still works.
    assert!(registry
        .get_artifact_metadata_by_global_id(&c, created.global_id)
        .await
        .is_ok());
}
