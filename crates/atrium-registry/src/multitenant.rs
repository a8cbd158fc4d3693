//! The multitenant router.
//!
//! [`MultitenantRegistry`] maps each tenant id to an isolated
//! [`MemoryRegistry`] instance, created lazily on first access. The router
//! implements no storage semantics of its own: it is a pure multiplexer that
//! resolves the operation's [`TenantContext`] and delegates, except tenant
//! metadata, which it synthesizes directly.
//!
//! The get-or-create step is atomic: under concurrent first access to one
//! tenant, exactly one storage instance (with one set of id counters) is
//! constructed.

use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use atrium_core::{
    ArtifactState, ArtifactType, ContentHandle, ContentId, GlobalId, RuleType, TenantContext,
    TenantId, TenantMetadata, Version,
};

use crate::error::{RegistryError, Result};
use crate::memory::MemoryRegistry;
use crate::meta::{
    ArtifactMetadata, EditableArtifactMetadata, GroupMetadata, LogConfiguration, StoredArtifact,
    VersionMetadata,
};
use crate::rules::RuleConfiguration;
use crate::search::{
    ArtifactSearchResults, OrderBy, OrderDirection, SearchFilter, VersionSearchResults,
};
use crate::storage::RegistryStorage;

/// Routes every facade operation to the calling tenant's isolated storage.
#[derive(Debug, Default)]
pub struct MultitenantRegistry {
    tenants: RwLock<HashMap<TenantId, Arc<MemoryRegistry>>>,
}

impl MultitenantRegistry {
    /// Creates a router with no tenant storages yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves the tenant's storage, creating it on first reference.
    fn tenant_storage(&self, ctx: &TenantContext) -> Result<Arc<MemoryRegistry>> {
        let tenant_id = ctx.tenant_id();

        {
            let tenants = self
                .tenants
                .read()
                .map_err(|_| RegistryError::storage("tenant table lock poisoned"))?;
            if let Some(storage) = tenants.get(tenant_id) {
                return Ok(Arc::clone(storage));
            }
        }

        let mut tenants = self
            .tenants
            .write()
            .map_err(|_| RegistryError::storage("tenant table lock poisoned"))?;
        let storage = tenants.entry(tenant_id.clone()).or_insert_with(|| {
            tracing::info!(tenant = %tenant_id, "initializing tenant storage");
            Arc::new(MemoryRegistry::new())
        });
        Ok(Arc::clone(storage))
    }

    /// Number of tenant storages created so far.
    #[must_use]
    pub fn tenant_count(&self) -> usize {
        self.tenants.read().map(|t| t.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RegistryStorage for MultitenantRegistry {
    async fn is_alive(&self, ctx: &TenantContext) -> bool {
        match self.tenant_storage(ctx) {
            Ok(storage) => storage.is_alive(ctx).await,
            Err(_) => false,
        }
    }

    async fn is_ready(&self, ctx: &TenantContext) -> bool {
        match self.tenant_storage(ctx) {
            Ok(storage) => storage.is_ready(ctx).await,
            Err(_) => false,
        }
    }

    fn supports_multitenancy(&self) -> bool {
        true
    }

    async fn create_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: ContentHandle,
        metadata: Option<EditableArtifactMetadata>,
    ) -> Result<ArtifactMetadata> {
        self.tenant_storage(ctx)?
            .create_artifact(ctx, group_id, artifact_id, artifact_type, content, metadata)
            .await
    }

    async fn update_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: ContentHandle,
        metadata: Option<EditableArtifactMetadata>,
    ) -> Result<ArtifactMetadata> {
        self.tenant_storage(ctx)?
            .update_artifact(ctx, group_id, artifact_id, artifact_type, content, metadata)
            .await
    }

    async fn get_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<StoredArtifact> {
        self.tenant_storage(ctx)?
            .get_artifact(ctx, group_id, artifact_id)
            .await
    }

    async fn delete_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<BTreeSet<GlobalId>> {
        self.tenant_storage(ctx)?
            .delete_artifact(ctx, group_id, artifact_id)
            .await
    }

    async fn delete_artifacts(&self, ctx: &TenantContext, group_id: &str) -> Result<()> {
        self.tenant_storage(ctx)?
            .delete_artifacts(ctx, group_id)
            .await
    }

    async fn artifact_ids(
        &self,
        ctx: &TenantContext,
        limit: Option<usize>,
    ) -> Result<BTreeSet<String>> {
        self.tenant_storage(ctx)?.artifact_ids(ctx, limit).await
    }

    async fn search_artifacts(
        &self,
        ctx: &TenantContext,
        filters: &[SearchFilter],
        order_by: OrderBy,
        order_direction: OrderDirection,
        offset: usize,
        limit: usize,
    ) -> Result<ArtifactSearchResults> {
        self.tenant_storage(ctx)?
            .search_artifacts(ctx, filters, order_by, order_direction, offset, limit)
            .await
    }

    async fn get_artifact_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<ArtifactMetadata> {
        self.tenant_storage(ctx)?
            .get_artifact_metadata(ctx, group_id, artifact_id)
            .await
    }

    async fn get_artifact_metadata_by_global_id(
        &self,
        ctx: &TenantContext,
        global_id: GlobalId,
    ) -> Result<ArtifactMetadata> {
        self.tenant_storage(ctx)?
            .get_artifact_metadata_by_global_id(ctx, global_id)
            .await
    }

    async fn get_artifact_version_metadata_by_content(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        canonical: bool,
        content: &ContentHandle,
    ) -> Result<VersionMetadata> {
        self.tenant_storage(ctx)?
            .get_artifact_version_metadata_by_content(ctx, group_id, artifact_id, canonical, content)
            .await
    }

    async fn update_artifact_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        metadata: &EditableArtifactMetadata,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_artifact_metadata(ctx, group_id, artifact_id, metadata)
            .await
    }

    async fn update_artifact_state(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        state: ArtifactState,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_artifact_state(ctx, group_id, artifact_id, state)
            .await
    }

    async fn update_artifact_version_state(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
        state: ArtifactState,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_artifact_version_state(ctx, group_id, artifact_id, version, state)
            .await
    }

    async fn artifact_versions(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<BTreeSet<GlobalId>> {
        self.tenant_storage(ctx)?
            .artifact_versions(ctx, group_id, artifact_id)
            .await
    }

    async fn search_versions(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<VersionSearchResults> {
        self.tenant_storage(ctx)?
            .search_versions(ctx, group_id, artifact_id, offset, limit)
            .await
    }

    async fn get_artifact_version_by_global_id(
        &self,
        ctx: &TenantContext,
        global_id: GlobalId,
    ) -> Result<StoredArtifact> {
        self.tenant_storage(ctx)?
            .get_artifact_version_by_global_id(ctx, global_id)
            .await
    }

    async fn get_artifact_version(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<StoredArtifact> {
        self.tenant_storage(ctx)?
            .get_artifact_version(ctx, group_id, artifact_id, version)
            .await
    }

    async fn delete_artifact_version(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .delete_artifact_version(ctx, group_id, artifact_id, version)
            .await
    }

    async fn get_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<VersionMetadata> {
        self.tenant_storage(ctx)?
            .get_artifact_version_metadata(ctx, group_id, artifact_id, version)
            .await
    }

    async fn update_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
        metadata: &EditableArtifactMetadata,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_artifact_version_metadata(ctx, group_id, artifact_id, version, metadata)
            .await
    }

    async fn delete_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .delete_artifact_version_metadata(ctx, group_id, artifact_id, version)
            .await
    }

    async fn artifact_rules(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Vec<RuleType>> {
        self.tenant_storage(ctx)?
            .artifact_rules(ctx, group_id, artifact_id)
            .await
    }

    async fn create_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .create_artifact_rule(ctx, group_id, artifact_id, rule_type, config)
            .await
    }

    async fn get_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
    ) -> Result<RuleConfiguration> {
        self.tenant_storage(ctx)?
            .get_artifact_rule(ctx, group_id, artifact_id, rule_type)
            .await
    }

    async fn update_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_artifact_rule(ctx, group_id, artifact_id, rule_type, config)
            .await
    }

    async fn delete_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .delete_artifact_rule(ctx, group_id, artifact_id, rule_type)
            .await
    }

    async fn delete_artifact_rules(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .delete_artifact_rules(ctx, group_id, artifact_id)
            .await
    }

    async fn global_rules(&self, ctx: &TenantContext) -> Result<Vec<RuleType>> {
        self.tenant_storage(ctx)?.global_rules(ctx).await
    }

    async fn create_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .create_global_rule(ctx, rule_type, config)
            .await
    }

    async fn get_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
    ) -> Result<RuleConfiguration> {
        self.tenant_storage(ctx)?.get_global_rule(ctx, rule_type).await
    }

    async fn update_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_global_rule(ctx, rule_type, config)
            .await
    }

    async fn delete_global_rule(&self, ctx: &TenantContext, rule_type: RuleType) -> Result<()> {
        self.tenant_storage(ctx)?
            .delete_global_rule(ctx, rule_type)
            .await
    }

    async fn delete_global_rules(&self, ctx: &TenantContext) -> Result<()> {
        self.tenant_storage(ctx)?.delete_global_rules(ctx).await
    }

    async fn content_by_id(
        &self,
        ctx: &TenantContext,
        content_id: ContentId,
    ) -> Result<ContentHandle> {
        self.tenant_storage(ctx)?.content_by_id(ctx, content_id).await
    }

    async fn content_by_hash(
        &self,
        ctx: &TenantContext,
        content_hash: &str,
    ) -> Result<ContentHandle> {
        self.tenant_storage(ctx)?
            .content_by_hash(ctx, content_hash)
            .await
    }

    async fn versions_by_content_id(
        &self,
        ctx: &TenantContext,
        content_id: ContentId,
    ) -> Result<Vec<VersionMetadata>> {
        self.tenant_storage(ctx)?
            .versions_by_content_id(ctx, content_id)
            .await
    }

    async fn create_group(&self, ctx: &TenantContext, group: GroupMetadata) -> Result<()> {
        self.tenant_storage(ctx)?.create_group(ctx, group).await
    }

    async fn update_group_metadata(&self, ctx: &TenantContext, group: GroupMetadata) -> Result<()> {
        self.tenant_storage(ctx)?
            .update_group_metadata(ctx, group)
            .await
    }

    async fn delete_group(&self, ctx: &TenantContext, group_id: &str) -> Result<()> {
        self.tenant_storage(ctx)?.delete_group(ctx, group_id).await
    }

    async fn group_ids(&self, ctx: &TenantContext, limit: Option<usize>) -> Result<Vec<String>> {
        self.tenant_storage(ctx)?.group_ids(ctx, limit).await
    }

    async fn get_group_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
    ) -> Result<GroupMetadata> {
        self.tenant_storage(ctx)?
            .get_group_metadata(ctx, group_id)
            .await
    }

    async fn get_log_configuration(
        &self,
        ctx: &TenantContext,
        logger: &str,
    ) -> Result<LogConfiguration> {
        self.tenant_storage(ctx)?
            .get_log_configuration(ctx, logger)
            .await
    }

    async fn set_log_configuration(
        &self,
        ctx: &TenantContext,
        config: LogConfiguration,
    ) -> Result<()> {
        self.tenant_storage(ctx)?
            .set_log_configuration(ctx, config)
            .await
    }

    async fn remove_log_configuration(&self, ctx: &TenantContext, logger: &str) -> Result<()> {
        self.tenant_storage(ctx)?
            .remove_log_configuration(ctx, logger)
            .await
    }

    async fn list_log_configurations(&self, ctx: &TenantContext) -> Result<Vec<LogConfiguration>> {
        self.tenant_storage(ctx)?.list_log_configurations(ctx).await
    }

    async fn get_tenant_metadata(
        &self,
        ctx: &TenantContext,
        tenant_id: &TenantId,
    ) -> Result<TenantMetadata> {
        // Synthesized directly; tenant metadata is not part of the isolated
        // storage unit.
        let _ = ctx;
        Ok(TenantMetadata {
            tenant_id: tenant_id.to_string(),
            ..TenantMetadata::default()
        })
    }
}
