//! The registry storage facade.
//!
//! [`RegistryStorage`] is the single contract every backend implements and
//! every external consumer (REST layer, serde adapters) programs against.
//! Each operation is scoped by an explicit [`TenantContext`]; backends that
//! multiplex tenants resolve the context to an isolated instance, while
//! single-tenant backends may ignore it.
//!
//! Every mutating call is observable by subsequent reads on the same
//! instance; there is no asynchronous propagation delay in the core.

use async_trait::async_trait;
use std::collections::BTreeSet;

use atrium_core::{
    ArtifactState, ArtifactType, ContentHandle, ContentId, GlobalId, RuleType, TenantContext,
    TenantId, TenantMetadata, Version,
};

use crate::error::Result;
use crate::meta::{
    ArtifactMetadata, EditableArtifactMetadata, GroupMetadata, LogConfiguration, StoredArtifact,
    VersionMetadata,
};
use crate::rules::RuleConfiguration;
use crate::search::{ArtifactSearchResults, OrderBy, OrderDirection, SearchFilter, VersionSearchResults};

/// The storage contract of the registry.
#[async_trait]
pub trait RegistryStorage: Send + Sync + std::fmt::Debug {
    /// Is the storage alive? Defaults to yes.
    async fn is_alive(&self, _ctx: &TenantContext) -> bool {
        true
    }

    /// Is the storage ready? By default, ready means the global rules are
    /// listable without error.
    async fn is_ready(&self, ctx: &TenantContext) -> bool {
        self.global_rules(ctx).await.is_ok()
    }

    /// Whether this backend isolates tenants. Backends that do not must not
    /// be deployed with multitenancy enabled.
    fn supports_multitenancy(&self) -> bool {
        false
    }

    // -- artifacts ---------------------------------------------------------

    /// Creates a new artifact and its first version from `content`.
    ///
    /// Runs the effective VALIDITY and COMPATIBILITY rules before accepting.
    /// The group is created implicitly when absent. Fails with
    /// `ArtifactAlreadyExists` when `(group_id, artifact_id)` is taken; a
    /// failed call leaves no observable state.
    async fn create_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: ContentHandle,
        metadata: Option<EditableArtifactMetadata>,
    ) -> Result<ArtifactMetadata>;

    /// Appends a new version to an existing artifact.
    ///
    /// Runs the effective rules against the artifact's prior versions.
    /// Fails with `ArtifactNotFound` when the artifact does not exist.
    async fn update_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: ContentHandle,
        metadata: Option<EditableArtifactMetadata>,
    ) -> Result<ArtifactMetadata>;

    /// Returns the content of the latest non-disabled version.
    ///
    /// Fails with `ArtifactNotFound` when the artifact does not exist and
    /// with the (externally identical) disabled-latest error when every
    /// version is disabled.
    async fn get_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<StoredArtifact>;

    /// Deletes an artifact, its versions, and its rules.
    ///
    /// Returns the full sorted set of removed global ids, for downstream
    /// cache invalidation.
    async fn delete_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<BTreeSet<GlobalId>>;

    /// Deletes every artifact in the given group.
    async fn delete_artifacts(&self, ctx: &TenantContext, group_id: &str) -> Result<()>;

    /// Returns up to `limit` artifact ids across all groups.
    async fn artifact_ids(
        &self,
        ctx: &TenantContext,
        limit: Option<usize>,
    ) -> Result<BTreeSet<String>>;

    /// Searches artifacts by the given criteria, ordered and paged.
    async fn search_artifacts(
        &self,
        ctx: &TenantContext,
        filters: &[SearchFilter],
        order_by: OrderBy,
        order_direction: OrderDirection,
        offset: usize,
        limit: usize,
    ) -> Result<ArtifactSearchResults>;

    // -- artifact metadata -------------------------------------------------

    /// Returns the artifact metadata projected from its latest non-disabled
    /// version (generated and editable fields).
    async fn get_artifact_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<ArtifactMetadata>;

    /// Returns the artifact metadata of the version with the given global id.
    async fn get_artifact_metadata_by_global_id(
        &self,
        ctx: &TenantContext,
        global_id: GlobalId,
    ) -> Result<ArtifactMetadata>;

    /// Returns the metadata of the latest version whose content matches
    /// `content`: byte-identical when `canonical` is false, identical in
    /// canonical form when true.
    async fn get_artifact_version_metadata_by_content(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        canonical: bool,
        content: &ContentHandle,
    ) -> Result<VersionMetadata>;

    /// Replaces the editable metadata of the artifact's current version.
    async fn update_artifact_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        metadata: &EditableArtifactMetadata,
    ) -> Result<()>;

    // -- artifact state ----------------------------------------------------

    /// Sets the state of the artifact's current version.
    async fn update_artifact_state(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        state: ArtifactState,
    ) -> Result<()>;

    /// Sets the state of one specific version.
    async fn update_artifact_version_state(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
        state: ArtifactState,
    ) -> Result<()>;

    // -- versions ----------------------------------------------------------

    /// Returns the global ids of the artifact's versions, ordered by version
    /// number.
    async fn artifact_versions(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<BTreeSet<GlobalId>>;

    /// Pages through the artifact's version metadata.
    async fn search_versions(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<VersionSearchResults>;

    /// Returns the content of the version with the given global id.
    ///
    /// Disabled versions fail as not-found.
    async fn get_artifact_version_by_global_id(
        &self,
        ctx: &TenantContext,
        global_id: GlobalId,
    ) -> Result<StoredArtifact>;

    /// Returns the content of one specific version.
    ///
    /// Disabled versions fail as not-found.
    async fn get_artifact_version(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<StoredArtifact>;

    /// Deletes one version. Remaining versions keep their numbers; the
    /// deleted number is never reused.
    async fn delete_artifact_version(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<()>;

    /// Returns the metadata of one version, regardless of its state.
    async fn get_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<VersionMetadata>;

    /// Replaces the editable metadata of one version.
    async fn update_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
        metadata: &EditableArtifactMetadata,
    ) -> Result<()>;

    /// Clears the editable metadata of one version, preserving the generated
    /// fields.
    async fn delete_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<()>;

    // -- artifact rules ----------------------------------------------------

    /// Lists the rule types configured for the artifact.
    async fn artifact_rules(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Vec<RuleType>>;

    /// Configures a rule for the artifact. Fails with `RuleAlreadyExists`
    /// when a rule of that type is already configured.
    async fn create_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()>;

    /// Returns the artifact's configuration of one rule type.
    async fn get_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
    ) -> Result<RuleConfiguration>;

    /// Replaces the configuration of an existing artifact rule.
    async fn update_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()>;

    /// Removes one rule from the artifact.
    async fn delete_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
    ) -> Result<()>;

    /// Removes every rule configured for the artifact.
    async fn delete_artifact_rules(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<()>;

    // -- global rules ------------------------------------------------------

    /// Lists the globally configured rule types.
    async fn global_rules(&self, ctx: &TenantContext) -> Result<Vec<RuleType>>;

    /// Configures a global rule. Fails with `RuleAlreadyExists` when a rule
    /// of that type is already configured globally.
    async fn create_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()>;

    /// Returns the global configuration of one rule type.
    async fn get_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
    ) -> Result<RuleConfiguration>;

    /// Replaces the configuration of an existing global rule.
    async fn update_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()>;

    /// Removes one global rule.
    async fn delete_global_rule(&self, ctx: &TenantContext, rule_type: RuleType) -> Result<()>;

    /// Removes every global rule.
    async fn delete_global_rules(&self, ctx: &TenantContext) -> Result<()>;

    // -- content -----------------------------------------------------------

    /// Returns the content stored under the given content id.
    async fn content_by_id(
        &self,
        ctx: &TenantContext,
        content_id: ContentId,
    ) -> Result<ContentHandle>;

    /// Returns the content stored under the given SHA-256 hash.
    async fn content_by_hash(
        &self,
        ctx: &TenantContext,
        content_hash: &str,
    ) -> Result<ContentHandle>;

    /// Reverse index: every version (across all artifacts) referencing the
    /// given content entry, ordered by global id.
    async fn versions_by_content_id(
        &self,
        ctx: &TenantContext,
        content_id: ContentId,
    ) -> Result<Vec<VersionMetadata>>;

    // -- groups ------------------------------------------------------------

    /// Creates a group. Fails with `GroupAlreadyExists` when taken.
    async fn create_group(&self, ctx: &TenantContext, group: GroupMetadata) -> Result<()>;

    /// Replaces the metadata of an existing group.
    async fn update_group_metadata(&self, ctx: &TenantContext, group: GroupMetadata) -> Result<()>;

    /// Deletes a group, cascading deletion of its artifacts.
    async fn delete_group(&self, ctx: &TenantContext, group_id: &str) -> Result<()>;

    /// Returns up to `limit` group ids.
    async fn group_ids(&self, ctx: &TenantContext, limit: Option<usize>) -> Result<Vec<String>>;

    /// Returns the metadata of one group.
    async fn get_group_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
    ) -> Result<GroupMetadata>;

    // -- log configuration -------------------------------------------------

    /// Returns the level override configured for one logger.
    async fn get_log_configuration(
        &self,
        ctx: &TenantContext,
        logger: &str,
    ) -> Result<LogConfiguration>;

    /// Creates or replaces a logger's level override.
    async fn set_log_configuration(
        &self,
        ctx: &TenantContext,
        config: LogConfiguration,
    ) -> Result<()>;

    /// Removes a logger's level override.
    async fn remove_log_configuration(&self, ctx: &TenantContext, logger: &str) -> Result<()>;

    /// Lists every configured logger override.
    async fn list_log_configurations(&self, ctx: &TenantContext) -> Result<Vec<LogConfiguration>>;

    // -- tenancy -----------------------------------------------------------

    /// Returns descriptive metadata for a tenant. Routers may synthesize
    /// this without touching the tenant's storage instance.
    async fn get_tenant_metadata(
        &self,
        ctx: &TenantContext,
        tenant_id: &TenantId,
    ) -> Result<TenantMetadata>;
}
