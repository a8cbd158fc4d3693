//! The in-memory reference storage engine.
//!
//! One [`MemoryRegistry`] holds the state of exactly one tenant: the
//! group/artifact directory, per-artifact version ledgers, the deduplicating
//! content store, rule configurations, and the tenant's id counters. All
//! state lives behind a single `RwLock`; every mutating operation is one
//! short write critical section, which makes check-then-act creation atomic
//! and lets rule evaluation and the subsequent append form one atomic step:
//! no concurrent write to the same artifact can interleave between them.

mod content;
mod ledger;

use chrono::Utc;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use atrium_core::{
    ArtifactState, ArtifactType, ContentHandle, ContentId, GlobalId, IdSequence, RuleType,
    TenantContext, TenantId, TenantMetadata, Version,
};
use atrium_rules::{check_compatibility, check_validity};

use crate::error::{RegistryError, Result};
use crate::meta::{
    ArtifactMetadata, EditableArtifactMetadata, GroupMetadata, LogConfiguration, StoredArtifact,
    VersionMetadata,
};
use crate::rules::RuleConfiguration;
use crate::search::{
    ArtifactSearchResults, OrderBy, OrderDirection, SearchFilter, SearchFilterKind,
    VersionSearchResults,
};
use crate::storage::RegistryStorage;

use content::ContentStore;
use ledger::{ArtifactKey, ArtifactRecord, VersionRecord};

/// In-memory storage for a single tenant.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    state: RwLock<TenantState>,
    ids: IdSequence,
}

#[derive(Debug, Default)]
struct TenantState {
    groups: HashMap<String, GroupMetadata>,
    artifacts: HashMap<ArtifactKey, ArtifactRecord>,
    global_index: HashMap<GlobalId, (ArtifactKey, Version)>,
    content: ContentStore,
    global_rules: HashMap<RuleType, RuleConfiguration>,
    log_configurations: HashMap<String, LogConfiguration>,
}

impl TenantState {
    fn artifact(&self, key: &ArtifactKey) -> Result<&ArtifactRecord> {
        self.artifacts
            .get(key)
            .ok_or_else(|| RegistryError::artifact_not_found(&key.group_id, &key.artifact_id))
    }

    fn artifact_mut(&mut self, key: &ArtifactKey) -> Result<&mut ArtifactRecord> {
        self.artifacts
            .get_mut(key)
            .ok_or_else(|| RegistryError::artifact_not_found(&key.group_id, &key.artifact_id))
    }

    /// The artifact-scoped rule when configured, else the global fallback.
    fn effective_rule(&self, key: &ArtifactKey, rule_type: RuleType) -> Option<&RuleConfiguration> {
        self.artifacts
            .get(key)
            .and_then(|record| record.rules.get(&rule_type))
            .or_else(|| self.global_rules.get(&rule_type))
    }

    /// Evaluates the effective VALIDITY and COMPATIBILITY rules for a
    /// candidate write. Runs before any state mutation.
    fn run_rules(
        &self,
        key: &ArtifactKey,
        artifact_type: ArtifactType,
        existing: &[ContentHandle],
        candidate: &ContentHandle,
    ) -> Result<()> {
        if let Some(config) = self.effective_rule(key, RuleType::Validity) {
            let level = config.validity_level().unwrap_or_default();
            check_validity(artifact_type, level, candidate)?;
        }
        if let Some(config) = self.effective_rule(key, RuleType::Compatibility) {
            let level = config.compatibility_level().unwrap_or_default();
            check_compatibility(artifact_type, level, existing, candidate)?;
        }
        Ok(())
    }

    /// Ledger contents of an artifact in version order, for compatibility
    /// checks.
    fn version_contents(&self, record: &ArtifactRecord) -> Vec<ContentHandle> {
        record
            .versions
            .values()
            .filter_map(|version| self.content.get(version.content_id))
            .map(|entry| entry.content.clone())
            .collect()
    }

    /// Removes one artifact record, releasing content references and the
    /// global index entries. Returns the removed global ids, sorted.
    fn remove_artifact(&mut self, key: &ArtifactKey) -> Option<BTreeSet<GlobalId>> {
        let record = self.artifacts.remove(key)?;
        let mut removed = BTreeSet::new();
        for version in record.versions.values() {
            self.global_index.remove(&version.global_id);
            self.content.release(version.content_id);
            removed.insert(version.global_id);
        }
        Some(removed)
    }
}

impl MemoryRegistry {
    /// Creates an empty storage instance with fresh id counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, TenantState>> {
        self.state
            .read()
            .map_err(|_| RegistryError::storage("state lock poisoned"))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, TenantState>> {
        self.state
            .write()
            .map_err(|_| RegistryError::storage("state lock poisoned"))
    }

    /// Appends one version: stores content, allocates the global id and the
    /// version number, and links the indexes. Callers have already passed
    /// rule evaluation inside the same critical section.
    fn append_version(
        &self,
        state: &mut TenantState,
        key: &ArtifactKey,
        content: ContentHandle,
        metadata: EditableArtifactMetadata,
        principal: Option<String>,
    ) -> Result<Version> {
        let content_id = state.content.store(&self.ids, content);
        let global_id = self.ids.next_global_id();
        let now = Utc::now();

        let record = state.artifact_mut(key)?;
        let version = record.allocate_version();
        record.versions.insert(
            version,
            VersionRecord {
                global_id,
                content_id,
                state: ArtifactState::default(),
                name: metadata.name,
                description: metadata.description,
                labels: metadata.labels,
                created_by: principal.clone(),
                created_on: now,
            },
        );
        record.modified_by = principal;
        record.modified_on = now;

        state.global_index.insert(global_id, (key.clone(), version));
        Ok(version)
    }

    fn artifact_metadata_at(
        state: &TenantState,
        key: &ArtifactKey,
        version: Version,
    ) -> Result<ArtifactMetadata> {
        let record = state.artifact(key)?;
        let version_record =
            record
                .versions
                .get(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: key.group_id.clone(),
                    artifact_id: key.artifact_id.clone(),
                    version,
                })?;
        Ok(record.to_artifact_metadata(key, version, version_record))
    }

    /// Ensures the group exists, creating it implicitly on first use.
    fn ensure_group(state: &mut TenantState, group_id: &str, principal: Option<&str>) {
        if !state.groups.contains_key(group_id) {
            let now = Utc::now();
            state.groups.insert(
                group_id.to_string(),
                GroupMetadata {
                    group_id: group_id.to_string(),
                    created_by: principal.map(str::to_string),
                    created_on: Some(now),
                    modified_by: principal.map(str::to_string),
                    modified_on: Some(now),
                    ..GroupMetadata::default()
                },
            );
        }
    }
}

/// Lifts name and description from a JSON document when the client supplied
/// no explicit metadata. OpenAPI-family documents carry them under `info`.
fn extract_metadata(artifact_type: ArtifactType, content: &ContentHandle) -> EditableArtifactMetadata {
    if !artifact_type.is_json_format() {
        return EditableArtifactMetadata::default();
    }
    let Ok(doc) = content.parse_json() else {
        return EditableArtifactMetadata::default();
    };
    let scope = match artifact_type {
        ArtifactType::Openapi | ArtifactType::Asyncapi => doc.get("info").cloned().unwrap_or(Value::Null),
        _ => doc,
    };
    EditableArtifactMetadata {
        name: scope
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string),
        description: scope
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        labels: std::collections::BTreeMap::new(),
    }
}

fn matches_filter(meta: &ArtifactMetadata, filter: &SearchFilter) -> bool {
    let value = filter.value.as_str();
    match filter.kind {
        SearchFilterKind::Name => {
            meta.name.as_deref().is_some_and(|n| n.contains(value))
                || meta.artifact_id.contains(value)
        }
        SearchFilterKind::Description => {
            meta.description.as_deref().is_some_and(|d| d.contains(value))
        }
        SearchFilterKind::Labels => match value.split_once(':') {
            Some((key, expected)) => meta.labels.get(key).is_some_and(|v| v == expected),
            None => meta.labels.contains_key(value),
        },
        SearchFilterKind::Group => meta.group_id == value,
        SearchFilterKind::Everything => {
            meta.name.as_deref().is_some_and(|n| n.contains(value))
                || meta.description.as_deref().is_some_and(|d| d.contains(value))
                || meta.artifact_id.contains(value)
                || meta.group_id.contains(value)
        }
    }
}

#[async_trait]
impl RegistryStorage for MemoryRegistry {
    async fn create_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        artifact_type: ArtifactType,
        content: ContentHandle,
        metadata: Option<EditableArtifactMetadata>,
    ) -> Result<ArtifactMetadata> {
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;

        if state.artifacts.contains_key(&key) {
            return Err(RegistryError::ArtifactAlreadyExists {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
            });
        }

        // Rules first: a rejected create consumes no ids and leaves no state.
        state.run_rules(&key, artifact_type, &[], &content)?;

        let principal = ctx.principal().map(str::to_string);
        Self::ensure_group(&mut state, group_id, principal.as_deref());
        state.artifacts.insert(
            key.clone(),
            ArtifactRecord::new(artifact_type, principal.clone(), Utc::now()),
        );

        let metadata = metadata.unwrap_or_else(|| extract_metadata(artifact_type, &content));
        let version = self.append_version(&mut state, &key, content, metadata, principal)?;

        tracing::debug!(
            tenant = %ctx.tenant_id(),
            group = %group_id,
            artifact = %artifact_id,
            %version,
            "artifact created"
        );
        Self::artifact_metadata_at(&state, &key, version)
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
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;

        let record = state.artifact(&key)?;
        let existing = state.version_contents(record);
        state.run_rules(&key, artifact_type, &existing, &content)?;

        let principal = ctx.principal().map(str::to_string);
        let metadata = metadata.unwrap_or_else(|| extract_metadata(artifact_type, &content));
        let version = self.append_version(&mut state, &key, content, metadata, principal)?;

        tracing::debug!(
            tenant = %ctx.tenant_id(),
            group = %group_id,
            artifact = %artifact_id,
            %version,
            "artifact version appended"
        );
        Self::artifact_metadata_at(&state, &key, version)
    }

    async fn get_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<StoredArtifact> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;

        let Some((version, version_record)) = record.latest_visible() else {
            return if record.versions.is_empty() {
                Err(RegistryError::artifact_not_found(group_id, artifact_id))
            } else {
                Err(RegistryError::ArtifactDisabled {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                })
            };
        };

        let entry = state
            .content
            .get(version_record.content_id)
            .ok_or_else(|| RegistryError::content_id_not_found(version_record.content_id))?;
        Ok(StoredArtifact {
            global_id: version_record.global_id,
            version,
            content_id: version_record.content_id,
            content: entry.content.clone(),
        })
    }

    async fn delete_artifact(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<BTreeSet<GlobalId>> {
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let removed = state
            .remove_artifact(&key)
            .ok_or_else(|| RegistryError::artifact_not_found(group_id, artifact_id))?;
        tracing::debug!(
            tenant = %ctx.tenant_id(),
            group = %group_id,
            artifact = %artifact_id,
            removed = removed.len(),
            "artifact deleted"
        );
        Ok(removed)
    }

    async fn delete_artifacts(&self, ctx: &TenantContext, group_id: &str) -> Result<()> {
        let mut state = self.write_state()?;
        let keys: Vec<ArtifactKey> = state
            .artifacts
            .keys()
            .filter(|key| key.group_id == group_id)
            .cloned()
            .collect();
        for key in &keys {
            state.remove_artifact(key);
        }
        tracing::debug!(
            tenant = %ctx.tenant_id(),
            group = %group_id,
            removed = keys.len(),
            "group artifacts deleted"
        );
        Ok(())
    }

    async fn artifact_ids(
        &self,
        ctx: &TenantContext,
        limit: Option<usize>,
    ) -> Result<BTreeSet<String>> {
        let _ = ctx;
        let state = self.read_state()?;
        let mut ids: BTreeSet<String> = BTreeSet::new();
        for key in state.artifacts.keys() {
            if let Some(limit) = limit {
                if ids.len() >= limit {
                    break;
                }
            }
            ids.insert(key.artifact_id.clone());
        }
        Ok(ids)
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
        let _ = ctx;
        let state = self.read_state()?;

        let mut matches: Vec<ArtifactMetadata> = state
            .artifacts
            .iter()
            .filter_map(|(key, record)| {
                // Search projects from the current version, falling back to
                // the disabled latest so administration can still find it.
                let (version, version_record) =
                    record.latest_visible().or_else(|| record.latest_any())?;
                Some(record.to_artifact_metadata(key, version, version_record))
            })
            .filter(|meta| filters.iter().all(|f| matches_filter(meta, f)))
            .collect();

        match order_by {
            OrderBy::Name => matches.sort_by(|a, b| {
                let a_key = a.name.as_deref().unwrap_or(&a.artifact_id).to_lowercase();
                let b_key = b.name.as_deref().unwrap_or(&b.artifact_id).to_lowercase();
                a_key.cmp(&b_key)
            }),
            OrderBy::CreatedOn => matches.sort_by_key(|m| m.created_on),
        }
        if order_direction == OrderDirection::Desc {
            matches.reverse();
        }

        let count = matches.len();
        let artifacts = matches.into_iter().skip(offset).take(limit).collect();
        Ok(ArtifactSearchResults { artifacts, count })
    }

    async fn get_artifact_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<ArtifactMetadata> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;

        match record.latest_visible() {
            Some((version, version_record)) => {
                Ok(record.to_artifact_metadata(&key, version, version_record))
            }
            None if record.versions.is_empty() => {
                Err(RegistryError::artifact_not_found(group_id, artifact_id))
            }
            None => Err(RegistryError::ArtifactDisabled {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
            }),
        }
    }

    async fn get_artifact_metadata_by_global_id(
        &self,
        ctx: &TenantContext,
        global_id: GlobalId,
    ) -> Result<ArtifactMetadata> {
        let _ = ctx;
        let state = self.read_state()?;
        let (key, version) = state
            .global_index
            .get(&global_id)
            .ok_or(RegistryError::GlobalIdNotFound { global_id })?
            .clone();
        Self::artifact_metadata_at(&state, &key, version)
    }

    async fn get_artifact_version_metadata_by_content(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        canonical: bool,
        content: &ContentHandle,
    ) -> Result<VersionMetadata> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;

        let needle = if canonical {
            content.canonical_sha256_hex()
        } else {
            content.sha256_hex()
        };

        for (version, version_record) in record.versions.iter().rev() {
            let Some(entry) = state.content.get(version_record.content_id) else {
                continue;
            };
            let stored = if canonical {
                &entry.canonical_hash
            } else {
                &entry.hash
            };
            if *stored == needle {
                return Ok(version_record.to_version_metadata(
                    &key,
                    record.artifact_type,
                    *version,
                ));
            }
        }
        Err(RegistryError::ContentNotFound {
            detail: format!("no version of {group_id}/{artifact_id} with matching content"),
        })
    }

    async fn update_artifact_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        metadata: &EditableArtifactMetadata,
    ) -> Result<()> {
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let principal = ctx.principal().map(str::to_string);
        let record = state.artifact_mut(&key)?;

        let version = record
            .current_version()
            .ok_or_else(|| RegistryError::artifact_not_found(group_id, artifact_id))?;
        if let Some(version_record) = record.versions.get_mut(&version) {
            version_record.apply_editable(metadata);
        }
        record.modified_by = principal;
        record.modified_on = Utc::now();
        Ok(())
    }

    async fn update_artifact_state(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        state_value: ArtifactState,
    ) -> Result<()> {
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;

        // Artifact-level state change is sugar for changing the current
        // version's state.
        let version = record
            .current_version()
            .ok_or_else(|| RegistryError::artifact_not_found(group_id, artifact_id))?;
        if let Some(version_record) = record.versions.get_mut(&version) {
            version_record.state = state_value;
        }
        tracing::debug!(
            tenant = %ctx.tenant_id(),
            group = %group_id,
            artifact = %artifact_id,
            %version,
            state = %state_value,
            "artifact state updated"
        );
        Ok(())
    }

    async fn update_artifact_version_state(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
        state_value: ArtifactState,
    ) -> Result<()> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        let version_record =
            record
                .versions
                .get_mut(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    version,
                })?;
        version_record.state = state_value;
        Ok(())
    }

    async fn artifact_versions(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<BTreeSet<GlobalId>> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;
        Ok(record
            .versions
            .values()
            .map(|version| version.global_id)
            .collect())
    }

    async fn search_versions(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<VersionSearchResults> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;

        let count = record.versions.len();
        let versions = record
            .versions
            .iter()
            .skip(offset)
            .take(limit)
            .map(|(version, version_record)| {
                version_record.to_version_metadata(&key, record.artifact_type, *version)
            })
            .collect();
        Ok(VersionSearchResults { versions, count })
    }

    async fn get_artifact_version_by_global_id(
        &self,
        ctx: &TenantContext,
        global_id: GlobalId,
    ) -> Result<StoredArtifact> {
        let _ = ctx;
        let state = self.read_state()?;
        let (key, version) = state
            .global_index
            .get(&global_id)
            .ok_or(RegistryError::GlobalIdNotFound { global_id })?
            .clone();
        let record = state.artifact(&key)?;
        let version_record = record
            .versions
            .get(&version)
            .ok_or(RegistryError::GlobalIdNotFound { global_id })?;
        if !version_record.state.is_readable() {
            return Err(RegistryError::GlobalIdNotFound { global_id });
        }
        let entry = state
            .content
            .get(version_record.content_id)
            .ok_or_else(|| RegistryError::content_id_not_found(version_record.content_id))?;
        Ok(StoredArtifact {
            global_id,
            version,
            content_id: version_record.content_id,
            content: entry.content.clone(),
        })
    }

    async fn get_artifact_version(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<StoredArtifact> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;
        let version_record =
            record
                .versions
                .get(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    version,
                })?;
        if !version_record.state.is_readable() {
            return Err(RegistryError::VersionNotFound {
                group_id: group_id.to_string(),
                artifact_id: artifact_id.to_string(),
                version,
            });
        }
        let entry = state
            .content
            .get(version_record.content_id)
            .ok_or_else(|| RegistryError::content_id_not_found(version_record.content_id))?;
        Ok(StoredArtifact {
            global_id: version_record.global_id,
            version,
            content_id: version_record.content_id,
            content: entry.content.clone(),
        })
    }

    async fn delete_artifact_version(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<()> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;

        let record = state.artifact_mut(&key)?;
        let version_record =
            record
                .versions
                .remove(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    version,
                })?;
        state.global_index.remove(&version_record.global_id);
        state.content.release(version_record.content_id);
        Ok(())
    }

    async fn get_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<VersionMetadata> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;
        let version_record =
            record
                .versions
                .get(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    version,
                })?;
        // Metadata stays readable in every state, including DISABLED.
        Ok(version_record.to_version_metadata(&key, record.artifact_type, version))
    }

    async fn update_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
        metadata: &EditableArtifactMetadata,
    ) -> Result<()> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        let version_record =
            record
                .versions
                .get_mut(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    version,
                })?;
        version_record.apply_editable(metadata);
        Ok(())
    }

    async fn delete_artifact_version_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        version: Version,
    ) -> Result<()> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        let version_record =
            record
                .versions
                .get_mut(&version)
                .ok_or_else(|| RegistryError::VersionNotFound {
                    group_id: group_id.to_string(),
                    artifact_id: artifact_id.to_string(),
                    version,
                })?;
        version_record.clear_editable();
        Ok(())
    }

    async fn artifact_rules(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<Vec<RuleType>> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;
        let mut rules: Vec<RuleType> = record.rules.keys().copied().collect();
        rules.sort_by_key(|rule| rule.to_string());
        Ok(rules)
    }

    async fn create_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        let _ = ctx;
        config.validate_for(rule_type)?;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        if record.rules.contains_key(&rule_type) {
            return Err(RegistryError::RuleAlreadyExists { rule_type });
        }
        record.rules.insert(rule_type, config);
        Ok(())
    }

    async fn get_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
    ) -> Result<RuleConfiguration> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let state = self.read_state()?;
        let record = state.artifact(&key)?;
        record
            .rules
            .get(&rule_type)
            .cloned()
            .ok_or(RegistryError::RuleNotFound { rule_type })
    }

    async fn update_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        let _ = ctx;
        config.validate_for(rule_type)?;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        match record.rules.get_mut(&rule_type) {
            Some(existing) => {
                *existing = config;
                Ok(())
            }
            None => Err(RegistryError::RuleNotFound { rule_type }),
        }
    }

    async fn delete_artifact_rule(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
        rule_type: RuleType,
    ) -> Result<()> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        record
            .rules
            .remove(&rule_type)
            .map(|_| ())
            .ok_or(RegistryError::RuleNotFound { rule_type })
    }

    async fn delete_artifact_rules(
        &self,
        ctx: &TenantContext,
        group_id: &str,
        artifact_id: &str,
    ) -> Result<()> {
        let _ = ctx;
        let key = ArtifactKey::new(group_id, artifact_id);
        let mut state = self.write_state()?;
        let record = state.artifact_mut(&key)?;
        record.rules.clear();
        Ok(())
    }

    async fn global_rules(&self, ctx: &TenantContext) -> Result<Vec<RuleType>> {
        let _ = ctx;
        let state = self.read_state()?;
        let mut rules: Vec<RuleType> = state.global_rules.keys().copied().collect();
        rules.sort_by_key(|rule| rule.to_string());
        Ok(rules)
    }

    async fn create_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        let _ = ctx;
        config.validate_for(rule_type)?;
        let mut state = self.write_state()?;
        if state.global_rules.contains_key(&rule_type) {
            return Err(RegistryError::RuleAlreadyExists { rule_type });
        }
        state.global_rules.insert(rule_type, config);
        Ok(())
    }

    async fn get_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
    ) -> Result<RuleConfiguration> {
        let _ = ctx;
        let state = self.read_state()?;
        state
            .global_rules
            .get(&rule_type)
            .cloned()
            .ok_or(RegistryError::RuleNotFound { rule_type })
    }

    async fn update_global_rule(
        &self,
        ctx: &TenantContext,
        rule_type: RuleType,
        config: RuleConfiguration,
    ) -> Result<()> {
        let _ = ctx;
        config.validate_for(rule_type)?;
        let mut state = self.write_state()?;
        match state.global_rules.get_mut(&rule_type) {
            Some(existing) => {
                *existing = config;
                Ok(())
            }
            None => Err(RegistryError::RuleNotFound { rule_type }),
        }
    }

    async fn delete_global_rule(&self, ctx: &TenantContext, rule_type: RuleType) -> Result<()> {
        let _ = ctx;
        let mut state = self.write_state()?;
        state
            .global_rules
            .remove(&rule_type)
            .map(|_| ())
            .ok_or(RegistryError::RuleNotFound { rule_type })
    }

    async fn delete_global_rules(&self, ctx: &TenantContext) -> Result<()> {
        let _ = ctx;
        let mut state = self.write_state()?;
        state.global_rules.clear();
        Ok(())
    }

    async fn content_by_id(
        &self,
        ctx: &TenantContext,
        content_id: ContentId,
    ) -> Result<ContentHandle> {
        let _ = ctx;
        let state = self.read_state()?;
        state
            .content
            .get(content_id)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| RegistryError::content_id_not_found(content_id))
    }

    async fn content_by_hash(
        &self,
        ctx: &TenantContext,
        content_hash: &str,
    ) -> Result<ContentHandle> {
        let _ = ctx;
        let state = self.read_state()?;
        state
            .content
            .get_by_hash(content_hash)
            .map(|entry| entry.content.clone())
            .ok_or_else(|| RegistryError::ContentNotFound {
                detail: format!("content hash {content_hash}"),
            })
    }

    async fn versions_by_content_id(
        &self,
        ctx: &TenantContext,
        content_id: ContentId,
    ) -> Result<Vec<VersionMetadata>> {
        let _ = ctx;
        let state = self.read_state()?;
        let mut versions: Vec<VersionMetadata> = Vec::new();
        for (key, record) in &state.artifacts {
            for (version, version_record) in &record.versions {
                if version_record.content_id == content_id {
                    versions.push(version_record.to_version_metadata(
                        key,
                        record.artifact_type,
                        *version,
                    ));
                }
            }
        }
        versions.sort_by_key(|v| v.global_id);
        Ok(versions)
    }

    async fn create_group(&self, ctx: &TenantContext, group: GroupMetadata) -> Result<()> {
        let mut state = self.write_state()?;
        if state.groups.contains_key(&group.group_id) {
            return Err(RegistryError::GroupAlreadyExists {
                group_id: group.group_id,
            });
        }
        let now = Utc::now();
        let mut group = group;
        if group.created_by.is_none() {
            group.created_by = ctx.principal().map(str::to_string);
        }
        group.created_on.get_or_insert(now);
        group.modified_on.get_or_insert(now);
        state.groups.insert(group.group_id.clone(), group);
        Ok(())
    }

    async fn update_group_metadata(&self, ctx: &TenantContext, group: GroupMetadata) -> Result<()> {
        let mut state = self.write_state()?;
        let existing =
            state
                .groups
                .get_mut(&group.group_id)
                .ok_or_else(|| RegistryError::GroupNotFound {
                    group_id: group.group_id.clone(),
                })?;
        existing.description = group.description;
        existing.labels = group.labels;
        existing.modified_by = ctx.principal().map(str::to_string);
        existing.modified_on = Some(Utc::now());
        Ok(())
    }

    async fn delete_group(&self, ctx: &TenantContext, group_id: &str) -> Result<()> {
        let mut state = self.write_state()?;
        if state.groups.remove(group_id).is_none() {
            return Err(RegistryError::GroupNotFound {
                group_id: group_id.to_string(),
            });
        }
        // Cascade: a group takes its artifacts with it.
        let keys: Vec<ArtifactKey> = state
            .artifacts
            .keys()
            .filter(|key| key.group_id == group_id)
            .cloned()
            .collect();
        for key in &keys {
            state.remove_artifact(key);
        }
        tracing::debug!(
            tenant = %ctx.tenant_id(),
            group = %group_id,
            cascaded = keys.len(),
            "group deleted"
        );
        Ok(())
    }

    async fn group_ids(&self, ctx: &TenantContext, limit: Option<usize>) -> Result<Vec<String>> {
        let _ = ctx;
        let state = self.read_state()?;
        let mut ids: Vec<String> = state.groups.keys().cloned().collect();
        ids.sort();
        if let Some(limit) = limit {
            ids.truncate(limit);
        }
        Ok(ids)
    }

    async fn get_group_metadata(
        &self,
        ctx: &TenantContext,
        group_id: &str,
    ) -> Result<GroupMetadata> {
        let _ = ctx;
        let state = self.read_state()?;
        state
            .groups
            .get(group_id)
            .cloned()
            .ok_or_else(|| RegistryError::GroupNotFound {
                group_id: group_id.to_string(),
            })
    }

    async fn get_log_configuration(
        &self,
        ctx: &TenantContext,
        logger: &str,
    ) -> Result<LogConfiguration> {
        let _ = ctx;
        let state = self.read_state()?;
        state
            .log_configurations
            .get(logger)
            .cloned()
            .ok_or_else(|| RegistryError::LogConfigurationNotFound {
                logger: logger.to_string(),
            })
    }

    async fn set_log_configuration(
        &self,
        ctx: &TenantContext,
        config: LogConfiguration,
    ) -> Result<()> {
        let _ = ctx;
        let mut state = self.write_state()?;
        state
            .log_configurations
            .insert(config.logger.clone(), config);
        Ok(())
    }

    async fn remove_log_configuration(&self, ctx: &TenantContext, logger: &str) -> Result<()> {
        let _ = ctx;
        let mut state = self.write_state()?;
        state
            .log_configurations
            .remove(logger)
            .map(|_| ())
            .ok_or_else(|| RegistryError::LogConfigurationNotFound {
                logger: logger.to_string(),
            })
    }

    async fn list_log_configurations(&self, ctx: &TenantContext) -> Result<Vec<LogConfiguration>> {
        let _ = ctx;
        let state = self.read_state()?;
        let mut configs: Vec<LogConfiguration> =
            state.log_configurations.values().cloned().collect();
        configs.sort_by(|a, b| a.logger.cmp(&b.logger));
        Ok(configs)
    }

    async fn get_tenant_metadata(
        &self,
        ctx: &TenantContext,
        tenant_id: &TenantId,
    ) -> Result<TenantMetadata> {
        let _ = ctx;
        Ok(TenantMetadata {
            tenant_id: tenant_id.to_string(),
            ..TenantMetadata::default()
        })
    }
}
