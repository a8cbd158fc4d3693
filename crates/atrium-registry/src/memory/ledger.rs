//! Per-artifact version ledgers and directory records.

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};

use atrium_core::{ArtifactState, ArtifactType, ContentId, GlobalId, RuleType, Version};

use crate::meta::{ArtifactMetadata, EditableArtifactMetadata, VersionMetadata};
use crate::rules::RuleConfiguration;

/// Directory key of one artifact within a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ArtifactKey {
    pub(crate) group_id: String,
    pub(crate) artifact_id: String,
}

impl ArtifactKey {
    pub(crate) fn new(group_id: &str, artifact_id: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
        }
    }
}

/// One published version in an artifact's ledger.
#[derive(Debug, Clone)]
pub(crate) struct VersionRecord {
    pub(crate) global_id: GlobalId,
    pub(crate) content_id: ContentId,
    pub(crate) state: ArtifactState,
    pub(crate) name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) labels: BTreeMap<String, String>,
    pub(crate) created_by: Option<String>,
    pub(crate) created_on: DateTime<Utc>,
}

impl VersionRecord {
    /// Replaces the user-editable fields.
    pub(crate) fn apply_editable(&mut self, metadata: &EditableArtifactMetadata) {
        self.name.clone_from(&metadata.name);
        self.description.clone_from(&metadata.description);
        self.labels.clone_from(&metadata.labels);
    }

    /// Clears the user-editable fields, preserving generated ones.
    pub(crate) fn clear_editable(&mut self) {
        self.name = None;
        self.description = None;
        self.labels.clear();
    }

    pub(crate) fn to_version_metadata(
        &self,
        key: &ArtifactKey,
        artifact_type: ArtifactType,
        version: Version,
    ) -> VersionMetadata {
        VersionMetadata {
            group_id: key.group_id.clone(),
            artifact_id: key.artifact_id.clone(),
            artifact_type,
            state: self.state,
            version,
            global_id: self.global_id,
            content_id: self.content_id,
            name: self.name.clone(),
            description: self.description.clone(),
            labels: self.labels.clone(),
            created_by: self.created_by.clone(),
            created_on: self.created_on,
        }
    }
}

/// Directory entry of one artifact: its ledger, rules, and audit fields.
#[derive(Debug)]
pub(crate) struct ArtifactRecord {
    pub(crate) artifact_type: ArtifactType,
    pub(crate) created_by: Option<String>,
    pub(crate) created_on: DateTime<Utc>,
    pub(crate) modified_by: Option<String>,
    pub(crate) modified_on: DateTime<Utc>,
    /// The next version number to allocate. Only moves forward, so numbers
    /// are never reused even after deletions.
    pub(crate) next_version: Version,
    pub(crate) versions: BTreeMap<Version, VersionRecord>,
    pub(crate) rules: HashMap<RuleType, RuleConfiguration>,
}

impl ArtifactRecord {
    pub(crate) fn new(
        artifact_type: ArtifactType,
        created_by: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            artifact_type,
            created_by: created_by.clone(),
            created_on: now,
            modified_by: created_by,
            modified_on: now,
            next_version: Version::FIRST,
            versions: BTreeMap::new(),
            rules: HashMap::new(),
        }
    }

    /// Allocates the next version number.
    pub(crate) fn allocate_version(&mut self) -> Version {
        let version = self.next_version;
        self.next_version = version.next();
        version
    }

    /// The highest-numbered version whose state is not DISABLED: the
    /// artifact's externally visible "current" version.
    pub(crate) fn latest_visible(&self) -> Option<(Version, &VersionRecord)> {
        self.versions
            .iter()
            .rev()
            .find(|(_, record)| record.state.is_readable())
            .map(|(version, record)| (*version, record))
    }

    /// The highest-numbered version regardless of state.
    pub(crate) fn latest_any(&self) -> Option<(Version, &VersionRecord)> {
        self.versions
            .iter()
            .next_back()
            .map(|(version, record)| (*version, record))
    }

    /// The version targeted by artifact-level state and metadata operations:
    /// the current visible version, or, when every version is disabled,
    /// the highest-numbered one, so a fully disabled artifact can still be
    /// administered.
    pub(crate) fn current_version(&self) -> Option<Version> {
        self.latest_visible()
            .or_else(|| self.latest_any())
            .map(|(version, _)| version)
    }

    pub(crate) fn to_artifact_metadata(
        &self,
        key: &ArtifactKey,
        version: Version,
        record: &VersionRecord,
    ) -> ArtifactMetadata {
        ArtifactMetadata {
            group_id: key.group_id.clone(),
            artifact_id: key.artifact_id.clone(),
            artifact_type: self.artifact_type,
            state: record.state,
            name: record.name.clone(),
            description: record.description.clone(),
            labels: record.labels.clone(),
            created_by: self.created_by.clone(),
            created_on: self.created_on,
            modified_by: self.modified_by.clone(),
            modified_on: self.modified_on,
            version,
            global_id: record.global_id,
            content_id: record.content_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version_record(global_id: u64, state: ArtifactState) -> VersionRecord {
        VersionRecord {
            global_id: GlobalId::from_raw(global_id),
            content_id: ContentId::from_raw(1),
            state,
            name: None,
            description: None,
            labels: BTreeMap::new(),
            created_by: None,
            created_on: Utc::now(),
        }
    }

    #[test]
    fn version_numbers_are_never_reused() {
        let mut record = ArtifactRecord::new(ArtifactType::Json, None, Utc::now());
        let v1 = record.allocate_version();
        let v2 = record.allocate_version();
        assert_eq!(v1, Version::FIRST);
        assert_eq!(v2, Version::from_raw(2));

        // A deletion between allocations leaves the counter untouched.
        record.versions.remove(&v2);
        assert_eq!(record.allocate_version(), Version::from_raw(3));
    }

    #[test]
    fn latest_visible_skips_disabled() {
        let mut record = ArtifactRecord::new(ArtifactType::Json, None, Utc::now());
        let v1 = record.allocate_version();
        record
            .versions
            .insert(v1, version_record(10, ArtifactState::Enabled));
        let v2 = record.allocate_version();
        record
            .versions
            .insert(v2, version_record(11, ArtifactState::Disabled));

        let (visible, visible_record) = record.latest_visible().unwrap();
        assert_eq!(visible, v1);
        assert_eq!(visible_record.global_id, GlobalId::from_raw(10));

        let (latest, _) = record.latest_any().unwrap();
        assert_eq!(latest, v2);
    }

    #[test]
    fn current_version_falls_back_to_disabled_latest() {
        let mut record = ArtifactRecord::new(ArtifactType::Json, None, Utc::now());
        let v1 = record.allocate_version();
        record
            .versions
            .insert(v1, version_record(10, ArtifactState::Disabled));

        assert!(record.latest_visible().is_none());
        assert_eq!(record.current_version(), Some(v1));
    }

    #[test]
    fn clearing_editable_metadata_preserves_generated_fields() {
        let mut version = version_record(7, ArtifactState::Enabled);
        version.apply_editable(&EditableArtifactMetadata {
            name: Some("Name".into()),
            description: Some("Desc".into()),
            labels: [("k".to_string(), "v".to_string())].into(),
        });
        version.clear_editable();
        assert!(version.name.is_none());
        assert!(version.labels.is_empty());
        assert_eq!(version.global_id, GlobalId::from_raw(7));
    }
}
