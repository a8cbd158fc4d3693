//! Metadata DTOs surfaced by the storage facade.
//!
//! Generated fields (ids, timestamps, state) come from the storage layer;
//! editable fields (name, description, labels) come from clients and can be
//! updated independently per version.

use atrium_core::{ArtifactState, ArtifactType, ContentHandle, ContentId, GlobalId, Version};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full metadata of an artifact, projected from its latest visible version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// The group containing the artifact.
    pub group_id: String,
    /// The artifact id, unique within the group.
    pub artifact_id: String,
    /// The schema format of the artifact.
    pub artifact_type: ArtifactType,
    /// Lifecycle state of the projected version.
    pub state: ArtifactState,
    /// Client-editable display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Client-editable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Client-editable labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Principal that created the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// When the artifact was created.
    pub created_on: DateTime<Utc>,
    /// Principal that last modified the artifact.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    /// When the artifact was last modified.
    pub modified_on: DateTime<Utc>,
    /// Version number of the projected version.
    pub version: Version,
    /// Global id of the projected version.
    pub global_id: GlobalId,
    /// Content id of the projected version.
    pub content_id: ContentId,
}

/// Full metadata of one artifact version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// The group containing the artifact.
    pub group_id: String,
    /// The artifact this version belongs to.
    pub artifact_id: String,
    /// The schema format of the artifact.
    pub artifact_type: ArtifactType,
    /// Lifecycle state of this version.
    pub state: ArtifactState,
    /// The per-artifact version number.
    pub version: Version,
    /// The tenant-wide global id of this version.
    pub global_id: GlobalId,
    /// The content entry this version references.
    pub content_id: ContentId,
    /// Client-editable display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Client-editable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Client-editable labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Principal that published this version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// When this version was published.
    pub created_on: DateTime<Utc>,
}

/// The client-editable subset of artifact/version metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditableArtifactMetadata {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl EditableArtifactMetadata {
    /// Metadata with only a name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Metadata of a group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupMetadata {
    /// The group id, unique within a tenant.
    pub group_id: String,
    /// Description of the group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group labels.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    /// Principal that created the group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// When the group was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<DateTime<Utc>>,
    /// Principal that last modified the group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<String>,
    /// When the group was last modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_on: Option<DateTime<Utc>>,
}

impl GroupMetadata {
    /// Metadata for a new group with only the id set.
    #[must_use]
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            ..Self::default()
        }
    }
}

/// One retrievable artifact version: its identifiers and content bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    /// Global id of the version.
    pub global_id: GlobalId,
    /// Per-artifact version number.
    pub version: Version,
    /// Content id of the referenced content entry.
    pub content_id: ContentId,
    /// The content itself.
    pub content: ContentHandle,
}

/// Severity threshold override for one logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Most verbose.
    Trace,
    /// Debug detail.
    Debug,
    /// Normal operation.
    Info,
    /// Something surprising.
    Warn,
    /// Operation failed.
    Error,
}

/// A per-logger dynamic level override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfiguration {
    /// The logger the override applies to.
    pub logger: String,
    /// The configured level.
    pub level: LogLevel,
}
