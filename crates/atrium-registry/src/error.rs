//! Typed errors for registry storage operations.
//!
//! Every failure mode is a distinct variant; a not-found is never generic.
//! The external layer maps variants to status codes through [`ErrorKind`];
//! only [`RegistryError::Storage`] is possibly transient and worth a
//! caller-side retry.

use atrium_core::{ContentId, GlobalId, RuleType, Version};
use atrium_rules::RuleViolation;

/// Result type alias for registry storage operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur during registry storage operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No artifact exists under the given group and id.
    #[error("artifact not found: {group_id}/{artifact_id}")]
    ArtifactNotFound {
        /// The group that was searched.
        group_id: String,
        /// The artifact id that was looked up.
        artifact_id: String,
    },

    /// The artifact exists but every version of it is disabled.
    ///
    /// Surfaced to callers as a not-found, kept distinct for diagnostics.
    #[error("artifact not found: {group_id}/{artifact_id} (latest version is disabled)")]
    ArtifactDisabled {
        /// The group that was searched.
        group_id: String,
        /// The artifact whose versions are all disabled.
        artifact_id: String,
    },

    /// The artifact exists but has no version with the given number.
    #[error("version {version} of artifact {group_id}/{artifact_id} not found")]
    VersionNotFound {
        /// The group that was searched.
        group_id: String,
        /// The artifact that was searched.
        artifact_id: String,
        /// The version number that was looked up.
        version: Version,
    },

    /// No version carries the given global id.
    #[error("no artifact version with global id {global_id}")]
    GlobalIdNotFound {
        /// The global id that was looked up.
        global_id: GlobalId,
    },

    /// No group exists under the given id.
    #[error("group not found: {group_id}")]
    GroupNotFound {
        /// The group id that was looked up.
        group_id: String,
    },

    /// No rule of the given type is configured in the addressed scope.
    #[error("rule not found: {rule_type}")]
    RuleNotFound {
        /// The rule type that was looked up.
        rule_type: RuleType,
    },

    /// No content entry matches the given id or hash.
    #[error("content not found: {detail}")]
    ContentNotFound {
        /// What was looked up (id, hash, or matching-content description).
        detail: String,
    },

    /// No log configuration exists for the given logger.
    #[error("log configuration not found: {logger}")]
    LogConfigurationNotFound {
        /// The logger name that was looked up.
        logger: String,
    },

    /// An artifact already exists under the given group and id.
    #[error("artifact already exists: {group_id}/{artifact_id}")]
    ArtifactAlreadyExists {
        /// The group of the conflicting artifact.
        group_id: String,
        /// The id of the conflicting artifact.
        artifact_id: String,
    },

    /// A group already exists under the given id.
    #[error("group already exists: {group_id}")]
    GroupAlreadyExists {
        /// The id of the conflicting group.
        group_id: String,
    },

    /// A rule of the given type is already configured in the addressed scope.
    #[error("rule already exists: {rule_type}")]
    RuleAlreadyExists {
        /// The type of the conflicting rule.
        rule_type: RuleType,
    },

    /// A configured rule rejected the write.
    #[error(transparent)]
    RuleViolation(#[from] RuleViolation),

    /// A rule configuration string is not valid for its rule type.
    #[error("invalid {rule_type} rule configuration: {message}")]
    InvalidRuleConfiguration {
        /// The rule the configuration was meant for.
        rule_type: RuleType,
        /// Why the configuration was rejected.
        message: String,
    },

    /// A backend-level failure; the only kind worth a caller-side retry.
    #[error("storage failure: {message}")]
    Storage {
        /// Description of the failure.
        message: String,
    },
}

/// Coarse classification of a [`RegistryError`], used by external layers to
/// map errors onto their own status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The addressed entity does not exist (404).
    NotFound,
    /// The entity to create already exists (409).
    AlreadyExists,
    /// A configured rule rejected the write (409/422).
    RuleViolation,
    /// The request itself was invalid.
    InvalidInput,
    /// Backend failure (500); possibly transient.
    Storage,
}

impl RegistryError {
    /// Returns the coarse kind of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArtifactNotFound { .. }
            | Self::ArtifactDisabled { .. }
            | Self::VersionNotFound { .. }
            | Self::GlobalIdNotFound { .. }
            | Self::GroupNotFound { .. }
            | Self::RuleNotFound { .. }
            | Self::ContentNotFound { .. }
            | Self::LogConfigurationNotFound { .. } => ErrorKind::NotFound,
            Self::ArtifactAlreadyExists { .. }
            | Self::GroupAlreadyExists { .. }
            | Self::RuleAlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::RuleViolation(_) => ErrorKind::RuleViolation,
            Self::InvalidRuleConfiguration { .. } => ErrorKind::InvalidInput,
            Self::Storage { .. } => ErrorKind::Storage,
        }
    }

    /// Creates an artifact-not-found error.
    #[must_use]
    pub fn artifact_not_found(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self::ArtifactNotFound {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
        }
    }

    /// Creates a content-not-found error for a content id lookup.
    #[must_use]
    pub fn content_id_not_found(content_id: ContentId) -> Self {
        Self::ContentNotFound {
            detail: format!("content id {content_id}"),
        }
    }

    /// Creates a storage failure.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }
}

impl From<atrium_core::Error> for RegistryError {
    fn from(e: atrium_core::Error) -> Self {
        Self::Storage {
            message: e.to_string(),
        }
    }
}
