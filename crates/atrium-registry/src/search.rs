//! Search and paging types for the facade's query operations.

use serde::{Deserialize, Serialize};

use crate::meta::{ArtifactMetadata, VersionMetadata};

/// Which artifact attribute a [`SearchFilter`] matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchFilterKind {
    /// Substring match on the display name (or the artifact id when no name
    /// is set).
    Name,
    /// Substring match on the description.
    Description,
    /// Match on a label, either `key` or `key:value`.
    Labels,
    /// Exact match on the group id.
    Group,
    /// Substring match on any of the above.
    Everything,
}

/// One search criterion; all filters of a query must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilter {
    /// The attribute to match against.
    pub kind: SearchFilterKind,
    /// The value to match.
    pub value: String,
}

impl SearchFilter {
    /// Creates a filter.
    #[must_use]
    pub fn new(kind: SearchFilterKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// The attribute search results are ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    /// Order by display name (falling back to the artifact id).
    #[default]
    Name,
    /// Order by creation time.
    CreatedOn,
}

/// Direction of the ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// One page of artifact search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSearchResults {
    /// The artifacts on this page.
    pub artifacts: Vec<ArtifactMetadata>,
    /// Total number of matches, ignoring paging.
    pub count: usize,
}

/// One page of version search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSearchResults {
    /// The versions on this page, ordered by version number.
    pub versions: Vec<VersionMetadata>,
    /// Total number of versions, ignoring paging.
    pub count: usize,
}
