//! # atrium-core
//!
//! Core abstractions for the Atrium schema registry.
//!
//! This crate provides the foundational types used across all Atrium components:
//!
//! - **Tenant Identity**: Multi-tenant isolation primitives and the explicit
//!   per-operation tenant context
//! - **Identifiers**: Strongly-typed, densely-allocated ids for versions and
//!   deduplicated content
//! - **Content Handles**: Raw schema bytes with content and canonical hashes
//! - **Registry Types**: Artifact formats, lifecycle states, rule kinds
//! - **Error Types**: Shared error definitions and result types
//!
//! ## Crate Boundary
//!
//! `atrium-core` is the only crate allowed to define shared primitives.
//! The rule engine and the storage engine both build on the types here.
//!
//! ## Example
//!
//! ```rust
//! use atrium_core::prelude::*;
//!
//! let tenant = TenantId::new("acme-corp").unwrap();
//! let ctx = TenantContext::new(tenant);
//! assert_eq!(ctx.tenant_id().as_str(), "acme-corp");
//!
//! let content = ContentHandle::from_static(b"{\"type\":\"string\"}");
//! assert_eq!(content.sha256_hex().len(), 64);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod canonical;
pub mod content;
pub mod error;
pub mod id;
pub mod observability;
pub mod tenant;
pub mod types;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use atrium_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::content::ContentHandle;
    pub use crate::error::{Error, Result};
    pub use crate::id::{ContentId, GlobalId, IdSequence, Version};
    pub use crate::tenant::{TenantContext, TenantId, TenantMetadata};
    pub use crate::types::{ArtifactState, ArtifactType, RuleType};
}

// Re-export key types at crate root for ergonomics
pub use content::ContentHandle;
pub use error::{Error, Result};
pub use id::{ContentId, GlobalId, IdSequence, Version};
pub use observability::{init_logging, registry_span, LogFormat};
pub use tenant::{TenantContext, TenantId, TenantMetadata};
pub use types::{ArtifactState, ArtifactType, RuleType};
