//! # atrium-registry
//!
//! The storage and versioning engine of the Atrium schema registry.
//!
//! - [`storage::RegistryStorage`]: the facade contract every backend
//!   implements and every external consumer programs against
//! - [`memory::MemoryRegistry`]: the in-memory reference engine for one
//!   tenant: content-addressed deduplication, per-artifact version ledgers,
//!   lifecycle state, rule storage
//! - [`multitenant::MultitenantRegistry`]: the tenant router, lazily
//!   creating one isolated engine (with its own id counters) per tenant
//! - [`config`]: deployment configuration with fail-fast startup validation
//!
//! Writes are gated by the effective VALIDITY and COMPATIBILITY rules
//! (artifact-scoped, falling back to global), evaluated by `atrium-rules`
//! inside the same critical section as the append.
//!
//! ## Example
//!
//! ```rust
//! use atrium_core::{ArtifactType, ContentHandle, TenantContext};
//! use atrium_registry::memory::MemoryRegistry;
//! use atrium_registry::storage::RegistryStorage;
//!
//! # async fn demo() -> atrium_registry::error::Result<()> {
//! let registry = MemoryRegistry::new();
//! let ctx = TenantContext::default();
//!
//! let created = registry
//!     .create_artifact(
//!         &ctx,
//!         "default",
//!         "user-schema",
//!         ArtifactType::Json,
//!         ContentHandle::from_static(b"{\"type\":\"object\"}"),
//!         None,
//!     )
//!     .await?;
//! let stored = registry.get_artifact(&ctx, "default", "user-schema").await?;
//! assert_eq!(stored.global_id, created.global_id);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod memory;
pub mod meta;
pub mod multitenant;
pub mod rules;
pub mod search;
pub mod storage;

pub use config::{build_registry, ConfigError, RegistryConfig, StorageKind};
pub use error::{ErrorKind, RegistryError, Result};
pub use memory::MemoryRegistry;
pub use meta::{
    ArtifactMetadata, EditableArtifactMetadata, GroupMetadata, LogConfiguration, LogLevel,
    StoredArtifact, VersionMetadata,
};
pub use multitenant::MultitenantRegistry;
pub use rules::RuleConfiguration;
pub use search::{
    ArtifactSearchResults, OrderBy, OrderDirection, SearchFilter, SearchFilterKind,
    VersionSearchResults,
};
pub use storage::RegistryStorage;
