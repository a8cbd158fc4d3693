//! Registry deployment configuration.
//!
//! Configuration problems are fatal at process start, never at request time:
//! [`build_registry`] refuses to construct a deployment whose storage kind
//! cannot honor the requested tenancy mode.

use std::sync::Arc;

use crate::memory::MemoryRegistry;
use crate::multitenant::MultitenantRegistry;
use crate::storage::RegistryStorage;

/// Which storage backend to deploy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageKind {
    /// One in-memory storage instance, no tenant isolation.
    Memory,
    /// Tenant-routed in-memory storage.
    #[default]
    MultitenantMemory,
}

impl StorageKind {
    /// Whether this backend kind isolates tenants.
    #[must_use]
    pub fn supports_multitenancy(&self) -> bool {
        matches!(self, Self::MultitenantMemory)
    }
}

/// Deployment configuration of the registry core.
#[derive(Debug, Clone, Default)]
pub struct RegistryConfig {
    /// Whether multitenancy is enabled for this deployment.
    pub multitenancy_enabled: bool,
    /// The storage backend to construct.
    pub storage: StorageKind,
}

/// A configuration that cannot be deployed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Multitenancy was requested but the chosen backend has no isolation.
    #[error("multitenancy is enabled but storage kind {kind:?} does not support it")]
    MultitenancyNotSupported {
        /// The offending backend kind.
        kind: StorageKind,
    },
}

/// Builds the configured registry storage, validating the tenancy mode once
/// at startup.
///
/// # Errors
///
/// Returns [`ConfigError::MultitenancyNotSupported`] when multitenancy is
/// enabled against a backend that does not declare support. This error is
/// fatal; there is no request-time recovery.
pub fn build_registry(
    config: &RegistryConfig,
) -> Result<Arc<dyn RegistryStorage>, ConfigError> {
    if config.multitenancy_enabled && !config.storage.supports_multitenancy() {
        return Err(ConfigError::MultitenancyNotSupported {
            kind: config.storage,
        });
    }

    let storage: Arc<dyn RegistryStorage> = match config.storage {
        StorageKind::Memory => Arc::new(MemoryRegistry::new()),
        StorageKind::MultitenantMemory => Arc::new(MultitenantRegistry::new()),
    };
    debug_assert!(!config.multitenancy_enabled || storage.supports_multitenancy());
    Ok(storage)
}
