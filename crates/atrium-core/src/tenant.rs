//! Multi-tenant isolation primitives.
//!
//! Tenant isolation is enforced at two levels in Atrium:
//! - **Storage instances**: each tenant owns one isolated storage instance
//!   with its own id counters
//! - **Explicit context**: every facade operation takes a [`TenantContext`]
//!   parameter; there is no ambient "current tenant" state
//!
//! # Example
//!
//! ```rust
//! use atrium_core::tenant::{TenantContext, TenantId};
//!
//! let tenant = TenantId::new("acme-corp").unwrap();
//! let ctx = TenantContext::new(tenant);
//! assert_eq!(ctx.tenant_id().as_str(), "acme-corp");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A unique identifier for a tenant.
///
/// Tenant IDs must be:
/// - Non-empty
/// - Lowercase alphanumeric with hyphens
/// - Between 3 and 63 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// The tenant id used when multitenancy is disabled.
    pub const DEFAULT: &'static str = "default";

    /// Creates a new tenant ID after validating the format.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant ID is invalid.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Creates a tenant ID without validation.
    ///
    /// The caller must ensure the ID is valid. This is intended for ids that
    /// have already been validated (e.g., read back from storage).
    #[must_use]
    pub fn new_unchecked(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the tenant ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a tenant ID string.
    fn validate(id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(Error::InvalidId {
                message: "tenant ID cannot be empty".to_string(),
            });
        }

        if id.len() < 3 {
            return Err(Error::InvalidId {
                message: format!("tenant ID '{id}' is too short (minimum 3 characters)"),
            });
        }

        if id.len() > 63 {
            return Err(Error::InvalidId {
                message: format!("tenant ID '{id}' is too long (maximum 63 characters)"),
            });
        }

        if !id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(Error::InvalidId {
                message: format!(
                    "tenant ID '{id}' contains invalid characters (only lowercase letters, digits, and hyphens allowed)"
                ),
            });
        }

        if id.starts_with('-') || id.ends_with('-') {
            return Err(Error::InvalidId {
                message: format!("tenant ID '{id}' cannot start or end with a hyphen"),
            });
        }

        Ok(())
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The tenant scope of one registry operation.
///
/// Resolved by the caller (e.g., from a request path segment or an auth
/// token) before any facade call; the storage layer never computes it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantContext {
    tenant_id: TenantId,
    principal: Option<String>,
}

impl TenantContext {
    /// Creates a context scoped to the given tenant, with no principal.
    #[must_use]
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            principal: None,
        }
    }

    /// Attaches the authenticated principal name, recorded as the
    /// created-by/modified-by value on writes.
    #[must_use]
    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = Some(principal.into());
        self
    }

    /// Returns the tenant this operation is scoped to.
    #[must_use]
    pub fn tenant_id(&self) -> &TenantId {
        &self.tenant_id
    }

    /// Returns the authenticated principal, if any.
    #[must_use]
    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }
}

/// Lightweight descriptive state about a tenant.
///
/// Not part of the storage isolation unit itself; the multitenant router may
/// synthesize it without touching the tenant's storage instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantMetadata {
    /// The tenant this metadata describes.
    pub tenant_id: String,
    /// Base URL of the tenant's authentication server, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_server_url: Option<String>,
    /// OAuth client id used against the authentication server, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_client_id: Option<String>,
}
