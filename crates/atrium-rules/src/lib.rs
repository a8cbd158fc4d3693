//! # atrium-rules
//!
//! Rule evaluation for the Atrium schema registry.
//!
//! Rules gate writes: before a new artifact version is accepted, the storage
//! engine resolves the effective rule configuration (artifact-scoped, falling
//! back to global) and evaluates it here:
//!
//! - **Validity** ([`validity`]): is the candidate document well-formed for
//!   its artifact type, at the configured strictness level?
//! - **Compatibility** ([`compat`]): may the candidate coexist with readers
//!   and writers of the prior versions, under the configured level? Decided
//!   by a recursive structural diff over the parsed schema documents
//!   ([`jsonschema`], [`avro`]).
//!
//! A failed rule surfaces as a typed [`RuleViolation`] carrying one finding
//! per problem; the caller rejects the write and never retries.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod avro;
pub mod compat;
pub mod jsonschema;
pub mod level;
pub mod validity;
pub mod violation;

pub use compat::check_compatibility;
pub use level::{CompatibilityLevel, ValidityLevel};
pub use validity::check_validity;
pub use violation::{Finding, RuleViolation};

/// The direction a schema change breaks, if any.
///
/// A change that makes the new schema accept *less* than the old one breaks
/// **backward** compatibility (data valid under the old schema may no longer
/// validate). A change that makes it accept *more* breaks **forward**
/// compatibility (data produced under the new schema may not validate for
/// readers still on the old one). Incomparable changes break both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakage {
    /// The new schema is more restrictive than the old one.
    Backward,
    /// The new schema is less restrictive than the old one.
    Forward,
    /// The schemas are incomparable.
    Both,
}

impl Breakage {
    /// Flips the direction; used when recursing under a `not` keyword,
    /// where tightening the inner schema loosens the outer one.
    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Backward => Self::Forward,
            Self::Forward => Self::Backward,
            Self::Both => Self::Both,
        }
    }

    /// Whether this breakage rejects under a backward-direction check.
    #[must_use]
    pub fn breaks_backward(self) -> bool {
        matches!(self, Self::Backward | Self::Both)
    }

    /// Whether this breakage rejects under a forward-direction check.
    #[must_use]
    pub fn breaks_forward(self) -> bool {
        matches!(self, Self::Forward | Self::Both)
    }
}

/// One structural difference between two schema documents.
///
/// Produced by the per-format diff walkers; the compatibility driver filters
/// these by direction according to the configured level.
#[derive(Debug, Clone)]
pub struct DiffIssue {
    /// JSON-pointer-like path of the changed construct.
    pub path: String,
    /// The direction this change breaks.
    pub breakage: Breakage,
    /// Human-readable description of the change.
    pub message: String,
}

impl DiffIssue {
    /// Creates a new issue.
    #[must_use]
    pub fn new(path: impl Into<String>, breakage: Breakage, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            breakage,
            message: message.into(),
        }
    }
}
