//! Tenant identifier type.
//!
//! This module defines the [`TenantId`] type, an opaque identifier for a
//! hospital tenant. Every clinical record is partitioned by one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque hospital tenant identifier.
///
/// Tenant ids are compared by exact string equality; there is no hierarchy
/// and no wildcard. Two tenants are the same tenant only if their ids match.
///
/// # Examples
///
/// ```
/// use medgate_authz::tenant::TenantId;
///
/// let tenant = TenantId::new("st-marys");
/// assert_eq!(tenant.as_str(), "st-marys");
/// assert_ne!(tenant, TenantId::new("st-judes"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new tenant ID from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the tenant ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the id is usable as a partition key.
    ///
    /// Ids must be non-empty, at most 64 characters, and consist of ASCII
    /// alphanumerics, hyphens and underscores.
    ///
    /// ```
    /// use medgate_authz::tenant::TenantId;
    ///
    /// assert!(TenantId::new("hospital_01").is_well_formed());
    /// assert!(!TenantId::new("").is_well_formed());
    /// assert!(!TenantId::new("a/b").is_well_formed());
    /// ```
    pub fn is_well_formed(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= 64
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TenantId({})", self.0)
    }
}

impl FromStr for TenantId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TenantId::new(s))
    }
}

impl From<&str> for TenantId {
    fn from(s: &str) -> Self {
        TenantId::new(s)
    }
}

impl From<String> for TenantId {
    fn from(s: String) -> Self {
        TenantId::new(s)
    }
}

impl AsRef<str> for TenantId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
