//! Authenticated principals.
//!
//! A [`Principal`] is the resolved answer to "who is asking" for exactly one
//! request. It is produced by [`PrincipalResolver`] from a verified identity
//! assertion and is the only input the decision engine trusts about the
//! caller.

mod resolver;
mod role;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tenant::TenantId;

pub use resolver::{AssertionVerifier, IdentityRecord, IdentityStore, PrincipalResolver};
pub use role::Role;

/// Opaque identity of a staff account.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityId(String);

impl IdentityId {
    /// Creates a new identity ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IdentityId({})", self.0)
    }
}

impl From<&str> for IdentityId {
    fn from(s: &str) -> Self {
        IdentityId::new(s)
    }
}

impl From<String> for IdentityId {
    fn from(s: String) -> Self {
        IdentityId::new(s)
    }
}

/// The authenticated caller of one request.
///
/// Fields are private and there are no setters: once resolved, a principal
/// cannot be altered by anything the request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    identity: IdentityId,
    role: Role,
    home_tenant: TenantId,
}

impl Principal {
    /// Creates a principal.
    ///
    /// Callers other than [`PrincipalResolver`] should only need this in
    /// tests.
    pub fn new(identity: impl Into<IdentityId>, role: Role, home_tenant: impl Into<TenantId>) -> Self {
        Self {
            identity: identity.into(),
            role,
            home_tenant: home_tenant.into(),
        }
    }

    /// Returns the caller's identity.
    pub fn identity(&self) -> &IdentityId {
        &self.identity
    }

    /// Returns the caller's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the tenant the caller belongs to.
    pub fn home_tenant(&self) -> &TenantId {
        &self.home_tenant
    }

    /// Returns `true` if `identity` is this principal.
    pub fn is(&self, identity: &IdentityId) -> bool {
        &self.identity == identity
    }
}

impl From<IdentityRecord> for Principal {
    fn from(record: IdentityRecord) -> Self {
        Self {
            identity: record.identity,
            role: record.role,
            home_tenant: record.home_tenant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_accessors() {
        let principal = Principal::new("u1", Role::Doctor, "t1");
        assert_eq!(principal.identity().as_str(), "u1");
        assert_eq!(principal.role(), Role::Doctor);
        assert_eq!(principal.home_tenant(), &TenantId::new("t1"));
        assert!(principal.is(&IdentityId::new("u1")));
        assert!(!principal.is(&IdentityId::new("u2")));
    }

    #[test]
    fn test_principal_from_record() {
        let record = IdentityRecord {
            identity: IdentityId::new("u9"),
            role: Role::Receptionist,
            home_tenant: TenantId::new("t3"),
        };
        let principal = Principal::from(record);
        assert_eq!(principal, Principal::new("u9", Role::Receptionist, "t3"));
    }
}
