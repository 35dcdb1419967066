//! Tenant scope guard.
//!
//! Decides whether a principal may act against a given tenant, independently
//! of what its role permits. `SUPER_ADMIN` bypasses the boundary entirely;
//! every other role is confined to its home tenant, and naming any other
//! tenant is a hard deny rather than a silent narrowing.

use super::id::TenantId;
use crate::principal::{IdentityId, Principal};

/// Returns `true` if `principal` may act against `target`.
///
/// An absent target means the request did not name a tenant; it defaults to
/// the principal's home tenant and is always in scope.
///
/// # Examples
///
/// ```
/// use medgate_authz::principal::{Principal, Role};
/// use medgate_authz::tenant::{TenantId, in_scope};
///
/// let doctor = Principal::new("d1", Role::Doctor, "t1");
/// assert!(in_scope(&doctor, None));
/// assert!(in_scope(&doctor, Some(&TenantId::new("t1"))));
/// assert!(!in_scope(&doctor, Some(&TenantId::new("t2"))));
///
/// let root = Principal::new("root", Role::SuperAdmin, "t1");
/// assert!(in_scope(&root, Some(&TenantId::new("t2"))));
/// ```
pub fn in_scope(principal: &Principal, target: Option<&TenantId>) -> bool {
    if principal.role().bypasses_tenant_scope() {
        return true;
    }

    match target {
        Some(tenant) => tenant == principal.home_tenant(),
        None => true,
    }
}

/// Returns the tenant a newly created record is stored under.
///
/// A `SUPER_ADMIN` may create records in any tenant; the supplied tenant is
/// honored as-is and the home tenant is used only when none is supplied.
/// For every other role the home tenant is forced, whatever was supplied.
pub fn acting_tenant(principal: &Principal, supplied: Option<&TenantId>) -> TenantId {
    match supplied {
        Some(tenant) if principal.role().bypasses_tenant_scope() => tenant.clone(),
        _ => principal.home_tenant().clone(),
    }
}

/// Returns the identity recorded as the author of a new record.
///
/// Mirrors [`acting_tenant`]: a `SUPER_ADMIN` may author on behalf of the
/// supplied identity, every other role always authors as itself.
pub fn authoring_identity(principal: &Principal, supplied: Option<&IdentityId>) -> IdentityId {
    match supplied {
        Some(identity) if principal.role().bypasses_tenant_scope() => identity.clone(),
        _ => principal.identity().clone(),
    }
}

/// The tenant partition a list operation reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// Every tenant.
    All,
    /// A single tenant.
    Tenant(TenantId),
}

impl ListScope {
    /// Returns `true` if a record owned by `tenant` falls within this scope.
    pub fn contains(&self, tenant: &TenantId) -> bool {
        match self {
            ListScope::All => true,
            ListScope::Tenant(scoped) => scoped == tenant,
        }
    }
}

/// Returns the partition a list operation by `principal` reads.
///
/// A `SUPER_ADMIN` lists across every tenant unless it supplies a tenant
/// filter. Every other role lists its home tenant only; a supplied tenant is
/// expected to have been rejected by [`in_scope`] already if it differs.
pub fn list_scope(principal: &Principal, supplied: Option<&TenantId>) -> ListScope {
    if principal.role().bypasses_tenant_scope() {
        return match supplied {
            Some(tenant) => ListScope::Tenant(tenant.clone()),
            None => ListScope::All,
        };
    }

    ListScope::Tenant(principal.home_tenant().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Role;

    fn t(id: &str) -> TenantId {
        TenantId::new(id)
    }

    #[test]
    fn test_non_super_admin_confined_to_home() {
        for role in [Role::HospitalAdmin, Role::Doctor, Role::Receptionist] {
            let p = Principal::new("u1", role, "t1");
            assert!(in_scope(&p, None));
            assert!(in_scope(&p, Some(&t("t1"))));
            assert!(!in_scope(&p, Some(&t("t2"))));
        }
    }

    #[test]
    fn test_super_admin_bypass() {
        let p = Principal::new("root", Role::SuperAdmin, "t1");
        for target in ["t1", "t2", "anything"] {
            assert!(in_scope(&p, Some(&t(target))));
        }
        assert!(in_scope(&p, None));
    }

    #[test]
    fn test_acting_tenant() {
        let root = Principal::new("root", Role::SuperAdmin, "t1");
        assert_eq!(acting_tenant(&root, Some(&t("t9"))), t("t9"));
        assert_eq!(acting_tenant(&root, None), t("t1"));

        let desk = Principal::new("r1", Role::Receptionist, "t1");
        assert_eq!(acting_tenant(&desk, Some(&t("t9"))), t("t1"));
        assert_eq!(acting_tenant(&desk, None), t("t1"));
    }

    #[test]
    fn test_authoring_identity() {
        let other = IdentityId::new("d2");

        let root = Principal::new("root", Role::SuperAdmin, "t1");
        assert_eq!(authoring_identity(&root, Some(&other)), other);
        assert_eq!(authoring_identity(&root, None).as_str(), "root");

        let doctor = Principal::new("d1", Role::Doctor, "t1");
        assert_eq!(authoring_identity(&doctor, Some(&other)).as_str(), "d1");
    }

    #[test]
    fn test_list_scope() {
        let root = Principal::new("root", Role::SuperAdmin, "t1");
        assert_eq!(list_scope(&root, None), ListScope::All);
        assert_eq!(list_scope(&root, Some(&t("t2"))), ListScope::Tenant(t("t2")));

        let admin = Principal::new("a1", Role::HospitalAdmin, "t1");
        assert_eq!(list_scope(&admin, None), ListScope::Tenant(t("t1")));
    }

    #[test]
    fn test_list_scope_contains() {
        assert!(ListScope::All.contains(&t("x")));
        assert!(ListScope::Tenant(t("t1")).contains(&t("t1")));
        assert!(!ListScope::Tenant(t("t1")).contains(&t("t2")));
    }
}
