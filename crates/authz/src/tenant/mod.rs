//! Tenant identity and tenant scoping.
//!
//! All clinical data is partitioned by [`TenantId`]. The functions in this
//! module decide which partitions a principal may touch:
//!
//! - [`in_scope`] - may the principal act against a named tenant?
//! - [`acting_tenant`] - which tenant does a created record belong to?
//! - [`list_scope`] - which partition does a list read?
//!
//! # Examples
//!
//! ```
//! use medgate_authz::principal::{Principal, Role};
//! use medgate_authz::tenant::{ListScope, TenantId, acting_tenant, list_scope};
//!
//! let desk = Principal::new("r1", Role::Receptionist, "t1");
//!
//! // A receptionist cannot redirect a create into another hospital.
//! assert_eq!(acting_tenant(&desk, Some(&TenantId::new("t2"))), TenantId::new("t1"));
//!
//! // And lists only its own hospital.
//! assert_eq!(list_scope(&desk, None), ListScope::Tenant(TenantId::new("t1")));
//! ```

mod id;
mod scope;

pub use id::TenantId;
pub use scope::{ListScope, acting_tenant, authoring_identity, in_scope, list_scope};
