//! MedGate access control
//!
//! This crate decides whether an authenticated staff member may perform an
//! operation on a clinical record. It is storage- and transport-agnostic:
//! callers resolve a [`Principal`], describe the request as an
//! [`Operation`], and ask [`decide`] for a [`Verdict`].
//!
//! # Architecture
//!
//! - [`principal`] - roles, principals, and resolving an identity assertion
//!   into a principal
//! - [`policy`] - the static role policy table
//! - [`tenant`] - tenant identifiers and the tenant scope guard
//! - [`decision`] - the aggregator combining policy, scope and authorship
//! - [`error`] - authentication errors
//!
//! # Quick Start
//!
//! ```
//! use medgate_authz::{Action, DenyReason, Operation, Principal, ResourceKind, Role, Verdict, decide};
//! use medgate_authz::tenant::TenantId;
//!
//! let doctor = Principal::new("d1", Role::Doctor, "general-hospital");
//!
//! // Doctors read patients in their own hospital.
//! let read = Operation::new(Action::Read, ResourceKind::Patient)
//!     .with_target_tenant(TenantId::new("general-hospital"));
//! assert_eq!(decide(Some(&doctor), &read), Verdict::Allow);
//!
//! // But never register them.
//! let create = Operation::new(Action::Create, ResourceKind::Patient);
//! assert_eq!(decide(Some(&doctor), &create), Verdict::Deny(DenyReason::RoleNotPermitted));
//!
//! // And only change prescriptions they wrote.
//! let edit = Operation::new(Action::Update, ResourceKind::Prescription)
//!     .with_target_tenant(TenantId::new("general-hospital"))
//!     .with_resource_owner("d2");
//! assert_eq!(decide(Some(&doctor), &edit), Verdict::Deny(DenyReason::NotOwner));
//! ```
//!
//! # Multitenancy
//!
//! Every role except `SUPER_ADMIN` is confined to its home tenant. Naming a
//! foreign tenant anywhere in a request is denied outright; it is never
//! silently rewritten to the home tenant.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod decision;
pub mod error;
pub mod policy;
pub mod principal;
pub mod tenant;

// Re-export commonly used types at crate root
pub use decision::{DenyReason, Operation, Outcome, ResourceRef, Verdict, decide, decide_for_record};
pub use error::{AuthError, IdentityStoreError, UnknownRole};
pub use policy::{Action, ResourceKind, Rule};
pub use principal::{
    AssertionVerifier, IdentityId, IdentityRecord, IdentityStore, Principal, PrincipalResolver,
    Role,
};
pub use tenant::{ListScope, TenantId};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
