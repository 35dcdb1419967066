//! Access decision aggregation.
//!
//! [`decide`] combines the role policy and the tenant scope guard into one
//! [`Verdict`]. Evaluation order is fixed and short-circuits on the first
//! failure:
//!
//! 1. no principal: [`DenyReason::NotAuthenticated`]
//! 2. role policy: [`DenyReason::RoleNotPermitted`]
//! 3. tenant scope: [`DenyReason::CrossTenantDenied`]
//! 4. authorship, for owner-only rules: [`DenyReason::NotOwner`]
//! 5. deleting one's own account: [`DenyReason::SelfDeleteDenied`]
//!
//! A caller that fails an early step never learns the outcome of a later
//! one.

use std::fmt;

use thiserror::Error;

use crate::error::AuthError;
use crate::policy::{self, Action, ResourceKind, Rule};
use crate::principal::{IdentityId, Principal};
use crate::tenant::{TenantId, in_scope};

/// A reference to a stored record, as far as access control cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRef {
    /// The kind of record.
    pub kind: ResourceKind,
    /// The tenant the record belongs to.
    pub owning_tenant: TenantId,
    /// The identity that authored the record, if authorship is tracked.
    pub owner: Option<IdentityId>,
    /// The record's id.
    pub record_id: Option<String>,
}

impl ResourceRef {
    /// Creates a reference to a record of `kind` owned by `owning_tenant`.
    pub fn new(kind: ResourceKind, owning_tenant: impl Into<TenantId>) -> Self {
        Self {
            kind,
            owning_tenant: owning_tenant.into(),
            owner: None,
            record_id: None,
        }
    }

    /// Sets the authoring identity.
    pub fn with_owner(mut self, owner: impl Into<IdentityId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets the record id.
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }
}

/// A requested operation.
///
/// Built from the request: the action and resource kind from the route, the
/// target tenant(s) from whatever the caller supplied. A request may name a
/// tenant in more than one place (path, query, body, header); every such
/// claim must pass the scope guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    action: Action,
    kind: ResourceKind,
    tenant_claims: Vec<TenantId>,
    resource_owner: Option<IdentityId>,
    record_id: Option<String>,
}

impl Operation {
    /// Creates an operation naming no tenant, owner or record.
    pub fn new(action: Action, kind: ResourceKind) -> Self {
        Self {
            action,
            kind,
            tenant_claims: Vec::new(),
            resource_owner: None,
            record_id: None,
        }
    }

    /// Adds a target tenant claim. `None` is ignored; duplicates collapse.
    pub fn with_target_tenant(mut self, tenant: impl Into<Option<TenantId>>) -> Self {
        if let Some(tenant) = tenant.into() {
            if !self.tenant_claims.contains(&tenant) {
                self.tenant_claims.push(tenant);
            }
        }
        self
    }

    /// Sets the identity that authored the targeted record.
    pub fn with_resource_owner(mut self, owner: impl Into<IdentityId>) -> Self {
        self.resource_owner = Some(owner.into());
        self
    }

    /// Sets the id of the targeted record.
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Returns the same action applied to a concrete stored record.
    ///
    /// The record's owning tenant replaces the request's tenant claims, and
    /// its owner and id replace anything the request carried.
    pub fn bound_to(&self, record: &ResourceRef) -> Operation {
        Operation {
            action: self.action,
            kind: record.kind,
            tenant_claims: vec![record.owning_tenant.clone()],
            resource_owner: record.owner.clone(),
            record_id: record.record_id.clone(),
        }
    }

    /// Returns the requested action.
    pub fn action(&self) -> Action {
        self.action
    }

    /// Returns the targeted resource kind.
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Returns the first tenant the request named, if any.
    pub fn target_tenant(&self) -> Option<&TenantId> {
        self.tenant_claims.first()
    }

    /// Returns every tenant the request named.
    pub fn tenant_claims(&self) -> &[TenantId] {
        &self.tenant_claims
    }

    /// Returns the targeted record's author, if known.
    pub fn resource_owner(&self) -> Option<&IdentityId> {
        self.resource_owner.as_ref()
    }

    /// Returns the targeted record's id, if known.
    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.action, self.kind)?;
        if let Some(id) = &self.record_id {
            write!(f, "/{}", id)?;
        }
        Ok(())
    }
}

/// Why an operation was denied.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// No principal was established.
    #[error("authentication required")]
    NotAuthenticated,
    /// The principal's role may not perform this action on this kind.
    #[error("role not permitted")]
    RoleNotPermitted,
    /// The operation targets a tenant outside the principal's scope.
    #[error("access denied to this tenant")]
    CrossTenantDenied,
    /// The rule requires authorship and the principal is not the author.
    #[error("only the author may perform this action")]
    NotOwner,
    /// A principal may not delete its own account.
    #[error("cannot delete yourself")]
    SelfDeleteDenied,
    /// The targeted record does not exist.
    #[error("resource not found")]
    ResourceNotFound,
}

impl DenyReason {
    /// Returns the stable reason code.
    pub fn code(self) -> &'static str {
        match self {
            DenyReason::NotAuthenticated => "NotAuthenticated",
            DenyReason::RoleNotPermitted => "RoleNotPermitted",
            DenyReason::CrossTenantDenied => "CrossTenantDenied",
            DenyReason::NotOwner => "NotOwner",
            DenyReason::SelfDeleteDenied => "SelfDeleteDenied",
            DenyReason::ResourceNotFound => "ResourceNotFound",
        }
    }

    /// Returns the externally visible outcome class of this reason.
    pub fn outcome(self) -> Outcome {
        match self {
            DenyReason::NotAuthenticated => Outcome::Unauthenticated,
            DenyReason::ResourceNotFound => Outcome::NotFound,
            DenyReason::RoleNotPermitted
            | DenyReason::CrossTenantDenied
            | DenyReason::NotOwner
            | DenyReason::SelfDeleteDenied => Outcome::Forbidden,
        }
    }
}

/// The class of response a caller should give for a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The caller could not be identified.
    Unauthenticated,
    /// The caller was identified and refused.
    Forbidden,
    /// The targeted record does not exist.
    NotFound,
}

impl AuthError {
    /// Returns the externally visible outcome class. Always
    /// [`Outcome::Unauthenticated`].
    pub fn outcome(&self) -> Outcome {
        Outcome::Unauthenticated
    }
}

/// The result of an access decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The operation may proceed.
    Allow,
    /// The operation must be rejected.
    Deny(DenyReason),
}

impl Verdict {
    /// Returns `true` for [`Verdict::Allow`].
    pub fn is_allowed(self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// Converts the verdict into a `Result`, so a deny can be propagated
    /// with `?`.
    pub fn into_result(self) -> Result<(), DenyReason> {
        match self {
            Verdict::Allow => Ok(()),
            Verdict::Deny(reason) => Err(reason),
        }
    }
}

impl From<Result<(), DenyReason>> for Verdict {
    fn from(result: Result<(), DenyReason>) -> Self {
        match result {
            Ok(()) => Verdict::Allow,
            Err(reason) => Verdict::Deny(reason),
        }
    }
}

/// Decides whether `principal` may perform `operation`.
///
/// Pure: no I/O and no hidden state, so identical inputs always produce the
/// identical verdict.
///
/// # Examples
///
/// ```
/// use medgate_authz::decision::{DenyReason, Operation, Verdict, decide};
/// use medgate_authz::policy::{Action, ResourceKind};
/// use medgate_authz::principal::{Principal, Role};
/// use medgate_authz::tenant::TenantId;
///
/// let desk = Principal::new("r1", Role::Receptionist, "t1");
///
/// let own = Operation::new(Action::Create, ResourceKind::Patient)
///     .with_target_tenant(TenantId::new("t1"));
/// assert_eq!(decide(Some(&desk), &own), Verdict::Allow);
///
/// let other = Operation::new(Action::Create, ResourceKind::Patient)
///     .with_target_tenant(TenantId::new("t2"));
/// assert_eq!(decide(Some(&desk), &other), Verdict::Deny(DenyReason::CrossTenantDenied));
///
/// assert_eq!(decide(None, &own), Verdict::Deny(DenyReason::NotAuthenticated));
/// ```
pub fn decide(principal: Option<&Principal>, operation: &Operation) -> Verdict {
    evaluate(principal, operation).into()
}

/// Decides an operation against a record that had to be looked up first.
///
/// The request-level checks (authentication, role, the tenants the request
/// named) run before the record is consulted, so an unauthorized caller
/// cannot probe which records exist. A missing record then yields
/// [`DenyReason::ResourceNotFound`]. Finally the operation is re-decided
/// against the record's owning tenant and owner, so a record in another
/// tenant is reported as [`DenyReason::CrossTenantDenied`], never as not
/// found.
pub fn decide_for_record(
    principal: Option<&Principal>,
    request: &Operation,
    record: Option<&ResourceRef>,
) -> Verdict {
    let result = check_request(principal, request).and_then(|_| {
        let record = record.ok_or(DenyReason::ResourceNotFound)?;
        evaluate(principal, &request.bound_to(record))
    });
    result.into()
}

fn evaluate(principal: Option<&Principal>, operation: &Operation) -> Result<(), DenyReason> {
    let (principal, rule) = check_request(principal, operation)?;

    if rule.requires_ownership()
        && !operation
            .resource_owner()
            .is_some_and(|owner| principal.is(owner))
    {
        return Err(DenyReason::NotOwner);
    }

    if operation.kind() == ResourceKind::User
        && operation.action() == Action::Delete
        && operation.record_id() == Some(principal.identity().as_str())
    {
        return Err(DenyReason::SelfDeleteDenied);
    }

    Ok(())
}

/// Steps 1 to 3: everything decidable without the stored record.
fn check_request<'p>(
    principal: Option<&'p Principal>,
    operation: &Operation,
) -> Result<(&'p Principal, Rule), DenyReason> {
    let principal = principal.ok_or(DenyReason::NotAuthenticated)?;

    let rule = policy::rule(principal.role(), operation.kind(), operation.action());
    if !rule.is_permitted() {
        return Err(DenyReason::RoleNotPermitted);
    }

    if !operation
        .tenant_claims()
        .iter()
        .all(|tenant| in_scope(principal, Some(tenant)))
    {
        return Err(DenyReason::CrossTenantDenied);
    }

    Ok((principal, rule))
}
