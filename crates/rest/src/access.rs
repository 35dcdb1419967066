//! Enforcement of access decisions.
//!
//! Handlers never inspect roles or tenants themselves. They describe the
//! request as an [`Operation`] and call [`authorize`] (no stored record
//! involved) or [`authorize_record`] (after looking the record up). A deny
//! is logged here and converted into a [`RestError`].

use medgate_authz::{
    DenyReason, Operation, Principal, ResourceRef, Verdict, decide, decide_for_record,
};
use tracing::{debug, warn};

use crate::error::{RestError, RestResult};

/// A stored record that access decisions can be made against.
pub trait Protected {
    /// Returns the record's owning tenant, owner and id.
    fn resource_ref(&self) -> ResourceRef;
}

/// Enforces an operation that does not target a stored record.
pub fn authorize(principal: &Principal, operation: &Operation) -> RestResult<()> {
    enforce(principal, operation, decide(Some(principal), operation))
}

/// Enforces an operation against a record that was looked up by id, and
/// hands the record back once allowed.
///
/// `record` is `None` when the lookup found nothing; that becomes a `404`
/// only if the request itself would have been allowed.
pub fn authorize_record<T: Protected>(
    principal: &Principal,
    request: &Operation,
    record: Option<T>,
) -> RestResult<T> {
    let reference = record.as_ref().map(Protected::resource_ref);
    let verdict = decide_for_record(Some(principal), request, reference.as_ref());
    enforce(principal, request, verdict)?;
    record.ok_or_else(|| not_found(request))
}

fn not_found(operation: &Operation) -> RestError {
    let resource = match operation.record_id() {
        Some(id) => format!("{}/{}", operation.kind(), id),
        None => operation.kind().to_string(),
    };
    RestError::NotFound { resource }
}

fn enforce(principal: &Principal, operation: &Operation, verdict: Verdict) -> RestResult<()> {
    match verdict {
        Verdict::Allow => Ok(()),
        Verdict::Deny(DenyReason::ResourceNotFound) => {
            debug!(operation = %operation, "Record not found");
            Err(not_found(operation))
        }
        Verdict::Deny(reason) => {
            warn!(
                identity = %principal.identity(),
                role = %principal.role(),
                tenant = %principal.home_tenant(),
                operation = %operation,
                reason = reason.code(),
                "Access denied"
            );
            Err(reason.into())
        }
    }
}
