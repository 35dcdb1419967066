//! Requested tenant extractor.
//!
//! Collects every tenant the request names outside its body: the `tenantId`
//! query parameter and the `X-Tenant-ID` header. Body claims are added by
//! the handler once the payload is parsed. Nothing here decides whether the
//! caller may use those tenants; the claims are passed on to the decision
//! engine as they are.

use axum::{
    extract::{FromRequestParts, Query},
    http::{HeaderMap, header::HeaderName, request::Parts},
};
use medgate_authz::{Operation, TenantId};
use serde::Deserialize;

use crate::error::RestError;

/// Header name for tenant identification.
pub static X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");

#[derive(Debug, Default, Deserialize)]
struct TenantQuery {
    #[serde(rename = "tenantId")]
    tenant_id: Option<String>,
}

/// Axum extractor for the tenants a request names.
///
/// # Example
///
/// ```rust,ignore
/// use medgate_rest::extractors::RequestedTenant;
///
/// async fn handler(tenant: RequestedTenant) {
///     let op = tenant.apply(Operation::new(Action::List, ResourceKind::Patient));
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedTenant {
    claims: Vec<TenantId>,
}

impl RequestedTenant {
    /// Creates an extractor value from explicit claims.
    pub fn from_claims(claims: impl IntoIterator<Item = TenantId>) -> Self {
        Self {
            claims: claims.into_iter().collect(),
        }
    }

    /// Returns the claims in the order they were found (query, then header).
    pub fn claims(&self) -> &[TenantId] {
        &self.claims
    }

    /// Adds every claim to `operation` as a target tenant.
    pub fn apply(&self, operation: Operation) -> Operation {
        self.claims
            .iter()
            .cloned()
            .fold(operation, |op, tenant| op.with_target_tenant(tenant))
    }
}

fn parse_claim(raw: &str, source: &str) -> Result<Option<TenantId>, RestError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let tenant = TenantId::new(raw);
    if !tenant.is_well_formed() {
        return Err(RestError::bad_request(format!(
            "Invalid tenant ID in {}",
            source
        )));
    }
    Ok(Some(tenant))
}

/// Normalizes a `tenantId` field from a request body.
///
/// A blank value is treated as no claim at all, the same as an empty query
/// parameter. A malformed value is a `400`.
pub fn body_claim(tenant: Option<TenantId>) -> Result<Option<TenantId>, RestError> {
    match tenant {
        None => Ok(None),
        Some(tenant) => parse_claim(tenant.as_str(), "request body"),
    }
}

fn header_claim(headers: &HeaderMap) -> Result<Option<TenantId>, RestError> {
    match headers.get(&X_TENANT_ID) {
        None => Ok(None),
        Some(value) => {
            let raw = value
                .to_str()
                .map_err(|_| RestError::bad_request("Invalid tenant ID in X-Tenant-ID header"))?;
            parse_claim(raw, "X-Tenant-ID header")
        }
    }
}

impl<S> FromRequestParts<S> for RequestedTenant
where
    S: Send + Sync,
{
    type Rejection = RestError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<TenantQuery>::try_from_uri(&parts.uri)
            .map_err(|e| RestError::bad_request(e.body_text()))?;

        let mut claims = Vec::new();
        if let Some(raw) = query.tenant_id.as_deref() {
            claims.extend(parse_claim(raw, "tenantId query parameter")?);
        }
        claims.extend(header_claim(&parts.headers)?);

        Ok(RequestedTenant { claims })
    }
}
