//! Principal resolution.
//!
//! Turns an identity assertion (for example a bearer token) into a
//! [`Principal`] by verifying it and loading the referenced account from the
//! identity store. Both collaborators are external; this module only fixes
//! the order in which they are consulted and how their failures are
//! reported.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::{IdentityId, Principal, Role};
use crate::error::{AuthError, IdentityStoreError};
use crate::tenant::TenantId;

/// Verifies an identity assertion and yields the subject it names.
///
/// Token cryptography lives behind this trait. Implementations return
/// `None` for any assertion they cannot verify.
pub trait AssertionVerifier: Send + Sync {
    /// Verifies `assertion`, returning the asserted subject.
    fn verify(&self, assertion: &str) -> Option<IdentityId>;
}

/// An account as stored by the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityRecord {
    /// The account identity.
    pub identity: IdentityId,
    /// The account role.
    pub role: Role,
    /// The tenant the account belongs to.
    pub home_tenant: TenantId,
}

/// Looks up accounts by identity.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Returns the account for `identity`, or `None` if it no longer exists.
    async fn find_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Option<IdentityRecord>, IdentityStoreError>;
}

/// Resolves identity assertions into principals.
///
/// The resolver holds no per-request state and can be shared freely across
/// concurrent requests.
///
/// # Example
///
/// ```rust,ignore
/// let resolver = PrincipalResolver::new(verifier, store);
/// let principal = resolver.resolve(Some("token-abc")).await?;
/// ```
pub struct PrincipalResolver<V: ?Sized, S: ?Sized> {
    verifier: Arc<V>,
    store: Arc<S>,
}

impl<V: ?Sized, S: ?Sized> Clone for PrincipalResolver<V, S> {
    fn clone(&self) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
            store: Arc::clone(&self.store),
        }
    }
}

impl<V, S> PrincipalResolver<V, S>
where
    V: AssertionVerifier + ?Sized,
    S: IdentityStore + ?Sized,
{
    /// Creates a resolver over the given verifier and identity store.
    pub fn new(verifier: Arc<V>, store: Arc<S>) -> Self {
        Self { verifier, store }
    }

    /// Resolves an assertion into a principal.
    ///
    /// A missing or blank assertion is [`AuthError::Unauthenticated`]; an
    /// assertion the verifier rejects is [`AuthError::InvalidAssertion`]; a
    /// verified subject with no account is [`AuthError::PrincipalNotFound`].
    pub async fn resolve(&self, assertion: Option<&str>) -> Result<Principal, AuthError> {
        let assertion = assertion
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or(AuthError::Unauthenticated)?;

        let identity = self
            .verifier
            .verify(assertion)
            .ok_or(AuthError::InvalidAssertion)?;

        let record = self
            .store
            .find_identity(&identity)
            .await?
            .ok_or_else(|| AuthError::PrincipalNotFound {
                identity: identity.clone(),
            })?;

        debug!(
            identity = %record.identity,
            role = %record.role,
            tenant = %record.home_tenant,
            "Resolved principal"
        );

        Ok(Principal::from(record))
    }
}
