//! Bearer token verification.
//!
//! [`StaticTokenVerifier`] maps opaque bearer tokens to account identities.
//! It stands in for an external token service: tokens are registered out of
//! band (at bootstrap, or by tests) and looked up verbatim.

use std::collections::HashMap;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use medgate_authz::{AssertionVerifier, IdentityId};
use parking_lot::RwLock;

/// A registry of bearer tokens.
#[derive(Debug, Default)]
pub struct StaticTokenVerifier {
    tokens: RwLock<HashMap<String, IdentityId>>,
}

impl StaticTokenVerifier {
    /// Creates an empty registry. Every token fails verification until
    /// registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` as an assertion of `identity`, replacing any
    /// previous registration of the same token.
    pub fn register(&self, token: impl Into<String>, identity: impl Into<IdentityId>) {
        self.tokens.write().insert(token.into(), identity.into());
    }

    /// Revokes every token asserting `identity`. Returns how many were
    /// removed.
    pub fn revoke_identity(&self, identity: &IdentityId) -> usize {
        let mut tokens = self.tokens.write();
        let before = tokens.len();
        tokens.retain(|_, id| id != identity);
        before - tokens.len()
    }
}

impl AssertionVerifier for StaticTokenVerifier {
    fn verify(&self, assertion: &str) -> Option<IdentityId> {
        self.tokens.read().get(assertion).cloned()
    }
}

/// Extracts the bearer token from an `Authorization` header.
///
/// Returns `None` when the header is missing, not valid UTF-8, or uses a
/// scheme other than `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then_some(token.trim())
}
