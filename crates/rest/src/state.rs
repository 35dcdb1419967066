//! Application state for the MedGate REST API.
//!
//! This module defines the shared application state that is available to all
//! request handlers: the record store, the token verifier and the server
//! configuration.

use std::sync::Arc;

use medgate_authz::PrincipalResolver;

use crate::auth::StaticTokenVerifier;
use crate::config::ServerConfig;
use crate::store::ClinicalStore;

/// Shared application state for the REST API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`ClinicalStore`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use medgate_rest::{AppState, ServerConfig};
/// use medgate_rest::auth::StaticTokenVerifier;
/// use medgate_rest::store::MemoryStore;
///
/// let state = AppState::new(
///     Arc::new(MemoryStore::new()),
///     Arc::new(StaticTokenVerifier::new()),
///     ServerConfig::default(),
/// );
/// assert_eq!(state.config().port, 8080);
/// ```
pub struct AppState<S> {
    /// The record store.
    store: Arc<S>,

    /// Bearer token registry.
    verifier: Arc<StaticTokenVerifier>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: Arc::clone(&self.verifier),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: ClinicalStore> AppState<S> {
    /// Creates a new AppState.
    pub fn new(store: Arc<S>, verifier: Arc<StaticTokenVerifier>, config: ServerConfig) -> Self {
        Self {
            store,
            verifier,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the record store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the token registry.
    pub fn verifier(&self) -> &StaticTokenVerifier {
        &self.verifier
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns a resolver over this state's token registry and store.
    pub fn resolver(&self) -> PrincipalResolver<StaticTokenVerifier, S> {
        PrincipalResolver::new(Arc::clone(&self.verifier), Arc::clone(&self.store))
    }
}
