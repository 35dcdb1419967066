//! Startup provisioning of the platform operator.
//!
//! `SUPER_ADMIN` cannot be assigned through the user API, so the first one is
//! created here from [`ServerConfig`] before the server starts accepting
//! requests.

use chrono::Utc;
use medgate_authz::{IdentityId, Role, TenantId};
use tracing::info;

use crate::auth::StaticTokenVerifier;
use crate::config::ServerConfig;
use crate::models::{Tenant, UserAccount};
use crate::store::{ClinicalStore, StoreResult};

/// Identity of the bootstrap super admin.
pub const BOOTSTRAP_IDENTITY: &str = "bootstrap-admin";

/// Provisions the bootstrap tenant, super admin account and bearer token.
///
/// Does nothing and returns `None` when no bootstrap token is configured.
/// Existing tenant and account records are reused, so running it against a
/// store that was already bootstrapped only re-registers the token.
pub async fn bootstrap_super_admin<S>(
    store: &S,
    verifier: &StaticTokenVerifier,
    config: &ServerConfig,
) -> StoreResult<Option<UserAccount>>
where
    S: ClinicalStore + ?Sized,
{
    let Some(token) = config.bootstrap_token.as_deref() else {
        return Ok(None);
    };

    let tenant_id = TenantId::new(config.bootstrap_tenant.as_str());
    if store.get_tenant(&tenant_id).await?.is_none() {
        store
            .insert_tenant(Tenant {
                id: tenant_id.clone(),
                name: "Platform".to_string(),
                created_at: Utc::now(),
            })
            .await?;
        info!(tenant = %tenant_id, "Bootstrap tenant created");
    }

    let identity = IdentityId::new(BOOTSTRAP_IDENTITY);
    let account = match store.get_user(&identity).await? {
        Some(existing) => existing,
        None => {
            store
                .insert_user(UserAccount {
                    id: identity.clone(),
                    tenant_id,
                    email: config.bootstrap_email.clone(),
                    name: "Platform Administrator".to_string(),
                    role: Role::SuperAdmin,
                    created_at: Utc::now(),
                })
                .await?
        }
    };

    verifier.register(token, identity);
    info!(identity = %account.id, tenant = %account.tenant_id, "Bootstrap super admin ready");

    Ok(Some(account))
}
