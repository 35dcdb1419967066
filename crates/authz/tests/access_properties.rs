//! Property sweeps over the public decision API.
//!
//! These tests enumerate every role, resource kind and action and check the
//! guarantees that must hold across the whole table, plus the resolver's
//! failure ordering against in-memory collaborators.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use medgate_authz::tenant::TenantId;
use medgate_authz::{
    Action, AssertionVerifier, AuthError, DenyReason, IdentityId, IdentityRecord, IdentityStore,
    IdentityStoreError, Operation, Principal, PrincipalResolver, ResourceKind, ResourceRef, Role,
    Verdict, decide, decide_for_record,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn tenant(id: &str) -> TenantId {
    TenantId::new(id)
}

fn every_operation() -> impl Iterator<Item = (ResourceKind, Action)> {
    ResourceKind::ALL
        .into_iter()
        .flat_map(|kind| Action::ALL.into_iter().map(move |action| (kind, action)))
}

// ============================================================================
// Tenant Isolation
// ============================================================================

/// A confined role naming a foreign tenant is denied whenever the role could
/// otherwise perform the operation.
#[test]
fn test_confined_roles_never_cross_tenants() {
    for role in [Role::HospitalAdmin, Role::Doctor, Role::Receptionist] {
        let principal = Principal::new("u1", role, "home");
        for (kind, action) in every_operation() {
            let operation = Operation::new(action, kind)
                .with_target_tenant(tenant("elsewhere"))
                .with_resource_owner("u1");
            let verdict = decide(Some(&principal), &operation);

            let expected = if medgate_authz::policy::permits(role, kind, action) {
                DenyReason::CrossTenantDenied
            } else {
                DenyReason::RoleNotPermitted
            };
            assert_eq!(
                verdict,
                Verdict::Deny(expected),
                "{role} {action} {kind}"
            );
        }
    }
}

/// SUPER_ADMIN is never stopped at the tenant boundary.
#[test]
fn test_super_admin_passes_scope_for_every_target() {
    let root = Principal::new("root", Role::SuperAdmin, "home");
    for target in ["home", "t1", "t2", "other-hospital"] {
        for (kind, action) in every_operation() {
            let operation = Operation::new(action, kind)
                .with_target_tenant(tenant(target))
                .with_record_id("some-record");
            assert_eq!(
                decide(Some(&root), &operation),
                Verdict::Allow,
                "{action} {kind} in {target}"
            );
        }
    }
}

/// Conflicting tenant claims fail even when one of them is the home tenant.
#[test]
fn test_conflicting_claims_are_cross_tenant() {
    let desk = Principal::new("r1", Role::Receptionist, "t1");
    let operation = Operation::new(Action::List, ResourceKind::Patient)
        .with_target_tenant(tenant("t2"))
        .with_target_tenant(tenant("t1"));
    assert_eq!(
        decide(Some(&desk), &operation),
        Verdict::Deny(DenyReason::CrossTenantDenied)
    );
}

// ============================================================================
// Authentication and Ordering
// ============================================================================

#[test]
fn test_absent_principal_always_unauthenticated() {
    for (kind, action) in every_operation() {
        let operation = Operation::new(action, kind).with_target_tenant(tenant("t1"));
        assert_eq!(
            decide(None, &operation),
            Verdict::Deny(DenyReason::NotAuthenticated)
        );
        assert_eq!(
            decide_for_record(None, &operation, None),
            Verdict::Deny(DenyReason::NotAuthenticated)
        );
    }
}

#[test]
fn test_decide_is_idempotent() {
    for role in Role::ALL {
        let principal = Principal::new("u1", role, "t1");
        for (kind, action) in every_operation() {
            for target in ["t1", "t2"] {
                let operation = Operation::new(action, kind)
                    .with_target_tenant(tenant(target))
                    .with_resource_owner("u2")
                    .with_record_id("u1");
                let first = decide(Some(&principal), &operation);
                let second = decide(Some(&principal), &operation);
                assert_eq!(first, second);
            }
        }
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_receptionist_registers_patients_in_own_hospital_only() {
    let desk = Principal::new("r1", Role::Receptionist, "t1");

    let own = Operation::new(Action::Create, ResourceKind::Patient).with_target_tenant(tenant("t1"));
    assert_eq!(decide(Some(&desk), &own), Verdict::Allow);

    let other =
        Operation::new(Action::Create, ResourceKind::Patient).with_target_tenant(tenant("t2"));
    assert_eq!(
        decide(Some(&desk), &other),
        Verdict::Deny(DenyReason::CrossTenantDenied)
    );
}

#[test]
fn test_doctor_cannot_touch_colleagues_prescriptions() {
    let doctor = Principal::new("d1", Role::Doctor, "t1");
    let record = ResourceRef::new(ResourceKind::Prescription, "t1")
        .with_owner("d2")
        .with_record_id("rx-9");

    for action in [Action::Update, Action::Delete] {
        let request = Operation::new(action, ResourceKind::Prescription).with_record_id("rx-9");
        assert_eq!(
            decide_for_record(Some(&doctor), &request, Some(&record)),
            Verdict::Deny(DenyReason::NotOwner)
        );
    }

    let read = Operation::new(Action::Read, ResourceKind::Prescription).with_record_id("rx-9");
    assert_eq!(
        decide_for_record(Some(&doctor), &read, Some(&record)),
        Verdict::Allow
    );
}

#[test]
fn test_hospital_admin_cannot_delete_own_account() {
    let admin = Principal::new("a1", Role::HospitalAdmin, "t1");
    let request = Operation::new(Action::Delete, ResourceKind::User).with_record_id("a1");
    let record = ResourceRef::new(ResourceKind::User, "t1").with_record_id("a1");
    assert_eq!(
        decide_for_record(Some(&admin), &request, Some(&record)),
        Verdict::Deny(DenyReason::SelfDeleteDenied)
    );

    let colleague = ResourceRef::new(ResourceKind::User, "t1").with_record_id("d1");
    let request = Operation::new(Action::Delete, ResourceKind::User).with_record_id("d1");
    assert_eq!(
        decide_for_record(Some(&admin), &request, Some(&colleague)),
        Verdict::Allow
    );
}

#[test]
fn test_super_admin_reads_any_tenant() {
    let root = Principal::new("root", Role::SuperAdmin, "t1");
    let record = ResourceRef::new(ResourceKind::Tenant, "t7").with_record_id("t7");
    let request = Operation::new(Action::Read, ResourceKind::Tenant).with_record_id("t7");
    assert_eq!(
        decide_for_record(Some(&root), &request, Some(&record)),
        Verdict::Allow
    );
}

#[test]
fn test_foreign_record_reported_as_cross_tenant() {
    let doctor = Principal::new("d1", Role::Doctor, "t1");
    let record = ResourceRef::new(ResourceKind::Patient, "t2").with_record_id("p1");
    let request = Operation::new(Action::Read, ResourceKind::Patient).with_record_id("p1");
    assert_eq!(
        decide_for_record(Some(&doctor), &request, Some(&record)),
        Verdict::Deny(DenyReason::CrossTenantDenied)
    );
    assert_eq!(
        decide_for_record(Some(&doctor), &request, None),
        Verdict::Deny(DenyReason::ResourceNotFound)
    );
}

// ============================================================================
// Principal Resolution
// ============================================================================

struct TokenTable(HashMap<String, IdentityId>);

impl AssertionVerifier for TokenTable {
    fn verify(&self, assertion: &str) -> Option<IdentityId> {
        self.0.get(assertion).cloned()
    }
}

struct Accounts {
    records: Vec<IdentityRecord>,
    offline: bool,
}

#[async_trait]
impl IdentityStore for Accounts {
    async fn find_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Option<IdentityRecord>, IdentityStoreError> {
        if self.offline {
            return Err(IdentityStoreError::new("connection refused"));
        }
        Ok(self
            .records
            .iter()
            .find(|r| &r.identity == identity)
            .cloned())
    }
}

fn resolver(offline: bool) -> PrincipalResolver<TokenTable, Accounts> {
    let tokens = TokenTable(HashMap::from([
        ("tok-doctor".to_string(), IdentityId::new("d1")),
        ("tok-ghost".to_string(), IdentityId::new("gone")),
    ]));
    let accounts = Accounts {
        records: vec![IdentityRecord {
            identity: IdentityId::new("d1"),
            role: Role::Doctor,
            home_tenant: tenant("t1"),
        }],
        offline,
    };
    PrincipalResolver::new(Arc::new(tokens), Arc::new(accounts))
}

#[tokio::test]
async fn test_resolved_principal_drives_decision() {
    let principal = resolver(false)
        .resolve(Some("tok-doctor"))
        .await
        .expect("doctor resolves");

    assert_eq!(principal.role(), Role::Doctor);
    assert_eq!(principal.home_tenant(), &tenant("t1"));

    let write = Operation::new(Action::Create, ResourceKind::Prescription)
        .with_target_tenant(tenant("t1"));
    assert!(decide(Some(&principal), &write).is_allowed());
}

#[tokio::test]
async fn test_resolution_failures() {
    let r = resolver(false);

    assert!(matches!(r.resolve(None).await, Err(AuthError::Unauthenticated)));
    assert!(matches!(
        r.resolve(Some("forged")).await,
        Err(AuthError::InvalidAssertion)
    ));
    match r.resolve(Some("tok-ghost")).await {
        Err(AuthError::PrincipalNotFound { identity }) => assert_eq!(identity.as_str(), "gone"),
        other => panic!("expected PrincipalNotFound, got {:?}", other),
    }

    let offline = resolver(true);
    let err = offline.resolve(Some("tok-doctor")).await.unwrap_err();
    assert!(matches!(err, AuthError::IdentityLookup(_)));
}
