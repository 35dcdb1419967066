//! In-memory store.

use async_trait::async_trait;
use medgate_authz::{
    IdentityId, IdentityRecord, IdentityStore, IdentityStoreError, ListScope, TenantId,
};
use parking_lot::RwLock;

use super::{ClinicalStore, StoreError, StoreResult};
use crate::models::{Patient, Prescription, PrescriptionFilter, Tenant, UserAccount};

#[derive(Debug, Default)]
struct Tables {
    tenants: Vec<Tenant>,
    patients: Vec<Patient>,
    prescriptions: Vec<Prescription>,
    users: Vec<UserAccount>,
}

/// A [`ClinicalStore`] held entirely in memory.
///
/// Tables are plain vectors in insertion order behind one
/// `parking_lot::RwLock`. The lock is never held across an `.await`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Returns clones of the matching rows, newest first. Rows created at the
/// same instant keep reverse insertion order.
fn newest_first<T, F>(rows: &[T], created_at: F, keep: impl Fn(&T) -> bool) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> chrono::DateTime<chrono::Utc>,
{
    let mut out: Vec<T> = rows.iter().rev().filter(|r| keep(r)).cloned().collect();
    out.sort_by_key(|r| std::cmp::Reverse(created_at(r)));
    out
}

fn replace<T>(
    rows: &mut [T],
    kind: &'static str,
    id: &str,
    is_row: impl Fn(&T) -> bool,
    row: T,
) -> StoreResult<()> {
    let slot = rows
        .iter_mut()
        .find(|r| is_row(r))
        .ok_or_else(|| StoreError::NotFound {
            kind,
            id: id.to_string(),
        })?;
    *slot = row;
    Ok(())
}

fn remove<T>(
    rows: &mut Vec<T>,
    kind: &'static str,
    id: &str,
    is_row: impl Fn(&T) -> bool,
) -> StoreResult<()> {
    let before = rows.len();
    rows.retain(|r| !is_row(r));
    if rows.len() == before {
        return Err(StoreError::NotFound {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

fn email_taken(users: &[UserAccount], email: &str, except: Option<&IdentityId>) -> bool {
    users
        .iter()
        .any(|u| u.email.eq_ignore_ascii_case(email) && Some(&u.id) != except)
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_identity(
        &self,
        identity: &IdentityId,
    ) -> Result<Option<IdentityRecord>, IdentityStoreError> {
        let tables = self.tables.read();
        Ok(tables
            .users
            .iter()
            .find(|u| &u.id == identity)
            .map(UserAccount::identity_record))
    }
}

#[async_trait]
impl ClinicalStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_tenants(&self) -> StoreResult<Vec<Tenant>> {
        let tables = self.tables.read();
        Ok(newest_first(&tables.tenants, |t| t.created_at, |_| true))
    }

    async fn get_tenant(&self, id: &TenantId) -> StoreResult<Option<Tenant>> {
        let tables = self.tables.read();
        Ok(tables.tenants.iter().find(|t| &t.id == id).cloned())
    }

    async fn insert_tenant(&self, tenant: Tenant) -> StoreResult<Tenant> {
        let mut tables = self.tables.write();
        if tables.tenants.iter().any(|t| t.id == tenant.id) {
            return Err(StoreError::Conflict {
                message: format!("Tenant {} already exists", tenant.id),
            });
        }
        tables.tenants.push(tenant.clone());
        Ok(tenant)
    }

    async fn list_patients(&self, scope: &ListScope) -> StoreResult<Vec<Patient>> {
        let tables = self.tables.read();
        Ok(newest_first(
            &tables.patients,
            |p| p.created_at,
            |p| scope.contains(&p.tenant_id),
        ))
    }

    async fn get_patient(&self, id: &str) -> StoreResult<Option<Patient>> {
        let tables = self.tables.read();
        Ok(tables.patients.iter().find(|p| p.id == id).cloned())
    }

    async fn insert_patient(&self, patient: Patient) -> StoreResult<Patient> {
        self.tables.write().patients.push(patient.clone());
        Ok(patient)
    }

    async fn update_patient(&self, patient: Patient) -> StoreResult<Patient> {
        let mut tables = self.tables.write();
        let id = patient.id.clone();
        replace(&mut tables.patients, "Patient", &id, |p| p.id == id, patient.clone())?;
        Ok(patient)
    }

    async fn delete_patient(&self, id: &str) -> StoreResult<()> {
        remove(&mut self.tables.write().patients, "Patient", id, |p| p.id == id)
    }

    async fn list_prescriptions(
        &self,
        scope: &ListScope,
        filter: &PrescriptionFilter,
    ) -> StoreResult<Vec<Prescription>> {
        let tables = self.tables.read();
        Ok(newest_first(
            &tables.prescriptions,
            |rx| rx.created_at,
            |rx| scope.contains(&rx.tenant_id) && filter.matches(rx),
        ))
    }

    async fn get_prescription(&self, id: &str) -> StoreResult<Option<Prescription>> {
        let tables = self.tables.read();
        Ok(tables.prescriptions.iter().find(|rx| rx.id == id).cloned())
    }

    async fn insert_prescription(&self, prescription: Prescription) -> StoreResult<Prescription> {
        self.tables.write().prescriptions.push(prescription.clone());
        Ok(prescription)
    }

    async fn update_prescription(&self, prescription: Prescription) -> StoreResult<Prescription> {
        let mut tables = self.tables.write();
        let id = prescription.id.clone();
        replace(
            &mut tables.prescriptions,
            "Prescription",
            &id,
            |rx| rx.id == id,
            prescription.clone(),
        )?;
        Ok(prescription)
    }

    async fn delete_prescription(&self, id: &str) -> StoreResult<()> {
        remove(
            &mut self.tables.write().prescriptions,
            "Prescription",
            id,
            |rx| rx.id == id,
        )
    }

    async fn list_users(&self, scope: &ListScope) -> StoreResult<Vec<UserAccount>> {
        let tables = self.tables.read();
        Ok(newest_first(
            &tables.users,
            |u| u.created_at,
            |u| scope.contains(&u.tenant_id),
        ))
    }

    async fn get_user(&self, id: &IdentityId) -> StoreResult<Option<UserAccount>> {
        let tables = self.tables.read();
        Ok(tables.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn insert_user(&self, user: UserAccount) -> StoreResult<UserAccount> {
        let mut tables = self.tables.write();
        if email_taken(&tables.users, &user.email, None) {
            return Err(StoreError::Conflict {
                message: "Email already registered".to_string(),
            });
        }
        if tables.users.iter().any(|u| u.id == user.id) {
            return Err(StoreError::Conflict {
                message: format!("User {} already exists", user.id),
            });
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, user: UserAccount) -> StoreResult<UserAccount> {
        let mut tables = self.tables.write();
        if email_taken(&tables.users, &user.email, Some(&user.id)) {
            return Err(StoreError::Conflict {
                message: "Email already registered".to_string(),
            });
        }
        let id = user.id.clone();
        replace(&mut tables.users, "User", id.as_str(), |u| u.id == id, user.clone())?;
        Ok(user)
    }

    async fn delete_user(&self, id: &IdentityId) -> StoreResult<()> {
        remove(&mut self.tables.write().users, "User", id.as_str(), |u| {
            &u.id == id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use medgate_authz::Role;

    fn user(id: &str, tenant: &str, email: &str) -> UserAccount {
        UserAccount {
            id: IdentityId::new(id),
            tenant_id: TenantId::new(tenant),
            email: email.to_string(),
            name: id.to_string(),
            role: Role::Doctor,
            created_at: Utc::now(),
        }
    }

    fn rx(id: &str, tenant: &str, doctor: &str, age_minutes: i64) -> Prescription {
        Prescription {
            id: id.to_string(),
            tenant_id: TenantId::new(tenant),
            patient_id: "p1".to_string(),
            doctor_id: IdentityId::new(doctor),
            medications: "m".to_string(),
            diagnosis: "d".to_string(),
            notes: String::new(),
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_across_tenants() {
        let store = MemoryStore::new();
        store.insert_user(user("u1", "t1", "dr@x.org")).await.unwrap();

        let err = store
            .insert_user(user("u2", "t2", "DR@x.org"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::Conflict {
                message: "Email already registered".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_update_user_keeps_own_email() {
        let store = MemoryStore::new();
        let mut u = store.insert_user(user("u1", "t1", "a@x.org")).await.unwrap();
        store.insert_user(user("u2", "t1", "b@x.org")).await.unwrap();

        u.name = "Renamed".to_string();
        assert!(store.update_user(u.clone()).await.is_ok());

        u.email = "b@x.org".to_string();
        assert!(matches!(
            store.update_user(u).await,
            Err(StoreError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_list_scoped_newest_first_and_filtered() {
        let store = MemoryStore::new();
        store.insert_prescription(rx("old", "t1", "d1", 30)).await.unwrap();
        store.insert_prescription(rx("new", "t1", "d2", 1)).await.unwrap();
        store.insert_prescription(rx("other", "t2", "d1", 5)).await.unwrap();

        let scope = ListScope::Tenant(TenantId::new("t1"));
        let all = store
            .list_prescriptions(&scope, &PrescriptionFilter::default())
            .await
            .unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);

        let by_d1 = PrescriptionFilter {
            doctor_id: Some(IdentityId::new("d1")),
            ..Default::default()
        };
        let everywhere = store.list_prescriptions(&ListScope::All, &by_d1).await.unwrap();
        let ids: Vec<_> = everywhere.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["other", "old"]);
    }

    #[tokio::test]
    async fn test_identity_lookup_reads_users() {
        let store = MemoryStore::new();
        store.insert_user(user("u1", "t1", "a@x.org")).await.unwrap();

        let record = store.find_identity(&IdentityId::new("u1")).await.unwrap();
        assert_eq!(record.map(|r| r.home_tenant), Some(TenantId::new("t1")));
        assert!(
            store
                .find_identity(&IdentityId::new("nobody"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.delete_patient("nope").await,
            Err(StoreError::NotFound { kind: "Patient", .. })
        ));
    }
}
