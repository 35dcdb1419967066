//! Role policy.
//!
//! The static table deciding which role may perform which action on which
//! kind of resource. The table is a single exhaustive `match`, so adding a
//! role, resource kind or action will not compile until every affected entry
//! has been written down.
//!
//! | role | patients | prescriptions | users | tenants |
//! |---|---|---|---|---|
//! | `SUPER_ADMIN` | all | all | all | all |
//! | `HOSPITAL_ADMIN` | all | delete | all | none |
//! | `DOCTOR` | read, list | create, read, list; update, delete own | none | none |
//! | `RECEPTIONIST` | all | none | none | none |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::principal::Role;

/// Actions that can be requested on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Create a new record.
    Create,
    /// Read a single record.
    Read,
    /// List records.
    List,
    /// Modify an existing record.
    Update,
    /// Remove a record.
    Delete,
}

impl Action {
    /// Every action, in declaration order.
    pub const ALL: [Action; 5] = [
        Action::Create,
        Action::Read,
        Action::List,
        Action::Update,
        Action::Delete,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Create => write!(f, "create"),
            Action::Read => write!(f, "read"),
            Action::List => write!(f, "list"),
            Action::Update => write!(f, "update"),
            Action::Delete => write!(f, "delete"),
        }
    }
}

/// Kinds of protected resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceKind {
    /// A patient record.
    Patient,
    /// A prescription authored by a doctor.
    Prescription,
    /// A staff account.
    User,
    /// A hospital tenant.
    Tenant,
}

impl ResourceKind {
    /// Every resource kind, in declaration order.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Patient,
        ResourceKind::Prescription,
        ResourceKind::User,
        ResourceKind::Tenant,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Patient => write!(f, "Patient"),
            ResourceKind::Prescription => write!(f, "Prescription"),
            ResourceKind::User => write!(f, "User"),
            ResourceKind::Tenant => write!(f, "Tenant"),
        }
    }
}

/// One entry of the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The role may not perform the action.
    Denied,
    /// The role may perform the action on any record in scope.
    Permitted,
    /// The role may perform the action only on records it authored.
    OwnerOnly,
}

impl Rule {
    /// Returns `true` unless the rule is [`Rule::Denied`].
    pub fn is_permitted(self) -> bool {
        !matches!(self, Rule::Denied)
    }

    /// Returns `true` if the rule additionally requires authorship.
    pub fn requires_ownership(self) -> bool {
        matches!(self, Rule::OwnerOnly)
    }
}

/// Looks up the policy entry for `(role, kind, action)`.
pub fn rule(role: Role, kind: ResourceKind, action: Action) -> Rule {
    use Action::*;
    use ResourceKind::*;

    match (role, kind) {
        (Role::SuperAdmin, Patient | Prescription | User | Tenant) => Rule::Permitted,

        (Role::HospitalAdmin, Patient) => Rule::Permitted,
        (Role::HospitalAdmin, Prescription) => match action {
            Delete => Rule::Permitted,
            Create | Read | List | Update => Rule::Denied,
        },
        (Role::HospitalAdmin, User) => Rule::Permitted,
        (Role::HospitalAdmin, Tenant) => Rule::Denied,

        (Role::Doctor, Patient) => match action {
            Read | List => Rule::Permitted,
            Create | Update | Delete => Rule::Denied,
        },
        (Role::Doctor, Prescription) => match action {
            Create | Read | List => Rule::Permitted,
            Update | Delete => Rule::OwnerOnly,
        },
        (Role::Doctor, User | Tenant) => Rule::Denied,

        (Role::Receptionist, Patient) => Rule::Permitted,
        (Role::Receptionist, Prescription | User | Tenant) => Rule::Denied,
    }
}

/// Returns `true` if the role policy permits `action` on `kind` for `role`.
///
/// Owner-only entries count as permitted here; authorship is checked later
/// by the decision aggregator.
pub fn permits(role: Role, kind: ResourceKind, action: Action) -> bool {
    rule(role, kind, action).is_permitted()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed(role: Role, kind: ResourceKind) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|a| permits(role, kind, *a))
            .collect()
    }

    #[test]
    fn test_super_admin_has_every_pair() {
        for kind in ResourceKind::ALL {
            for action in Action::ALL {
                assert_eq!(rule(Role::SuperAdmin, kind, action), Rule::Permitted);
            }
        }
    }

    #[test]
    fn test_hospital_admin_table() {
        assert_eq!(allowed(Role::HospitalAdmin, ResourceKind::Patient), Action::ALL);
        assert_eq!(
            allowed(Role::HospitalAdmin, ResourceKind::Prescription),
            vec![Action::Delete]
        );
        assert_eq!(allowed(Role::HospitalAdmin, ResourceKind::User), Action::ALL);
        assert!(allowed(Role::HospitalAdmin, ResourceKind::Tenant).is_empty());
    }

    #[test]
    fn test_doctor_table() {
        assert_eq!(
            allowed(Role::Doctor, ResourceKind::Patient),
            vec![Action::Read, Action::List]
        );
        assert_eq!(allowed(Role::Doctor, ResourceKind::Prescription), Action::ALL);
        assert!(allowed(Role::Doctor, ResourceKind::User).is_empty());
        assert!(allowed(Role::Doctor, ResourceKind::Tenant).is_empty());
    }

    #[test]
    fn test_receptionist_table() {
        assert_eq!(allowed(Role::Receptionist, ResourceKind::Patient), Action::ALL);
        assert!(allowed(Role::Receptionist, ResourceKind::Prescription).is_empty());
        assert!(allowed(Role::Receptionist, ResourceKind::User).is_empty());
        assert!(allowed(Role::Receptionist, ResourceKind::Tenant).is_empty());
    }

    #[test]
    fn test_ownership_is_flagged_only_for_doctor_prescription_writes() {
        for role in Role::ALL {
            for kind in ResourceKind::ALL {
                for action in Action::ALL {
                    let expected = role == Role::Doctor
                        && kind == ResourceKind::Prescription
                        && matches!(action, Action::Update | Action::Delete);
                    assert_eq!(
                        rule(role, kind, action).requires_ownership(),
                        expected,
                        "{role} {action} {kind}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::List.to_string(), "list");
        assert_eq!(ResourceKind::Prescription.to_string(), "Prescription");
    }
}
