//! Staff roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownRole;

/// The closed set of staff roles.
///
/// Roles carry no implicit ordering. What each role may do is decided
/// entirely by [`policy::rule`](crate::policy::rule); the only property a
/// role carries on its own is whether it bypasses the tenant boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator. Bypasses the tenant boundary.
    SuperAdmin,
    /// Administrator of a single hospital.
    HospitalAdmin,
    /// Clinician; authors prescriptions.
    Doctor,
    /// Front-desk staff; manages patient records.
    Receptionist,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [
        Role::SuperAdmin,
        Role::HospitalAdmin,
        Role::Doctor,
        Role::Receptionist,
    ];

    /// Returns `true` if this role may act outside its home tenant.
    pub fn bypasses_tenant_scope(self) -> bool {
        matches!(self, Role::SuperAdmin)
    }

    /// Returns `true` if the role may be assigned to an account through the
    /// user-management API. `SUPER_ADMIN` is provisioned out of band only.
    pub fn is_assignable(self) -> bool {
        !matches!(self, Role::SuperAdmin)
    }

    /// Returns the wire name of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPER_ADMIN",
            Role::HospitalAdmin => "HOSPITAL_ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Receptionist => "RECEPTIONIST",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole {
                value: s.to_string(),
            })
    }
}
