//! Staff roles and the permission table that gates every clinic operation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;
use crate::domain::{User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Receptionist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ManageProducts,
    ViewProducts,
    ManagePatients,
    RecordVisits,
    ManagePrescriptions,
    RecordSales,
    ViewSales,
    ManageSchedules,
    ViewSchedules,
    ManageUsers,
    ViewReports,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Doctor, Role::Receptionist];

    /// The permission table.
    pub const fn permissions(self) -> &'static [Permission] {
        use Permission::*;
        match self {
            Role::Admin => &[
                ManageProducts,
                ViewProducts,
                ManagePatients,
                RecordSales,
                ViewSales,
                ManageSchedules,
                ViewSchedules,
                ManageUsers,
                ViewReports,
            ],
            Role::Doctor => &[
                ViewProducts,
                ManagePatients,
                RecordVisits,
                ManagePrescriptions,
                ViewSchedules,
            ],
            Role::Receptionist => &[
                ViewProducts,
                ManagePatients,
                RecordSales,
                ViewSales,
                ViewSchedules,
            ],
        }
    }

    pub fn can(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Doctor => write!(f, "doctor"),
            Role::Receptionist => write!(f, "receptionist"),
        }
    }
}

impl FromStr for Role {
    type Err = AccessError;

    /// Accepts the canonical names and the legacy `dokter` / `resepsionis` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "doctor" | "dokter" => Ok(Role::Doctor),
            "receptionist" | "resepsionis" => Ok(Role::Receptionist),
            other => Err(AccessError::UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum AccessError {
    #[error("Role {role} is not allowed to {permission:?}")]
    Forbidden { role: Role, permission: Permission },
    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// An authenticated staff identity, supplied by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub role: Role,
}

impl Session {
    pub fn new(user_id: impl Into<UserId>, role: Role) -> Self {
        Self { user_id: user_id.into(), role }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.id.clone(), user.role)
    }
}

pub struct AccessPolicy;

impl AccessPolicy {
    pub fn authorize(session: &Session, permission: Permission) -> Result<(), AccessError> {
        if session.role.can(permission) {
            return Ok(());
        }
        warn!(user_id = %session.user_id, role = %session.role, ?permission, "Access denied");
        Err(AccessError::Forbidden { role: session.role, permission })
    }
}
