use serde::{Deserialize, Serialize};
use crate::access::Role;
use super::UserId;

/// A staff member who can sign in to the clinic system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Payload for creating a new staff user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Payload for updating an existing staff user.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
}

impl User {
    pub fn validate(&self) -> Result<(), String> {
        super::require_text("Name", &self.name, Some(255))?;
        super::require_text("Email", &self.email, Some(255))?;
        if !self.email.contains('@') {
            return Err("Email must be a valid email address.".to_string());
        }
        Ok(())
    }
}
