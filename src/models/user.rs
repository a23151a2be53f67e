//! Login accounts and their roles.

use serde::{Deserialize, Serialize};

/// Role of a login account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// HR / back-office administrator.
    Admin,
    /// Regular employee self-service account.
    User,
}

/// A login account. Linked to an [`crate::models::Employee`] by e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: String,
    /// Login e-mail.
    pub email: String,
    /// Display name.
    pub full_name: String,
    /// Account role.
    pub role: UserRole,
    /// Department, used to route HR and IT notifications.
    #[serde(default)]
    pub department: Option<String>,
}

impl User {
    /// Returns true for administrator accounts.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Returns true if the account belongs to the named department.
    pub fn in_department(&self, department: &str) -> bool {
        self.department
            .as_deref()
            .is_some_and(|d| d.eq_ignore_ascii_case(department))
    }
}
