//! User domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
    Viewer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::Viewer => "viewer",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "employee" => Some(Role::Employee),
            "viewer" => Some(Role::Viewer),
            _ => None,
        }
    }

    /// Admins and managers may edit any invoice in any status; everyone else
    /// is limited to their own drafts.
    pub fn can_manage_invoices(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Employee
    }
}

/// Login principal, scoped to a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Absent for invited users who have not completed onboarding.
    pub password_hash: Option<String>,

    #[validate(length(min = 1, max = 100, message = "First name must be between 1 and 100 characters"))]
    pub first_name: String,

    #[validate(length(max = 100, message = "Last name too long"))]
    pub last_name: String,

    pub role: Role,
    pub employee_id: Option<Uuid>,
    pub last_login_at: Option<DateTime<Utc>>,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        tenant_id: Uuid,
        email: String,
        password_hash: Option<String>,
        first_name: String,
        last_name: String,
        role: Role,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let user = Self {
            id: Uuid::new_v4(),
            tenant_id,
            email: email.trim().to_lowercase(),
            password_hash,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
            role,
            employee_id: None,
            last_login_at: None,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        user.validate()?;
        Ok(user)
    }

    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    pub fn can_login(&self) -> bool {
        self.is_active && !self.is_archived && self.deleted_at.is_none() && self.password_hash.is_some()
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_normalizes_email() {
        let user = User::new(
            Uuid::new_v4(),
            "  Admin@Example.COM ".to_string(),
            Some("hash".to_string()),
            "Admin".to_string(),
            "User".to_string(),
            Role::Admin,
        )
        .unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert!(user.can_login());
    }

    #[test]
    fn test_user_without_password_cannot_login() {
        let user = User::new(
            Uuid::new_v4(),
            "invited@example.com".to_string(),
            None,
            "Invited".to_string(),
            "".to_string(),
            Role::Employee,
        )
        .unwrap();
        assert!(!user.can_login());
        assert_eq!(user.full_name(), "Invited");
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from_str("manager"), Some(Role::Manager));
        assert_eq!(Role::from_str("nope"), None);
        assert!(Role::Manager.can_manage_invoices());
        assert!(!Role::Viewer.can_manage_invoices());
    }
}
