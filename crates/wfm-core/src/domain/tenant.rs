//! Tenant domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Top-level isolation boundary. Every other entity hangs off a tenant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tenant {
    pub id: Uuid,

    #[validate(length(min = 2, max = 100, message = "Tenant name must be between 2 and 100 characters"))]
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tenant {
    pub fn new(name: String) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let tenant = Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tenant.validate()?;
        Ok(tenant)
    }

    pub fn rename(&mut self, name: String) -> Result<(), validator::ValidationErrors> {
        self.name = name.trim().to_string();
        self.updated_at = Utc::now();
        self.validate()
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tenant() {
        let tenant = Tenant::new("Ever Technologies".to_string());
        assert!(tenant.is_ok());
    }

    #[test]
    fn test_create_tenant_rejects_short_name() {
        assert!(Tenant::new("x".to_string()).is_err());
    }
}
