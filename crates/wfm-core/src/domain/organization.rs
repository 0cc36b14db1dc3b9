//! Organization domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Organization {
    pub id: Uuid,
    pub tenant_id: Uuid,

    #[validate(length(min = 2, max = 200, message = "Organization name must be between 2 and 200 characters"))]
    pub name: String,

    #[validate(length(min = 3, max = 3, message = "Currency must be a 3-letter ISO code"))]
    pub currency: String,

    /// URL-safe slug, unique per tenant.
    #[validate(length(min = 1, max = 200, message = "Profile link too long"))]
    pub profile_link: String,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Organization {
    pub fn new(
        tenant_id: Uuid,
        name: String,
        currency: String,
        profile_link: String,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let organization = Self {
            id: Uuid::new_v4(),
            tenant_id,
            name: name.trim().to_string(),
            currency: currency.trim().to_uppercase(),
            profile_link,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        organization.validate()?;
        Ok(organization)
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
    fn test_create_organization() {
        let org = Organization::new(
            Uuid::new_v4(),
            "Ever Technologies".to_string(),
            "usd".to_string(),
            "ever-technologies".to_string(),
        )
        .unwrap();
        assert_eq!(org.currency, "USD");
        assert!(org.is_active);
    }

    #[test]
    fn test_create_organization_rejects_bad_currency() {
        let org = Organization::new(
            Uuid::new_v4(),
            "Ever".to_string(),
            "dollars".to_string(),
            "ever".to_string(),
        );
        assert!(org.is_err());
    }
}
