//! Tag domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Label attachable to other entities. Unique by name within an organization.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Tag {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Tag name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 20, message = "Color too long"))]
    pub color: String,

    pub description: Option<String>,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        name: String,
        color: String,
        description: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let tag = Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            name: name.trim().to_string(),
            color,
            description,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        tag.validate()?;
        Ok(tag)
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}
