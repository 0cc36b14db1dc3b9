//! Activity log entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Created,
    Updated,
    Deleted,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Created => "created",
            ActivityAction::Updated => "updated",
            ActivityAction::Deleted => "deleted",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(ActivityAction::Created),
            "updated" => Some(ActivityAction::Updated),
            "deleted" => Some(ActivityAction::Deleted),
            _ => None,
        }
    }
}

/// Audit trail row. Written asynchronously by the activity logger; never
/// updated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityLog {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Option<Uuid>,
    pub entity: String,
    pub entity_id: Uuid,
    pub action: ActivityAction,
    pub actor_id: Option<Uuid>,
    pub description: Option<String>,
    pub data: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl ActivityLog {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        organization_id: Option<Uuid>,
        entity: impl Into<String>,
        entity_id: Uuid,
        action: ActivityAction,
        actor_id: Option<Uuid>,
        description: Option<String>,
        data: serde_json::Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            entity: entity.into(),
            entity_id,
            action,
            actor_id,
            description,
            data,
            created_at: Utc::now(),
        }
    }
}
