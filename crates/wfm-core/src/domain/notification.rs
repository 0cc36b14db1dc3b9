// ============================================================================
// WFM Core - Employee Notification Entities
// File: crates/wfm-core/src/domain/notification.rs
// Description: In-app notifications and per-employee delivery settings
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Notification category. Each maps to one opt-out flag in the settings row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Payment,
    Assignment,
    Invitation,
    Mention,
    Comment,
    Message,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Payment => "payment",
            NotificationKind::Assignment => "assignment",
            NotificationKind::Invitation => "invitation",
            NotificationKind::Mention => "mention",
            NotificationKind::Comment => "comment",
            NotificationKind::Message => "message",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "payment" => Some(NotificationKind::Payment),
            "assignment" => Some(NotificationKind::Assignment),
            "invitation" => Some(NotificationKind::Invitation),
            "mention" => Some(NotificationKind::Mention),
            "comment" => Some(NotificationKind::Comment),
            "message" => Some(NotificationKind::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EmployeeNotification {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,

    /// Source entity kind and row, e.g. an invoice or a team.
    pub entity: String,
    pub entity_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Message too long"))]
    pub message: String,

    pub kind: NotificationKind,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub on_hold_until: Option<DateTime<Utc>>,

    pub sent_by_id: Option<Uuid>,
    pub receiver_id: Uuid,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl EmployeeNotification {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        entity: String,
        entity_id: Uuid,
        title: String,
        message: String,
        kind: NotificationKind,
        sent_by_id: Option<Uuid>,
        receiver_id: Uuid,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let notification = Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            entity,
            entity_id,
            title: title.trim().to_string(),
            message,
            kind,
            is_read: false,
            read_at: None,
            on_hold_until: None,
            sent_by_id,
            receiver_id,
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        notification.validate()?;
        Ok(notification)
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
        self.read_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    pub fn snooze(&mut self, until: DateTime<Utc>) {
        self.on_hold_until = Some(until);
        self.updated_at = Utc::now();
    }
}

/// Per-employee notification preferences. One row per employee; all flags
/// default to enabled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSetting {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub employee_id: Uuid,

    pub payment: bool,
    pub assignment: bool,
    pub invitation: bool,
    pub mention: bool,
    pub comment: bool,
    pub message: bool,

    /// Free-form preferences blob (e.g. mute windows), kept as JSON.
    pub preferences: serde_json::Value,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NotificationSetting {
    /// Default settings row: everything enabled.
    pub fn defaults(tenant_id: Uuid, organization_id: Uuid, employee_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            employee_id,
            payment: true,
            assignment: true,
            invitation: true,
            mention: true,
            comment: true,
            message: true,
            preferences: serde_json::Value::Object(Default::default()),
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Whether notifications of `kind` should be delivered to this employee.
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Payment => self.payment,
            NotificationKind::Assignment => self.assignment,
            NotificationKind::Invitation => self.invitation,
            NotificationKind::Mention => self.mention,
            NotificationKind::Comment => self.comment,
            NotificationKind::Message => self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_allow_every_kind() {
        let settings = NotificationSetting::defaults(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        for kind in [
            NotificationKind::Payment,
            NotificationKind::Assignment,
            NotificationKind::Invitation,
            NotificationKind::Mention,
            NotificationKind::Comment,
            NotificationKind::Message,
        ] {
            assert!(settings.allows(kind), "default should allow {:?}", kind);
        }
    }

    #[test]
    fn disabled_flag_blocks_matching_kind_only() {
        let mut settings = NotificationSetting::defaults(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        settings.assignment = false;
        assert!(!settings.allows(NotificationKind::Assignment));
        assert!(settings.allows(NotificationKind::Payment));
    }

    #[test]
    fn mark_read_stamps_read_at() {
        let mut n = EmployeeNotification::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "invoice".to_string(),
            Uuid::new_v4(),
            "Invoice paid".to_string(),
            "Invoice #42 was fully paid".to_string(),
            NotificationKind::Payment,
            None,
            Uuid::new_v4(),
        )
        .unwrap();
        assert!(!n.is_read);
        n.mark_read();
        assert!(n.is_read);
        assert!(n.read_at.is_some());
    }
}
