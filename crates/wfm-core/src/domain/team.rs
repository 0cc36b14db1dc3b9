// ============================================================================
// WFM Core - Organization Team Entities
// File: crates/wfm-core/src/domain/team.rs
// Description: Teams and their membership rows (manager flag per member)
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrganizationTeam {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Team name must be between 1 and 200 characters"))]
    pub name: String,

    pub color: Option<String>,
    pub emoji: Option<String>,
    pub logo: Option<String>,

    /// Short code used as a task number prefix.
    #[validate(length(max = 20, message = "Prefix too long"))]
    pub prefix: Option<String>,

    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl OrganizationTeam {
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        name: String,
        color: Option<String>,
        emoji: Option<String>,
        prefix: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let now = Utc::now();
        let team = Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            name: name.trim().to_string(),
            color,
            emoji,
            logo: None,
            prefix: prefix.map(|p| p.trim().to_uppercase()),
            is_active: true,
            is_archived: false,
            archived_at: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        team.validate()?;
        Ok(team)
    }

    pub fn soft_delete(&mut self) {
        self.deleted_at = Some(Utc::now());
        self.is_active = false;
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Membership row linking an employee to a team. One row per employee per
/// team; managers are members with the flag set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub employee_id: Uuid,
    pub is_manager: bool,
    /// When the manager flag was last granted.
    pub assigned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(
        tenant_id: Uuid,
        organization_id: Uuid,
        team_id: Uuid,
        employee_id: Uuid,
        is_manager: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            organization_id,
            team_id,
            employee_id,
            is_manager,
            assigned_at: if is_manager { Some(now) } else { None },
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_team_uppercases_prefix() {
        let team = OrganizationTeam::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Platform".to_string(),
            Some("#6741d9".to_string()),
            None,
            Some("plt".to_string()),
        )
        .unwrap();
        assert_eq!(team.prefix.as_deref(), Some("PLT"));
    }

    #[test]
    fn test_manager_member_gets_assigned_at() {
        let member = TeamMember::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), true);
        assert!(member.assigned_at.is_some());

        let plain = TeamMember::new(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), false);
        assert!(plain.assigned_at.is_none());
    }
}
