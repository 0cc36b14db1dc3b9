//! Organization team repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{OrganizationTeam, TeamMember};
use crate::error::DomainError;
use wfm_shared::{Paginated, Pagination};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn find_by_id(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Option<OrganizationTeam>, DomainError>;

    /// Create the team together with its initial membership rows.
    async fn create(
        &self,
        team: &OrganizationTeam,
        members: &[TeamMember],
    ) -> Result<OrganizationTeam, DomainError>;

    async fn update(&self, team: &OrganizationTeam) -> Result<OrganizationTeam, DomainError>;
    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError>;

    async fn list(
        &self,
        tenant_id: &Uuid,
        organization_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<Paginated<OrganizationTeam>, DomainError>;

    async fn members_of(&self, team_id: &Uuid) -> Result<Vec<TeamMember>, DomainError>;
    async fn insert_member(&self, member: &TeamMember) -> Result<TeamMember, DomainError>;
    async fn delete_member(&self, member_id: &Uuid) -> Result<(), DomainError>;

    /// Flip the manager flag on an existing membership row.
    async fn set_member_manager(
        &self,
        member_id: &Uuid,
        is_manager: bool,
        assigned_at: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError>;
}
