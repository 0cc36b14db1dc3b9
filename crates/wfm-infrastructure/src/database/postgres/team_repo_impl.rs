// ============================================================================
// WFM Infrastructure - PostgreSQL Team Repository
// File: crates/wfm-infrastructure/src/database/postgres/team_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use wfm_core::domain::{OrganizationTeam, TeamMember};
use wfm_core::error::DomainError;
use wfm_core::repositories::TeamRepository;
use wfm_shared::{Paginated, Pagination};

pub struct PgTeamRepository {
    pool: PgPool,
}

impl PgTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct TeamRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub logo: Option<String>,
    pub prefix: Option<String>,
    pub is_active: bool,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<TeamRow> for OrganizationTeam {
    fn from(row: TeamRow) -> Self {
        OrganizationTeam {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            name: row.name,
            color: row.color,
            emoji: row.emoji,
            logo: row.logo,
            prefix: row.prefix,
            is_active: row.is_active,
            is_archived: row.is_archived,
            archived_at: row.archived_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct TeamMemberRow {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub organization_id: Uuid,
    pub team_id: Uuid,
    pub employee_id: Uuid,
    pub is_manager: bool,
    pub assigned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TeamMemberRow> for TeamMember {
    fn from(row: TeamMemberRow) -> Self {
        TeamMember {
            id: row.id,
            tenant_id: row.tenant_id,
            organization_id: row.organization_id,
            team_id: row.team_id,
            employee_id: row.employee_id,
            is_manager: row.is_manager,
            assigned_at: row.assigned_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl TeamRepository for PgTeamRepository {
    async fn find_by_id(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
    ) -> Result<Option<OrganizationTeam>, DomainError> {
        let row: Option<TeamRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, name, color, emoji, logo, prefix,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM organization_teams
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error finding team by id: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(
        &self,
        team: &OrganizationTeam,
        members: &[TeamMember],
    ) -> Result<OrganizationTeam, DomainError> {
        info!("Creating team {} with {} members", team.name, members.len());

        let mut tx = self.pool.begin().await.map_err(|e| {
            error!("Database error opening transaction: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let row: TeamRow = sqlx::query_as(
            r#"
            INSERT INTO organization_teams (
                id, tenant_id, organization_id, name, color, emoji, logo, prefix,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING
                id, tenant_id, organization_id, name, color, emoji, logo, prefix,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(team.id)
        .bind(team.tenant_id)
        .bind(team.organization_id)
        .bind(&team.name)
        .bind(&team.color)
        .bind(&team.emoji)
        .bind(&team.logo)
        .bind(&team.prefix)
        .bind(team.is_active)
        .bind(team.is_archived)
        .bind(team.archived_at)
        .bind(team.created_at)
        .bind(team.updated_at)
        .bind(team.deleted_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating team: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        for member in members {
            sqlx::query(
                r#"
                INSERT INTO organization_team_members (
                    id, tenant_id, organization_id, team_id, employee_id,
                    is_manager, assigned_at, created_at, updated_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(member.id)
            .bind(member.tenant_id)
            .bind(member.organization_id)
            .bind(member.team_id)
            .bind(member.employee_id)
            .bind(member.is_manager)
            .bind(member.assigned_at)
            .bind(member.created_at)
            .bind(member.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error inserting team member: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;
        }

        tx.commit().await.map_err(|e| {
            error!("Database error committing team create: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update(&self, team: &OrganizationTeam) -> Result<OrganizationTeam, DomainError> {
        let row: TeamRow = sqlx::query_as(
            r#"
            UPDATE organization_teams
            SET
                name = $3,
                color = $4,
                emoji = $5,
                logo = $6,
                prefix = $7,
                is_active = $8,
                is_archived = $9,
                archived_at = $10,
                updated_at = $11
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            RETURNING
                id, tenant_id, organization_id, name, color, emoji, logo, prefix,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            "#,
        )
        .bind(team.id)
        .bind(team.tenant_id)
        .bind(&team.name)
        .bind(&team.color)
        .bind(&team.emoji)
        .bind(&team.logo)
        .bind(&team.prefix)
        .bind(team.is_active)
        .bind(team.is_archived)
        .bind(team.archived_at)
        .bind(team.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating team: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn soft_delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE organization_teams
            SET deleted_at = NOW(), is_active = false
            WHERE id = $1 AND tenant_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(tenant_id)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error deleting team: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn list(
        &self,
        tenant_id: &Uuid,
        organization_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<Paginated<OrganizationTeam>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM organization_teams
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
            "#,
        )
        .bind(tenant_id)
        .bind(organization_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error counting teams: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        let rows: Vec<TeamRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, name, color, emoji, logo, prefix,
                is_active, is_archived, archived_at, created_at, updated_at, deleted_at
            FROM organization_teams
            WHERE tenant_id = $1 AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR organization_id = $2)
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(tenant_id)
        .bind(organization_id)
        .bind(pagination.take())
        .bind(pagination.skip())
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing teams: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(Paginated::new(rows.into_iter().map(|r| r.into()).collect(), total))
    }

    async fn members_of(&self, team_id: &Uuid) -> Result<Vec<TeamMember>, DomainError> {
        let rows: Vec<TeamMemberRow> = sqlx::query_as(
            r#"
            SELECT
                id, tenant_id, organization_id, team_id, employee_id,
                is_manager, assigned_at, created_at, updated_at
            FROM organization_team_members
            WHERE team_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error listing team members: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn insert_member(&self, member: &TeamMember) -> Result<TeamMember, DomainError> {
        let row: TeamMemberRow = sqlx::query_as(
            r#"
            INSERT INTO organization_team_members (
                id, tenant_id, organization_id, team_id, employee_id,
                is_manager, assigned_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, tenant_id, organization_id, team_id, employee_id,
                is_manager, assigned_at, created_at, updated_at
            "#,
        )
        .bind(member.id)
        .bind(member.tenant_id)
        .bind(member.organization_id)
        .bind(member.team_id)
        .bind(member.employee_id)
        .bind(member.is_manager)
        .bind(member.assigned_at)
        .bind(member.created_at)
        .bind(member.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error inserting team member: {}", e);
            let msg = e.to_string();
            if msg.contains("unique") || msg.contains("duplicate") {
                DomainError::AlreadyExists("employee is already a team member".to_string())
            } else {
                DomainError::DatabaseError(msg)
            }
        })?;

        Ok(row.into())
    }

    async fn delete_member(&self, member_id: &Uuid) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM organization_team_members WHERE id = $1")
            .bind(member_id)
            .execute(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error removing team member: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }

    async fn set_member_manager(
        &self,
        member_id: &Uuid,
        is_manager: bool,
        assigned_at: Option<DateTime<Utc>>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE organization_team_members
            SET is_manager = $2, assigned_at = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(member_id)
        .bind(is_manager)
        .bind(assigned_at)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating member manager flag: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
