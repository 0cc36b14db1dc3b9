// ============================================================================
// WFM Core - Organization Team Service
// File: crates/wfm-core/src/services/team_service.rs
// Description: Team CRUD plus membership reconciliation (members + managers)
// ============================================================================

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::info;
use uuid::Uuid;

use crate::domain::{OrganizationTeam, TeamMember};
use crate::error::DomainError;
use crate::repositories::{EmployeeRepository, TeamRepository};
use wfm_shared::{Paginated, Pagination};

/// Difference between a team's current membership rows and the desired
/// member/manager id sets. Computed up front so the writes can be issued as
/// independent per-row statements.
#[derive(Debug, Clone, Default)]
pub struct MembershipPlan {
    /// Rows whose employee is in neither desired set.
    pub remove: Vec<TeamMember>,
    /// Kept rows that must gain the manager flag.
    pub grant_manager: Vec<TeamMember>,
    /// Kept rows that must lose the manager flag.
    pub revoke_manager: Vec<TeamMember>,
    /// Employees with no current row: (employee_id, is_manager).
    pub add: Vec<(Uuid, bool)>,
}

/// Reconcile current membership rows against the desired sets. Employees in
/// `manager_ids` count as members as well; kept rows are only touched when
/// their manager flag actually changes.
pub fn plan_members(
    current: &[TeamMember],
    member_ids: &[Uuid],
    manager_ids: &[Uuid],
) -> MembershipPlan {
    let manager_set: HashSet<Uuid> = manager_ids.iter().copied().collect();
    let mut desired: Vec<Uuid> = Vec::new();
    let mut desired_set: HashSet<Uuid> = HashSet::new();
    for id in member_ids.iter().chain(manager_ids.iter()) {
        if desired_set.insert(*id) {
            desired.push(*id);
        }
    }

    let current_ids: HashSet<Uuid> = current.iter().map(|m| m.employee_id).collect();

    let mut plan = MembershipPlan::default();

    for row in current {
        if !desired_set.contains(&row.employee_id) {
            plan.remove.push(row.clone());
            continue;
        }
        let should_manage = manager_set.contains(&row.employee_id);
        if should_manage && !row.is_manager {
            plan.grant_manager.push(row.clone());
        } else if !should_manage && row.is_manager {
            plan.revoke_manager.push(row.clone());
        }
    }

    for id in desired {
        if !current_ids.contains(&id) {
            plan.add.push((id, manager_set.contains(&id)));
        }
    }

    plan
}

pub struct TeamService<T, E>
where
    T: TeamRepository,
    E: EmployeeRepository,
{
    team_repo: Arc<T>,
    employee_repo: Arc<E>,
}

/// Partial team update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub emoji: Option<String>,
    pub prefix: Option<String>,
}

impl<T, E> TeamService<T, E>
where
    T: TeamRepository,
    E: EmployeeRepository,
{
    pub fn new(team_repo: Arc<T>, employee_repo: Arc<E>) -> Self {
        Self { team_repo, employee_repo }
    }

    /// Create a team with its initial members. Candidate employee ids are
    /// resolved against the organization; unknown ids are dropped.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_team(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        name: String,
        color: Option<String>,
        emoji: Option<String>,
        prefix: Option<String>,
        member_ids: &[Uuid],
        manager_ids: &[Uuid],
    ) -> Result<(OrganizationTeam, Vec<TeamMember>), DomainError> {
        let team = OrganizationTeam::new(*tenant_id, *organization_id, name, color, emoji, prefix)
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        // An empty team is valid; plan_members against no current rows gives
        // exactly the insert set.
        let (valid_members, valid_managers) = self
            .resolve_employees(tenant_id, organization_id, member_ids, manager_ids)
            .await?;
        let plan = plan_members(&[], &valid_members, &valid_managers);

        let members: Vec<TeamMember> = plan
            .add
            .iter()
            .map(|(employee_id, is_manager)| {
                TeamMember::new(*tenant_id, *organization_id, team.id, *employee_id, *is_manager)
            })
            .collect();

        let team = self.team_repo.create(&team, &members).await?;
        info!("Created team {} with {} members", team.id, members.len());
        Ok((team, members))
    }

    pub async fn get_team(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
    ) -> Result<(OrganizationTeam, Vec<TeamMember>), DomainError> {
        let team = self
            .team_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::TeamNotFound)?;
        let members = self.team_repo.members_of(&team.id).await?;
        Ok((team, members))
    }

    pub async fn update_team(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
        input: UpdateTeamInput,
    ) -> Result<OrganizationTeam, DomainError> {
        let mut team = self
            .team_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::TeamNotFound)?;

        if let Some(name) = input.name {
            team.name = name.trim().to_string();
        }
        if let Some(color) = input.color {
            team.color = Some(color);
        }
        if let Some(emoji) = input.emoji {
            team.emoji = Some(emoji);
        }
        if let Some(prefix) = input.prefix {
            team.prefix = Some(prefix.trim().to_uppercase());
        }
        team.updated_at = Utc::now();

        self.team_repo.update(&team).await
    }

    /// Reconcile team membership against the desired member/manager sets.
    ///
    /// Candidate ids are validated against the team's organization first, so
    /// ids from other organizations or tenants silently drop out. The
    /// resulting per-row writes are independent and issued concurrently.
    pub async fn update_members(
        &self,
        tenant_id: &Uuid,
        team_id: &Uuid,
        member_ids: &[Uuid],
        manager_ids: &[Uuid],
    ) -> Result<Vec<TeamMember>, DomainError> {
        // 1. The team must exist in this tenant
        let team = self
            .team_repo
            .find_by_id(tenant_id, team_id)
            .await?
            .ok_or(DomainError::TeamNotFound)?;

        // 2. Resolve candidates within the team's organization
        let (valid_members, valid_managers) = self
            .resolve_employees(tenant_id, &team.organization_id, member_ids, manager_ids)
            .await?;

        // 3. Diff against current rows
        let current = self.team_repo.members_of(&team.id).await?;
        let plan = plan_members(&current, &valid_members, &valid_managers);

        info!(
            "Team {} membership: {} removed, {} promoted, {} demoted, {} added",
            team.id,
            plan.remove.len(),
            plan.grant_manager.len(),
            plan.revoke_manager.len(),
            plan.add.len()
        );

        // 4. Apply each group as unordered per-row writes
        try_join_all(
            plan.remove
                .iter()
                .map(|row| self.team_repo.delete_member(&row.id)),
        )
        .await?;

        let now = Utc::now();
        try_join_all(
            plan.grant_manager
                .iter()
                .map(|row| self.team_repo.set_member_manager(&row.id, true, Some(now))),
        )
        .await?;
        try_join_all(
            plan.revoke_manager
                .iter()
                .map(|row| self.team_repo.set_member_manager(&row.id, false, None)),
        )
        .await?;

        let new_rows: Vec<TeamMember> = plan
            .add
            .iter()
            .map(|(employee_id, is_manager)| {
                TeamMember::new(*tenant_id, team.organization_id, team.id, *employee_id, *is_manager)
            })
            .collect();
        try_join_all(new_rows.iter().map(|row| self.team_repo.insert_member(row))).await?;

        // 5. Return the reconciled membership
        self.team_repo.members_of(&team.id).await
    }

    pub async fn delete_team(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        self.team_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::TeamNotFound)?;
        self.team_repo.soft_delete(tenant_id, id).await
    }

    pub async fn list_teams(
        &self,
        tenant_id: &Uuid,
        organization_id: Option<Uuid>,
        pagination: Pagination,
    ) -> Result<Paginated<OrganizationTeam>, DomainError> {
        self.team_repo.list(tenant_id, organization_id, pagination).await
    }

    /// Filter both candidate lists down to employees that exist in the
    /// organization.
    async fn resolve_employees(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        member_ids: &[Uuid],
        manager_ids: &[Uuid],
    ) -> Result<(Vec<Uuid>, Vec<Uuid>), DomainError> {
        let mut union: Vec<Uuid> = Vec::new();
        let mut seen: HashSet<Uuid> = HashSet::new();
        for id in member_ids.iter().chain(manager_ids.iter()) {
            if seen.insert(*id) {
                union.push(*id);
            }
        }
        if union.is_empty() {
            return Ok((Vec::new(), Vec::new()));
        }

        let employees = self
            .employee_repo
            .find_by_ids(tenant_id, organization_id, &union)
            .await?;
        let valid: HashSet<Uuid> = employees.iter().map(|e| e.id).collect();

        let members = member_ids.iter().filter(|id| valid.contains(id)).copied().collect();
        let managers = manager_ids.iter().filter(|id| valid.contains(id)).copied().collect();
        Ok((members, managers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Employee;
    use crate::repositories::employee_repository::MockEmployeeRepository;
    use crate::repositories::team_repository::MockTeamRepository;
    use std::collections::HashSet;

    fn member(team_id: Uuid, employee_id: Uuid, is_manager: bool) -> TeamMember {
        TeamMember::new(Uuid::new_v4(), Uuid::new_v4(), team_id, employee_id, is_manager)
    }

    fn employee(tenant_id: Uuid, organization_id: Uuid, id: Uuid) -> Employee {
        let mut e = Employee::new(
            tenant_id,
            organization_id,
            None,
            "Member".to_string(),
            "X".to_string(),
            format!("{}@example.com", id.simple()),
            None,
            0.0,
            "USD".to_string(),
        )
        .unwrap();
        e.id = id;
        e
    }

    #[test]
    fn plan_removes_members_absent_from_both_sets() {
        let team_id = Uuid::new_v4();
        let keep = Uuid::new_v4();
        let drop = Uuid::new_v4();
        let current = vec![member(team_id, keep, false), member(team_id, drop, false)];

        let plan = plan_members(&current, &[keep], &[]);

        assert_eq!(plan.remove.len(), 1);
        assert_eq!(plan.remove[0].employee_id, drop);
        assert!(plan.add.is_empty());
        assert!(plan.grant_manager.is_empty());
        assert!(plan.revoke_manager.is_empty());
    }

    #[test]
    fn plan_grants_and_revokes_manager_flag() {
        let team_id = Uuid::new_v4();
        let promoted = Uuid::new_v4();
        let demoted = Uuid::new_v4();
        let current = vec![member(team_id, promoted, false), member(team_id, demoted, true)];

        let plan = plan_members(&current, &[demoted], &[promoted]);

        assert_eq!(plan.grant_manager.len(), 1);
        assert_eq!(plan.grant_manager[0].employee_id, promoted);
        assert_eq!(plan.revoke_manager.len(), 1);
        assert_eq!(plan.revoke_manager[0].employee_id, demoted);
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn plan_leaves_unchanged_rows_untouched() {
        let team_id = Uuid::new_v4();
        let manager = Uuid::new_v4();
        let plain = Uuid::new_v4();
        let current = vec![member(team_id, manager, true), member(team_id, plain, false)];

        let plan = plan_members(&current, &[plain], &[manager]);

        assert!(plan.grant_manager.is_empty());
        assert!(plan.revoke_manager.is_empty());
        assert!(plan.remove.is_empty());
        assert!(plan.add.is_empty());
    }

    #[test]
    fn plan_adds_new_members_with_manager_flag() {
        let new_member = Uuid::new_v4();
        let new_manager = Uuid::new_v4();

        let plan = plan_members(&[], &[new_member], &[new_manager]);

        assert_eq!(plan.add.len(), 2);
        assert!(plan.add.contains(&(new_member, false)));
        assert!(plan.add.contains(&(new_manager, true)));
    }

    #[test]
    fn plan_partition_covers_original_and_desired_sets() {
        // Kept + removed rows partition the original membership, and
        // kept + added ids equal the desired set.
        let team_id = Uuid::new_v4();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let d = Uuid::new_v4();
        let current = vec![
            member(team_id, a, true),
            member(team_id, b, false),
            member(team_id, c, false),
        ];

        // Desired: b stays, c promoted, d new; a leaves.
        let plan = plan_members(&current, &[b], &[c, d]);

        let removed: HashSet<Uuid> = plan.remove.iter().map(|m| m.employee_id).collect();
        let kept: HashSet<Uuid> = current
            .iter()
            .map(|m| m.employee_id)
            .filter(|id| !removed.contains(id))
            .collect();

        let original: HashSet<Uuid> = current.iter().map(|m| m.employee_id).collect();
        let mut kept_and_removed = kept.clone();
        kept_and_removed.extend(removed.iter().copied());
        assert_eq!(kept_and_removed, original);

        let added: HashSet<Uuid> = plan.add.iter().map(|(id, _)| *id).collect();
        let mut kept_and_added = kept;
        kept_and_added.extend(added.iter().copied());
        let desired: HashSet<Uuid> = [b, c, d].into_iter().collect();
        assert_eq!(kept_and_added, desired);
    }

    #[test]
    fn plan_treats_manager_ids_as_members() {
        let team_id = Uuid::new_v4();
        let manager_only = Uuid::new_v4();
        let current = vec![member(team_id, manager_only, false)];

        // Present only in manager_ids: must be kept and promoted, not removed.
        let plan = plan_members(&current, &[], &[manager_only]);

        assert!(plan.remove.is_empty());
        assert_eq!(plan.grant_manager.len(), 1);
    }

    #[tokio::test]
    async fn update_members_applies_plan_and_drops_unknown_ids() {
        let tenant_id = Uuid::new_v4();
        let organization_id = Uuid::new_v4();
        let team_id = Uuid::new_v4();

        let keep = Uuid::new_v4();
        let remove = Uuid::new_v4();
        let add = Uuid::new_v4();
        let unknown = Uuid::new_v4();

        let mut team = OrganizationTeam::new(
            tenant_id,
            organization_id,
            "Platform".to_string(),
            None,
            None,
            None,
        )
        .unwrap();
        team.id = team_id;

        let keep_row = member(team_id, keep, false);
        let remove_row = member(team_id, remove, false);
        let remove_row_id = remove_row.id;
        let current = vec![keep_row, remove_row];

        let mut teams = MockTeamRepository::new();
        let team_clone = team.clone();
        teams
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(team_clone.clone())));
        let current_clone = current.clone();
        teams
            .expect_members_of()
            .returning(move |_| Ok(current_clone.clone()));
        teams
            .expect_delete_member()
            .withf(move |id| *id == remove_row_id)
            .times(1)
            .returning(|_| Ok(()));
        teams
            .expect_insert_member()
            .withf(move |row| row.employee_id == add && !row.is_manager)
            .times(1)
            .returning(|row| Ok(row.clone()));

        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_ids().returning(move |t, o, ids| {
            // Unknown ids resolve to nothing.
            Ok(ids
                .iter()
                .filter(|id| **id != unknown)
                .map(|id| employee(*t, *o, *id))
                .collect())
        });

        let service = TeamService::new(Arc::new(teams), Arc::new(employees));
        let result = service
            .update_members(&tenant_id, &team_id, &[keep, add, unknown], &[])
            .await;
        assert!(result.is_ok());
    }
}
