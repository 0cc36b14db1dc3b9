// ============================================================================
// WFM Core - Employee Service
// File: crates/wfm-core/src/services/employee_service.rs
// Description: Employee CRUD, soft delete/restore, and the working set
// ============================================================================

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::domain::Employee;
use crate::error::DomainError;
use crate::repositories::{EmployeeFilter, EmployeeRepository, OrganizationRepository};
use wfm_shared::{Paginated, Pagination};

#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    pub organization_id: Uuid,
    pub user_id: Option<Uuid>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub started_work_on: Option<NaiveDate>,
    pub bill_rate_value: f64,
    pub bill_rate_currency: String,
}

/// Partial employee update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub started_work_on: Option<NaiveDate>,
    pub ended_work_on: Option<NaiveDate>,
    pub bill_rate_value: Option<f64>,
    pub bill_rate_currency: Option<String>,
    pub is_active: Option<bool>,
}

pub struct EmployeeService<E, O>
where
    E: EmployeeRepository,
    O: OrganizationRepository,
{
    employee_repo: Arc<E>,
    organization_repo: Arc<O>,
}

impl<E, O> EmployeeService<E, O>
where
    E: EmployeeRepository,
    O: OrganizationRepository,
{
    pub fn new(employee_repo: Arc<E>, organization_repo: Arc<O>) -> Self {
        Self {
            employee_repo,
            organization_repo,
        }
    }

    pub async fn create(
        &self,
        tenant_id: &Uuid,
        input: CreateEmployeeInput,
    ) -> Result<Employee, DomainError> {
        // 1. Organization must exist in the tenant
        self.organization_repo
            .find_by_id(tenant_id, &input.organization_id)
            .await?
            .ok_or(DomainError::OrganizationNotFound)?;

        // 2. Build and persist
        let employee = Employee::new(
            *tenant_id,
            input.organization_id,
            input.user_id,
            input.first_name,
            input.last_name,
            input.email,
            input.started_work_on,
            input.bill_rate_value,
            input.bill_rate_currency,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;

        let created = self.employee_repo.create(&employee).await?;
        info!("Created employee {} for tenant {}", created.id, tenant_id);
        Ok(created)
    }

    pub async fn get(&self, tenant_id: &Uuid, id: &Uuid) -> Result<Employee, DomainError> {
        self.employee_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::EmployeeNotFound)
    }

    pub async fn update(
        &self,
        tenant_id: &Uuid,
        id: &Uuid,
        input: UpdateEmployeeInput,
    ) -> Result<Employee, DomainError> {
        let mut employee = self.get(tenant_id, id).await?;

        if let Some(first_name) = input.first_name {
            employee.first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = input.last_name {
            employee.last_name = last_name.trim().to_string();
        }
        if let Some(email) = input.email {
            employee.email = email.trim().to_lowercase();
        }
        if let Some(date) = input.started_work_on {
            employee.started_work_on = Some(date);
        }
        if let Some(date) = input.ended_work_on {
            employee.ended_work_on = Some(date);
        }
        if let Some(rate) = input.bill_rate_value {
            employee.bill_rate_value = rate;
        }
        if let Some(currency) = input.bill_rate_currency {
            employee.bill_rate_currency = currency.trim().to_uppercase();
        }
        if let Some(active) = input.is_active {
            employee.is_active = active;
        }
        employee
            .validate()
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        employee.updated_at = Utc::now();

        self.employee_repo.update(&employee).await
    }

    pub async fn delete(&self, tenant_id: &Uuid, id: &Uuid) -> Result<(), DomainError> {
        let employee = self.get(tenant_id, id).await?;
        self.employee_repo
            .soft_delete(tenant_id, &employee.organization_id, id)
            .await?;
        info!("Deleted employee {} for tenant {}", id, tenant_id);
        Ok(())
    }

    /// Undo a soft delete. The organization must be supplied because deleted
    /// rows are invisible to scoped lookups.
    pub async fn restore(
        &self,
        tenant_id: &Uuid,
        organization_id: &Uuid,
        id: &Uuid,
    ) -> Result<Employee, DomainError> {
        let restored = self
            .employee_repo
            .restore(tenant_id, organization_id, id)
            .await?;
        info!("Restored employee {} for tenant {}", id, tenant_id);
        Ok(restored)
    }

    pub async fn list(
        &self,
        tenant_id: &Uuid,
        filter: EmployeeFilter,
        pagination: Pagination,
    ) -> Result<Paginated<Employee>, DomainError> {
        self.employee_repo.list(tenant_id, filter, pagination).await
    }

    /// Employees active at any point of the date range.
    pub async fn working(
        &self,
        tenant_id: &Uuid,
        organization_id: Option<Uuid>,
        from: NaiveDate,
        to: NaiveDate,
        pagination: Pagination,
    ) -> Result<Paginated<Employee>, DomainError> {
        if from > to {
            return Err(DomainError::ValidationError(
                "Range start must not be after range end".to_string(),
            ));
        }
        self.employee_repo
            .find_working(tenant_id, organization_id, from, to, pagination)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Organization;
    use crate::repositories::employee_repository::MockEmployeeRepository;
    use crate::repositories::organization_repository::MockOrganizationRepository;

    fn input(organization_id: Uuid) -> CreateEmployeeInput {
        CreateEmployeeInput {
            organization_id,
            user_id: None,
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "Jane@Acme.Test".to_string(),
            started_work_on: None,
            bill_rate_value: 75.0,
            bill_rate_currency: "usd".to_string(),
        }
    }

    #[tokio::test]
    async fn create_rejects_unknown_organization() {
        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id().returning(|_, _| Ok(None));

        let svc = EmployeeService::new(Arc::new(MockEmployeeRepository::new()), Arc::new(orgs));
        let err = svc
            .create(&Uuid::new_v4(), input(Uuid::new_v4()))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::OrganizationNotFound));
    }

    #[tokio::test]
    async fn create_normalizes_email_and_currency() {
        let tenant_id = Uuid::new_v4();
        let org = Organization::new(
            tenant_id,
            "Acme".to_string(),
            "USD".to_string(),
            "acme".to_string(),
        )
        .unwrap();
        let org_id = org.id;

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_find_by_id()
            .returning(move |_, _| Ok(Some(org.clone())));

        let mut employees = MockEmployeeRepository::new();
        employees.expect_create().returning(|e| Ok(e.clone()));

        let svc = EmployeeService::new(Arc::new(employees), Arc::new(orgs));
        let created = svc.create(&tenant_id, input(org_id)).await.unwrap();
        assert_eq!(created.email, "jane@acme.test");
        assert_eq!(created.bill_rate_currency, "USD");
    }

    #[tokio::test]
    async fn delete_scopes_by_row_organization() {
        let tenant_id = Uuid::new_v4();
        let emp = Employee::new(
            tenant_id,
            Uuid::new_v4(),
            None,
            "Jane".to_string(),
            "Doe".to_string(),
            "jane@acme.test".to_string(),
            None,
            0.0,
            "USD".to_string(),
        )
        .unwrap();
        let emp_id = emp.id;
        let org_id = emp.organization_id;

        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(emp.clone())));
        employees
            .expect_soft_delete()
            .withf(move |_, org, id| *org == org_id && *id == emp_id)
            .returning(|_, _, _| Ok(()));

        let svc = EmployeeService::new(
            Arc::new(employees),
            Arc::new(MockOrganizationRepository::new()),
        );
        assert!(svc.delete(&tenant_id, &emp_id).await.is_ok());
    }

    #[tokio::test]
    async fn working_rejects_inverted_range() {
        let svc = EmployeeService::new(
            Arc::new(MockEmployeeRepository::new()),
            Arc::new(MockOrganizationRepository::new()),
        );
        let from = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let err = svc
            .working(&Uuid::new_v4(), None, from, to, Pagination::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }
}
