// ============================================================================
// WFM Core - Notification Service
// File: crates/wfm-core/src/services/notification_service.rs
// Description: In-app notification delivery gated by per-employee settings
// ============================================================================

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::domain::{EmployeeNotification, NotificationKind, NotificationSetting};
use crate::error::DomainError;
use crate::repositories::{EmployeeRepository, NotificationFilter, NotificationRepository};
use wfm_shared::{Paginated, Pagination};

/// Payload for a notification about some source entity.
#[derive(Debug, Clone)]
pub struct NotifyInput {
    pub entity: String,
    pub entity_id: Uuid,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub sent_by_id: Option<Uuid>,
    pub receiver_id: Uuid,
}

/// Partial settings update; `None` leaves the flag untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateSettingsInput {
    pub payment: Option<bool>,
    pub assignment: Option<bool>,
    pub invitation: Option<bool>,
    pub mention: Option<bool>,
    pub comment: Option<bool>,
    pub message: Option<bool>,
    pub preferences: Option<serde_json::Value>,
}

pub struct NotificationService<N, E>
where
    N: NotificationRepository,
    E: EmployeeRepository,
{
    notification_repo: Arc<N>,
    employee_repo: Arc<E>,
}

impl<N, E> NotificationService<N, E>
where
    N: NotificationRepository,
    E: EmployeeRepository,
{
    pub fn new(notification_repo: Arc<N>, employee_repo: Arc<E>) -> Self {
        Self {
            notification_repo,
            employee_repo,
        }
    }

    /// Deliver a notification to an employee, honoring their settings. Returns
    /// `None` when the receiver has opted out of this kind.
    pub async fn notify(
        &self,
        tenant_id: &Uuid,
        input: NotifyInput,
    ) -> Result<Option<EmployeeNotification>, DomainError> {
        // 1. Receiver must be a live employee of the tenant
        let receiver = self
            .employee_repo
            .find_by_id(tenant_id, &input.receiver_id)
            .await?
            .ok_or(DomainError::EmployeeNotFound)?;

        // 2. Check the receiver's settings, creating defaults on first touch
        let settings = self.settings_or_defaults(tenant_id, &receiver.id, receiver.organization_id).await?;
        if !settings.allows(input.kind) {
            debug!(
                "Notification suppressed: employee {} opted out of {}",
                receiver.id,
                input.kind.as_str()
            );
            return Ok(None);
        }

        // 3. Deliver
        let notification = EmployeeNotification::new(
            *tenant_id,
            receiver.organization_id,
            input.entity,
            input.entity_id,
            input.title,
            input.message,
            input.kind,
            input.sent_by_id,
            input.receiver_id,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        let created = self.notification_repo.create(&notification).await?;
        Ok(Some(created))
    }

    pub async fn list(
        &self,
        tenant_id: &Uuid,
        filter: NotificationFilter,
        pagination: Pagination,
    ) -> Result<Paginated<EmployeeNotification>, DomainError> {
        self.notification_repo.list(tenant_id, filter, pagination).await
    }

    /// Mark one notification read. Only its receiver may do so.
    pub async fn mark_read(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
        id: &Uuid,
    ) -> Result<EmployeeNotification, DomainError> {
        let mut notification = self
            .notification_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::NotificationNotFound)?;
        if notification.receiver_id != *employee_id {
            return Err(DomainError::Forbidden(
                "Notification belongs to another employee".to_string(),
            ));
        }
        notification.mark_read();
        self.notification_repo.update(&notification).await
    }

    /// Returns the number of notifications flipped to read.
    pub async fn mark_all_read(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
    ) -> Result<u64, DomainError> {
        self.notification_repo.mark_all_read(tenant_id, employee_id).await
    }

    /// Hide a notification until the given time. Only its receiver may do so.
    pub async fn snooze(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
        id: &Uuid,
        until: DateTime<Utc>,
    ) -> Result<EmployeeNotification, DomainError> {
        let mut notification = self
            .notification_repo
            .find_by_id(tenant_id, id)
            .await?
            .ok_or(DomainError::NotificationNotFound)?;
        if notification.receiver_id != *employee_id {
            return Err(DomainError::Forbidden(
                "Notification belongs to another employee".to_string(),
            ));
        }
        notification.snooze(until);
        self.notification_repo.update(&notification).await
    }

    /// The employee's settings row, created with everything enabled on first
    /// access.
    pub async fn settings(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
    ) -> Result<NotificationSetting, DomainError> {
        let employee = self
            .employee_repo
            .find_by_id(tenant_id, employee_id)
            .await?
            .ok_or(DomainError::EmployeeNotFound)?;
        self.settings_or_defaults(tenant_id, &employee.id, employee.organization_id)
            .await
    }

    pub async fn update_settings(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
        input: UpdateSettingsInput,
    ) -> Result<NotificationSetting, DomainError> {
        let mut settings = self.settings(tenant_id, employee_id).await?;

        if let Some(v) = input.payment {
            settings.payment = v;
        }
        if let Some(v) = input.assignment {
            settings.assignment = v;
        }
        if let Some(v) = input.invitation {
            settings.invitation = v;
        }
        if let Some(v) = input.mention {
            settings.mention = v;
        }
        if let Some(v) = input.comment {
            settings.comment = v;
        }
        if let Some(v) = input.message {
            settings.message = v;
        }
        if let Some(preferences) = input.preferences {
            settings.preferences = preferences;
        }
        settings.updated_at = Utc::now();

        self.notification_repo.update_settings(&settings).await
    }

    async fn settings_or_defaults(
        &self,
        tenant_id: &Uuid,
        employee_id: &Uuid,
        organization_id: Uuid,
    ) -> Result<NotificationSetting, DomainError> {
        if let Some(settings) = self
            .notification_repo
            .settings_for_employee(tenant_id, employee_id)
            .await?
        {
            return Ok(settings);
        }
        let defaults = NotificationSetting::defaults(*tenant_id, organization_id, *employee_id);
        self.notification_repo.create_settings(&defaults).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Employee;
    use crate::repositories::employee_repository::MockEmployeeRepository;
    use crate::repositories::notification_repository::MockNotificationRepository;

    fn employee(tenant_id: Uuid) -> Employee {
        Employee::new(
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
        .unwrap()
    }

    fn input(receiver_id: Uuid, kind: NotificationKind) -> NotifyInput {
        NotifyInput {
            entity: "invoice".to_string(),
            entity_id: Uuid::new_v4(),
            title: "Invoice paid".to_string(),
            message: "Invoice #42 was fully paid".to_string(),
            kind,
            sent_by_id: None,
            receiver_id,
        }
    }

    fn service(
        notifications: MockNotificationRepository,
        employees: MockEmployeeRepository,
    ) -> NotificationService<MockNotificationRepository, MockEmployeeRepository> {
        NotificationService::new(Arc::new(notifications), Arc::new(employees))
    }

    #[tokio::test]
    async fn notify_suppressed_when_kind_disabled() {
        let tenant_id = Uuid::new_v4();
        let emp = employee(tenant_id);
        let emp_id = emp.id;
        let mut settings = NotificationSetting::defaults(tenant_id, emp.organization_id, emp_id);
        settings.assignment = false;

        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(emp.clone())));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_settings_for_employee()
            .returning(move |_, _| Ok(Some(settings.clone())));
        // No create expectation: delivery must not happen.

        let svc = service(notifications, employees);
        let delivered = svc
            .notify(&tenant_id, input(emp_id, NotificationKind::Assignment))
            .await
            .unwrap();
        assert!(delivered.is_none());
    }

    #[tokio::test]
    async fn notify_creates_default_settings_on_first_touch() {
        let tenant_id = Uuid::new_v4();
        let emp = employee(tenant_id);
        let emp_id = emp.id;

        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(emp.clone())));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_settings_for_employee()
            .returning(|_, _| Ok(None));
        notifications
            .expect_create_settings()
            .withf(move |s| s.employee_id == emp_id && s.payment && s.message)
            .returning(|s| Ok(s.clone()));
        notifications
            .expect_create()
            .returning(|n| Ok(n.clone()));

        let svc = service(notifications, employees);
        let delivered = svc
            .notify(&tenant_id, input(emp_id, NotificationKind::Payment))
            .await
            .unwrap();
        assert!(delivered.is_some());
    }

    #[tokio::test]
    async fn notify_rejects_unknown_receiver() {
        let tenant_id = Uuid::new_v4();
        let mut employees = MockEmployeeRepository::new();
        employees.expect_find_by_id().returning(|_, _| Ok(None));

        let svc = service(MockNotificationRepository::new(), employees);
        let err = svc
            .notify(&tenant_id, input(Uuid::new_v4(), NotificationKind::Payment))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmployeeNotFound));
    }

    #[tokio::test]
    async fn mark_read_enforces_receiver() {
        let tenant_id = Uuid::new_v4();
        let stored = EmployeeNotification::new(
            tenant_id,
            Uuid::new_v4(),
            "invoice".to_string(),
            Uuid::new_v4(),
            "Invoice sent".to_string(),
            String::new(),
            NotificationKind::Payment,
            None,
            Uuid::new_v4(),
        )
        .unwrap();
        let id = stored.id;

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(stored.clone())));

        let svc = service(notifications, MockEmployeeRepository::new());
        let err = svc
            .mark_read(&tenant_id, &Uuid::new_v4(), &id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_settings_applies_partial_flags() {
        let tenant_id = Uuid::new_v4();
        let emp = employee(tenant_id);
        let emp_id = emp.id;
        let settings = NotificationSetting::defaults(tenant_id, emp.organization_id, emp_id);

        let mut employees = MockEmployeeRepository::new();
        employees
            .expect_find_by_id()
            .returning(move |_, _| Ok(Some(emp.clone())));

        let mut notifications = MockNotificationRepository::new();
        notifications
            .expect_settings_for_employee()
            .returning(move |_, _| Ok(Some(settings.clone())));
        notifications
            .expect_update_settings()
            .withf(|s| !s.comment && s.payment)
            .returning(|s| Ok(s.clone()));

        let svc = service(notifications, employees);
        let updated = svc
            .update_settings(
                &tenant_id,
                &emp_id,
                UpdateSettingsInput {
                    comment: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.comment);
    }
}
