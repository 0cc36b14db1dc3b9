// ============================================================================
// WFM Core - Tenant Service
// File: crates/wfm-core/src/services/tenant_service.rs
// ============================================================================
//! Tenant onboarding: sign-up creates the tenant, its default organization,
//! and the admin user in one flow.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Organization, Role, Tenant, User};
use crate::error::DomainError;
use crate::repositories::{OrganizationRepository, TenantRepository, UserRepository};
use crate::services::auth_service::UserInfo;
use wfm_security::password::{PasswordError, PasswordService};
use wfm_shared::constants::DEFAULT_CURRENCY;
use wfm_shared::utils::{mask_email, slugify};

pub struct TenantService<T, O, U>
where
    T: TenantRepository,
    O: OrganizationRepository,
    U: UserRepository,
{
    tenant_repo: Arc<T>,
    org_repo: Arc<O>,
    user_repo: Arc<U>,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl<T, O, U> TenantService<T, O, U>
where
    T: TenantRepository,
    O: OrganizationRepository,
    U: UserRepository,
{
    pub fn new(
        tenant_repo: Arc<T>,
        org_repo: Arc<O>,
        user_repo: Arc<U>,
        jwt_secret: String,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
    ) -> Self {
        Self {
            tenant_repo,
            org_repo,
            user_repo,
            jwt_secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Register a new tenant with its first (admin) user.
    pub async fn register(
        &self,
        tenant_name: &str,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<RegisterResult, DomainError> {
        info!("Registration attempt for email: {}", mask_email(email));

        // 1. Password policy first, before any writes
        PasswordService::validate_strength(password).map_err(|e| match e {
            PasswordError::TooShort => DomainError::PasswordTooShort,
            PasswordError::TooLong => DomainError::PasswordTooLong,
            PasswordError::TooWeak => DomainError::PasswordTooWeak,
            other => DomainError::PasswordHashError(other.to_string()),
        })?;

        // 2. Check if email already exists
        if self.user_repo.find_by_email(email).await?.is_some() {
            warn!("Registration failed: email already exists: {}", mask_email(email));
            return Err(DomainError::EmailAlreadyExists(email.to_string()));
        }

        // 3. Create the tenant
        let tenant = Tenant::new(tenant_name.to_string())
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        let tenant = self.tenant_repo.create(&tenant).await?;

        // 4. Create the default organization
        let organization = Organization::new(
            tenant.id,
            tenant.name.clone(),
            DEFAULT_CURRENCY.to_string(),
            slugify(&tenant.name),
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        let organization = self.org_repo.create(&organization).await?;

        // 5. Create the admin user
        let password_hash = PasswordService::hash(password)
            .map_err(|e| DomainError::PasswordHashError(e.to_string()))?;

        let user = User::new(
            tenant.id,
            email.to_string(),
            Some(password_hash),
            first_name.to_string(),
            last_name.to_string(),
            Role::Admin,
        )
        .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        let user = self.user_repo.create(&user).await?;

        // 6. Issue tokens so sign-up doubles as login
        let jwt_service = wfm_security::jwt::JwtService::new(
            self.jwt_secret.clone(),
            self.access_token_expiry,
            self.refresh_token_expiry,
        );
        let access_token = jwt_service
            .generate_access_token(&user.id, &user.tenant_id, None, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;
        let refresh_token = jwt_service
            .generate_refresh_token(&user.id, &user.tenant_id, None, user.role.as_str())
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        info!(
            "Registration successful: tenant {} organization {} user {}",
            tenant.id, organization.id, user.id
        );

        Ok(RegisterResult {
            tenant,
            organization,
            user: UserInfo::from(&user),
            access_token,
            refresh_token,
        })
    }

    pub async fn get_tenant(&self, id: &Uuid) -> Result<Tenant, DomainError> {
        self.tenant_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::TenantNotFound)
    }

    pub async fn rename_tenant(&self, id: &Uuid, name: &str) -> Result<Tenant, DomainError> {
        let mut tenant = self.get_tenant(id).await?;
        tenant
            .rename(name.to_string())
            .map_err(|e| DomainError::ValidationError(e.to_string()))?;
        self.tenant_repo.update(&tenant).await
    }
}

/// Result of a successful tenant registration
#[derive(Debug, Clone)]
pub struct RegisterResult {
    pub tenant: Tenant,
    pub organization: Organization,
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::organization_repository::MockOrganizationRepository;
    use crate::repositories::tenant_repository::MockTenantRepository;
    use crate::repositories::user_repository::MockUserRepository;

    fn service(
        tenants: MockTenantRepository,
        orgs: MockOrganizationRepository,
        users: MockUserRepository,
    ) -> TenantService<MockTenantRepository, MockOrganizationRepository, MockUserRepository> {
        TenantService::new(
            Arc::new(tenants),
            Arc::new(orgs),
            Arc::new(users),
            "test-secret".to_string(),
            900,
            604800,
        )
    }

    #[tokio::test]
    async fn register_creates_tenant_org_and_admin() {
        let mut tenants = MockTenantRepository::new();
        tenants.expect_create().returning(|t| Ok(t.clone()));

        let mut orgs = MockOrganizationRepository::new();
        orgs.expect_create().returning(|o| Ok(o.clone()));

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|_| Ok(None));
        users.expect_create().returning(|u| Ok(u.clone()));

        let result = service(tenants, orgs, users)
            .register(
                "Ever Technologies",
                "admin@ever.co",
                "correct-horse-battery-staple-9",
                "Admin",
                "User",
            )
            .await
            .unwrap();

        assert_eq!(result.tenant.name, "Ever Technologies");
        assert_eq!(result.organization.tenant_id, result.tenant.id);
        assert_eq!(result.organization.profile_link, "ever-technologies");
        assert_eq!(result.user.role, "admin");
        assert!(!result.access_token.is_empty());
    }

    #[tokio::test]
    async fn register_rejects_taken_email() {
        let tenants = MockTenantRepository::new();
        let orgs = MockOrganizationRepository::new();

        let mut users = MockUserRepository::new();
        users.expect_find_by_email().returning(|email| {
            let user = User::new(
                Uuid::new_v4(),
                email.to_string(),
                Some("hash".to_string()),
                "Existing".to_string(),
                "User".to_string(),
                Role::Admin,
            )
            .unwrap();
            Ok(Some(user))
        });

        let err = service(tenants, orgs, users)
            .register(
                "Ever",
                "taken@ever.co",
                "correct-horse-battery-staple-9",
                "A",
                "B",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));
    }

    #[tokio::test]
    async fn register_rejects_weak_password_before_any_write() {
        let tenants = MockTenantRepository::new();
        let orgs = MockOrganizationRepository::new();
        let users = MockUserRepository::new();

        let err = service(tenants, orgs, users)
            .register("Ever", "admin@ever.co", "password123", "A", "B")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PasswordTooWeak));
    }
}
