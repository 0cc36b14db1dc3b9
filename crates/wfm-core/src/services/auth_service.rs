// ============================================================================
// WFM Core - Authentication Service
// File: crates/wfm-core/src/services/auth_service.rs
// ============================================================================
//! Authentication service: login, token refresh, current-user lookup

use std::sync::Arc;

use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::User;
use crate::error::DomainError;
use crate::repositories::UserRepository;
use wfm_shared::utils::mask_email;

pub struct AuthService<R: UserRepository> {
    user_repo: Arc<R>,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl<R: UserRepository> AuthService<R> {
    pub fn new(
        user_repo: Arc<R>,
        jwt_secret: String,
        access_token_expiry: i64,
        refresh_token_expiry: i64,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            access_token_expiry,
            refresh_token_expiry,
        }
    }

    /// Login with email and password
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResult, DomainError> {
        info!("Login attempt for email: {}", mask_email(email));

        // 1. Find user by email
        let user = self.user_repo.find_by_email(email).await?.ok_or_else(|| {
            warn!("Login failed: email not found: {}", mask_email(email));
            DomainError::InvalidCredentials
        })?;

        // 2. Check if user can login
        if !user.can_login() {
            warn!("Login failed: user cannot login: {}", user.id);
            return Err(DomainError::UserNotActive);
        }

        // 3. Verify password
        let stored_hash = user
            .password_hash
            .as_ref()
            .ok_or(DomainError::InvalidCredentials)?;

        let password_valid = wfm_security::password::PasswordService::verify(password, stored_hash)
            .map_err(|_e| DomainError::InvalidCredentials)?;

        if !password_valid {
            warn!("Login failed: invalid password for: {}", mask_email(email));
            return Err(DomainError::InvalidCredentials);
        }

        // 4. Generate tokens
        let (access_token, refresh_token) = self.issue_tokens(&user)?;

        // 5. Update last login
        let mut updated_user = user.clone();
        updated_user.record_login();

        if let Err(e) = self.user_repo.update(&updated_user).await {
            error!("Failed to update last login: {}", e);
            // Don't fail login for this
        }

        info!("Login successful for user: {}", user.id);

        Ok(LoginResult {
            user: UserInfo::from(&updated_user),
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a fresh token pair.
    pub async fn refresh(&self, refresh_token: &str) -> Result<LoginResult, DomainError> {
        // 1. Validate the refresh token
        let jwt_service = self.jwt_service();
        let claims = jwt_service
            .validate_refresh_token(refresh_token)
            .map_err(|e| {
                warn!("Refresh failed: {}", e);
                DomainError::InvalidToken
            })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| DomainError::InvalidToken)?;
        let tenant_id = Uuid::parse_str(&claims.tenant_id).map_err(|_| DomainError::InvalidToken)?;

        // 2. The user must still exist and be active
        let user = self
            .user_repo
            .find_by_id(&tenant_id, &user_id)
            .await?
            .ok_or(DomainError::InvalidToken)?;

        if !user.can_login() {
            return Err(DomainError::UserNotActive);
        }

        // 3. Rotate both tokens
        let (access_token, refresh_token) = self.issue_tokens(&user)?;

        Ok(LoginResult {
            user: UserInfo::from(&user),
            access_token,
            refresh_token,
        })
    }

    /// Current-user lookup for the `me` endpoint.
    pub async fn me(&self, tenant_id: &Uuid, user_id: &Uuid) -> Result<UserInfo, DomainError> {
        let user = self
            .user_repo
            .find_by_id(tenant_id, user_id)
            .await?
            .ok_or(DomainError::UserNotFound)?;
        Ok(UserInfo::from(&user))
    }

    fn jwt_service(&self) -> wfm_security::jwt::JwtService {
        wfm_security::jwt::JwtService::new(
            self.jwt_secret.clone(),
            self.access_token_expiry,
            self.refresh_token_expiry,
        )
    }

    fn issue_tokens(&self, user: &User) -> Result<(String, String), DomainError> {
        let jwt_service = self.jwt_service();
        let access_token = jwt_service
            .generate_access_token(
                &user.id,
                &user.tenant_id,
                user.employee_id.as_ref(),
                user.role.as_str(),
            )
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        let refresh_token = jwt_service
            .generate_refresh_token(
                &user.id,
                &user.tenant_id,
                user.employee_id.as_ref(),
                user.role.as_str(),
            )
            .map_err(|e| DomainError::TokenGenerationError(e.to_string()))?;

        Ok((access_token, refresh_token))
    }
}

/// Result of a successful login or refresh
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: UserInfo,
    pub access_token: String,
    pub refresh_token: String,
}

/// User info returned in auth responses
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub employee_id: Option<Uuid>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            role: user.role.as_str().to_string(),
            employee_id: user.employee_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;
    use crate::repositories::user_repository::MockUserRepository;

    fn user_with_password(password: &str) -> User {
        let hash = wfm_security::password::PasswordService::hash(password).unwrap();
        User::new(
            Uuid::new_v4(),
            "admin@example.com".to_string(),
            Some(hash),
            "Admin".to_string(),
            "User".to_string(),
            Role::Admin,
        )
        .unwrap()
    }

    fn service(repo: MockUserRepository) -> AuthService<MockUserRepository> {
        AuthService::new(Arc::new(repo), "test-secret".to_string(), 900, 604800)
    }

    #[tokio::test]
    async fn login_with_valid_credentials_issues_tokens() {
        let user = user_with_password("Str0ng-Enough-Pass");
        let found = user.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_update().returning(|u| Ok(u.clone()));

        let result = service(repo)
            .login("admin@example.com", "Str0ng-Enough-Pass")
            .await
            .unwrap();

        assert_eq!(result.user.email, "admin@example.com");
        assert!(!result.access_token.is_empty());
        assert!(!result.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let user = user_with_password("Str0ng-Enough-Pass");
        let found = user.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(found.clone())));

        let err = service(repo)
            .login("admin@example.com", "wrong-password")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_with_unknown_email_is_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let err = service(repo)
            .login("nobody@example.com", "whatever-pass")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_failure_on_last_login_update_is_not_fatal() {
        let user = user_with_password("Str0ng-Enough-Pass");
        let found = user.clone();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(move |_| Ok(Some(found.clone())));
        repo.expect_update()
            .returning(|_| Err(DomainError::DatabaseError("connection lost".to_string())));

        let result = service(repo)
            .login("admin@example.com", "Str0ng-Enough-Pass")
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn refresh_rotates_tokens_for_active_user() {
        let user = user_with_password("Str0ng-Enough-Pass");
        let tenant_id = user.tenant_id;
        let user_id = user.id;
        let found = user.clone();

        let jwt = wfm_security::jwt::JwtService::new("test-secret".to_string(), 900, 604800);
        let refresh = jwt
            .generate_refresh_token(&user_id, &tenant_id, None, "admin")
            .unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_, _| Ok(Some(found.clone())));

        let result = service(repo).refresh(&refresh).await.unwrap();
        assert_eq!(result.user.id, user_id);
    }

    #[tokio::test]
    async fn refresh_rejects_access_tokens() {
        let jwt = wfm_security::jwt::JwtService::new("test-secret".to_string(), 900, 604800);
        let access = jwt
            .generate_access_token(&Uuid::new_v4(), &Uuid::new_v4(), None, "admin")
            .unwrap();

        let repo = MockUserRepository::new();
        let err = service(repo).refresh(&access).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidToken));
    }
}
