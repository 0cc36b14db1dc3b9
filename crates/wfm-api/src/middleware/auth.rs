// ============================================================================
// WFM API - Authentication Middleware
// File: crates/wfm-api/src/middleware/auth.rs
// Description: Validates bearer tokens and injects the caller identity
// ============================================================================

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use wfm_core::domain::Role;
use wfm_security::Claims;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identity, decoded from the access token. Handlers pull this out of
/// request extensions; every tenant-scoped query keys off `tenant_id`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub employee_id: Option<Uuid>,
    pub role: Role,
}

impl AuthContext {
    fn from_claims(claims: &Claims) -> Result<Self, ApiError> {
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::Unauthorized("Malformed subject claim".to_string()))?;
        let tenant_id = Uuid::parse_str(&claims.tenant_id)
            .map_err(|_| ApiError::Unauthorized("Malformed tenant claim".to_string()))?;
        let employee_id = match &claims.employee_id {
            Some(raw) => Some(
                Uuid::parse_str(raw)
                    .map_err(|_| ApiError::Unauthorized("Malformed employee claim".to_string()))?,
            ),
            None => None,
        };
        let role = Role::from_str(&claims.role)
            .ok_or_else(|| ApiError::Unauthorized(format!("Unknown role: {}", claims.role)))?;

        Ok(Self {
            user_id,
            tenant_id,
            employee_id,
            role,
        })
    }

    /// The caller as an invoice actor (permission checks live in the service).
    pub fn actor(&self) -> wfm_core::services::Actor {
        wfm_core::services::Actor {
            user_id: self.user_id,
            employee_id: self.employee_id,
            role: self.role,
        }
    }
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state
        .jwt
        .validate_access_token(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let ctx = AuthContext::from_claims(&claims)?;
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: &str, employee_id: Option<String>) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            tenant_id: Uuid::new_v4().to_string(),
            employee_id,
            role: role.to_string(),
            iat: 0,
            exp: i64::MAX,
            token_type: "access".to_string(),
        }
    }

    #[test]
    fn context_parses_valid_claims() {
        let employee = Uuid::new_v4();
        let ctx = AuthContext::from_claims(&claims("manager", Some(employee.to_string()))).unwrap();
        assert_eq!(ctx.role, Role::Manager);
        assert_eq!(ctx.employee_id, Some(employee));
    }

    #[test]
    fn context_rejects_unknown_role() {
        assert!(AuthContext::from_claims(&claims("superuser", None)).is_err());
    }

    #[test]
    fn context_rejects_malformed_employee_id() {
        assert!(AuthContext::from_claims(&claims("admin", Some("not-a-uuid".to_string()))).is_err());
    }
}
