//! JWT token handling

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use wfm_shared::constants::{TOKEN_TYPE_ACCESS, TOKEN_TYPE_INVOICE_LINK, TOKEN_TYPE_REFRESH};

/// Public invoice links do not expire on their own; the token is revoked by
/// clearing it from the invoice row.
const INVOICE_LINK_EXPIRY_DAYS: i64 = 3650;

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token creation failed: {0}")]
    CreationError(String),
    #[error("Token validation failed: {0}")]
    ValidationError(String),
    #[error("Wrong token type: expected {expected}, got {actual}")]
    WrongTokenType { expected: String, actual: String },
}

/// Claims for user access/refresh tokens. Tenant and role travel with the
/// token so handlers can scope queries without a user lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

/// Claims for tokenized public invoice links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLinkClaims {
    pub invoice_id: String,
    pub tenant_id: String,
    pub organization_id: String,
    pub iat: i64,
    pub exp: i64,
    pub token_type: String,
}

pub struct JwtService {
    secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
}

impl JwtService {
    pub fn new(secret: String, access_expiry: i64, refresh_expiry: i64) -> Self {
        Self {
            secret,
            access_token_expiry: access_expiry,
            refresh_token_expiry: refresh_expiry,
        }
    }

    pub fn generate_access_token(
        &self,
        user_id: &Uuid,
        tenant_id: &Uuid,
        employee_id: Option<&Uuid>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.generate_token(user_id, tenant_id, employee_id, role, TOKEN_TYPE_ACCESS, self.access_token_expiry)
    }

    pub fn generate_refresh_token(
        &self,
        user_id: &Uuid,
        tenant_id: &Uuid,
        employee_id: Option<&Uuid>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.generate_token(user_id, tenant_id, employee_id, role, TOKEN_TYPE_REFRESH, self.refresh_token_expiry)
    }

    fn generate_token(
        &self,
        user_id: &Uuid,
        tenant_id: &Uuid,
        employee_id: Option<&Uuid>,
        role: &str,
        token_type: &str,
        expiry: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            employee_id: employee_id.map(|id| id.to_string()),
            role: role.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(expiry)).timestamp(),
            token_type: token_type.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| JwtError::ValidationError(e.to_string()))
    }

    /// Validate an access token, rejecting refresh tokens presented as access.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TOKEN_TYPE_ACCESS {
            return Err(JwtError::WrongTokenType {
                expected: TOKEN_TYPE_ACCESS.to_string(),
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TOKEN_TYPE_REFRESH {
            return Err(JwtError::WrongTokenType {
                expected: TOKEN_TYPE_REFRESH.to_string(),
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }

    pub fn generate_invoice_link_token(
        &self,
        invoice_id: &Uuid,
        tenant_id: &Uuid,
        organization_id: &Uuid,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = InvoiceLinkClaims {
            invoice_id: invoice_id.to_string(),
            tenant_id: tenant_id.to_string(),
            organization_id: organization_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(INVOICE_LINK_EXPIRY_DAYS)).timestamp(),
            token_type: TOKEN_TYPE_INVOICE_LINK.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| JwtError::CreationError(e.to_string()))
    }

    pub fn validate_invoice_link_token(&self, token: &str) -> Result<InvoiceLinkClaims, JwtError> {
        let claims = decode::<InvoiceLinkClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| JwtError::ValidationError(e.to_string()))?;

        if claims.token_type != TOKEN_TYPE_INVOICE_LINK {
            return Err(JwtError::WrongTokenType {
                expected: TOKEN_TYPE_INVOICE_LINK.to_string(),
                actual: claims.token_type,
            });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret".to_string(), 900, 604800)
    }

    #[test]
    fn access_token_roundtrip() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let token = svc
            .generate_access_token(&user_id, &tenant_id, None, "admin")
            .unwrap();
        let claims = svc.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.tenant_id, tenant_id.to_string());
        assert_eq!(claims.role, "admin");
        assert_eq!(claims.token_type, "access");
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let token = svc
            .generate_refresh_token(&user_id, &tenant_id, None, "employee")
            .unwrap();
        assert!(svc.validate_access_token(&token).is_err());
        assert!(svc.validate_refresh_token(&token).is_ok());
    }

    #[test]
    fn invoice_link_token_roundtrip() {
        let svc = service();
        let invoice_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();
        let org_id = Uuid::new_v4();

        let token = svc
            .generate_invoice_link_token(&invoice_id, &tenant_id, &org_id)
            .unwrap();
        let claims = svc.validate_invoice_link_token(&token).unwrap();

        assert_eq!(claims.invoice_id, invoice_id.to_string());
        assert_eq!(claims.organization_id, org_id.to_string());
    }

    #[test]
    fn tampered_token_fails_validation() {
        let svc = service();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let token = svc
            .generate_access_token(&user_id, &tenant_id, None, "admin")
            .unwrap();
        let other = JwtService::new("other-secret".to_string(), 900, 604800);
        assert!(other.validate_token(&token).is_err());
    }
}
