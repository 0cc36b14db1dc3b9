//! Password hashing with Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use thiserror::Error;

use wfm_shared::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, MIN_PASSWORD_SCORE};

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Hash error: {0}")]
    HashError(String),
    #[error("Verification failed")]
    VerificationFailed,
    #[error("Password too short")]
    TooShort,
    #[error("Password too long")]
    TooLong,
    #[error("Password too weak")]
    TooWeak,
}

pub struct PasswordService;

impl PasswordService {
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|h| h.to_string())
            .map_err(|e| PasswordError::HashError(e.to_string()))
    }

    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| PasswordError::HashError(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Length bounds plus a zxcvbn strength check. Called before hashing on
    /// registration and password changes.
    pub fn validate_strength(password: &str) -> Result<(), PasswordError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(PasswordError::TooShort);
        }
        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(PasswordError::TooLong);
        }
        let entropy = zxcvbn::zxcvbn(password, &[]);
        if u8::from(entropy.score()) < MIN_PASSWORD_SCORE {
            return Err(PasswordError::TooWeak);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let hash = PasswordService::hash("S0me-Str0ng-Passw0rd!").unwrap();
        assert!(PasswordService::verify("S0me-Str0ng-Passw0rd!", &hash).unwrap());
        assert!(!PasswordService::verify("wrong-password", &hash).unwrap());
    }

    #[test]
    fn strength_rejects_short_passwords() {
        assert!(matches!(
            PasswordService::validate_strength("abc"),
            Err(PasswordError::TooShort)
        ));
    }

    #[test]
    fn strength_rejects_common_passwords() {
        assert!(matches!(
            PasswordService::validate_strength("password123"),
            Err(PasswordError::TooWeak)
        ));
    }

    #[test]
    fn strength_accepts_strong_passwords() {
        assert!(PasswordService::validate_strength("correct-horse-battery-staple-9").is_ok());
    }
}
