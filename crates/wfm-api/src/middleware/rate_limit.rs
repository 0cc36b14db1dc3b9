//! Login rate limiting
//!
//! Keyed limiter over the login email so a brute-force run against one
//! account cannot lock the endpoint for everyone else.

use std::num::NonZeroU32;

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

pub struct LoginRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
}

impl LoginRateLimiter {
    pub fn new(attempts_per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(attempts_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
        }
    }

    /// Returns false when the email has exhausted its attempts for the window.
    pub fn check(&self, email: &str) -> bool {
        self.limiter.check_key(&email.trim().to_lowercase()).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_blocks_after_quota() {
        let limiter = LoginRateLimiter::new(3);
        assert!(limiter.check("user@example.com"));
        assert!(limiter.check("user@example.com"));
        assert!(limiter.check("user@example.com"));
        assert!(!limiter.check("user@example.com"));
    }

    #[test]
    fn limiter_keys_are_case_insensitive() {
        let limiter = LoginRateLimiter::new(1);
        assert!(limiter.check("User@Example.com"));
        assert!(!limiter.check("user@example.com"));
    }

    #[test]
    fn limiter_isolates_accounts() {
        let limiter = LoginRateLimiter::new(1);
        assert!(limiter.check("a@example.com"));
        assert!(limiter.check("b@example.com"));
    }
}
