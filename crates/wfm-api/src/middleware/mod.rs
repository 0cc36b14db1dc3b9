//! Request middleware: bearer auth, request metrics, login rate limiting

pub mod auth;
pub mod metrics;
pub mod rate_limit;

pub use auth::{require_auth, AuthContext};
pub use rate_limit::LoginRateLimiter;
