//! # WFM API
//!
//! HTTP layer for the workforce management server: axum router, request
//! handlers, auth/metrics middleware, and the Prometheus exposition endpoint.

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
