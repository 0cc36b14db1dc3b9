//! # WFM Shared
//!
//! Shared utilities, types, and telemetry for the workforce management API.

pub mod config;
pub mod constants;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use types::*;
