//! # WFM Core
//!
//! Domain entities, services, and repository traits for the workforce
//! management API.

pub mod domain;
pub mod error;
pub mod mailer;
pub mod repositories;
pub mod services;

pub use domain::*;
pub use error::DomainError;
