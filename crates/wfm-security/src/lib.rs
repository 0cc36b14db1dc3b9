//! # WFM Security
//!
//! Security utilities: JWT issuing/validation and password hashing.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, InvoiceLinkClaims, JwtError, JwtService};
pub use password::{PasswordError, PasswordService};
