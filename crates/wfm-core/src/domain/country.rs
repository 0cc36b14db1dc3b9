//! Country lookup entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Static reference data, seeded by migration. Not tenant-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Country {
    pub id: Uuid,
    pub iso_code: String,
    pub country: String,
}
