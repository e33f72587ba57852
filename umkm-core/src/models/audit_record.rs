use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::ChangeStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Actor {
    #[serde(rename = "Pemilik")]
    Owner,
    Admin,
}

impl Actor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "Pemilik",
            Self::Admin => "Admin",
        }
    }
}

/// One entry in a profile's change history.
///
/// Records are only ever prepended; an existing record is never edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor: Actor,
    pub changes: Vec<String>,
    pub status: ChangeStatus,
}
