use super::ClientId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Explicit grouping for work items that belong to one job, such as the
/// advance and final-balance halves of a split bill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Option<i64>,
    pub client_id: ClientId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(client_id: ClientId, name: String) -> Self {
        Self {
            id: None,
            client_id,
            name,
            created_at: Utc::now(),
        }
    }
}
