use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque bearer credential. At most one per user; it never expires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub key: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl AuthToken {
    pub fn new(key: String, user_id: Uuid) -> Self {
        Self {
            key,
            user_id,
            created_at: Utc::now(),
        }
    }
}
