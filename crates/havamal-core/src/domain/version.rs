use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of a post's content at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostVersion {
    pub id: Uuid,
    /// Free-form label such as "v1.2" or "draft-3".
    pub version: String,
    pub post_id: Uuid,
    /// Caller-supplied; neither monotonicity nor uniqueness is enforced.
    pub version_number: i32,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl PostVersion {
    pub fn new(version: String, post_id: Uuid, version_number: i32, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            version,
            post_id,
            version_number,
            content,
            created_at: Utc::now(),
        }
    }
}
