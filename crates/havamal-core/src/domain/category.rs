use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category entity - a topic posts can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(name: String, slug: String, description: String, sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            slug,
            description,
            sort_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `key` names this category by id text or by slug.
    pub fn matches_key(&self, key: &str) -> bool {
        self.slug == key || self.id.to_string() == key
    }
}

/// Join row linking a post to a category. The pair is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostCategory {
    pub post_id: Uuid,
    pub category_id: Uuid,
}

impl PostCategory {
    pub fn new(post_id: Uuid, category_id: Uuid) -> Self {
        Self {
            post_id,
            category_id,
        }
    }
}
