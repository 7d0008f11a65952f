use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named grouping of posts, addressed by slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(title: String, description: String, slug: String, is_published: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            description,
            slug,
            is_published,
            created_at: Utc::now(),
        }
    }
}

/// A named place a post can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(name: String, is_published: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            is_published,
            created_at: Utc::now(),
        }
    }
}
